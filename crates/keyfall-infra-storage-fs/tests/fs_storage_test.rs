use keyfall_infra_storage_fs::FsStorage;
use keyfall_ports::storage::{SettingsDto, StorageError, StoragePort};
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!("keyfall-{name}-{nanos}"))
}

#[test]
fn missing_documents_load_as_defaults() {
    let dir = temp_dir("fresh");
    let storage = FsStorage::new(dir.clone());

    assert_eq!(storage.load_settings().expect("settings"), SettingsDto::default());
    assert!(storage.load_recents().expect("recents").is_empty());
    assert!(!dir.exists());
}

#[test]
fn recents_roundtrip_in_order() {
    let dir = temp_dir("recents");
    let storage = FsStorage::new(dir.clone());
    let paths = vec!["/songs/b.mid".to_string(), "/songs/a.mid".to_string()];

    storage.save_recents(&paths).expect("save");
    assert_eq!(storage.load_recents().expect("load"), paths);

    let raw = std::fs::read_to_string(dir.join("recent_midi.json")).expect("file written");
    let parsed: Vec<String> = serde_json::from_str(&raw).expect("json array");
    assert_eq!(parsed, paths);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn corrupt_recents_report_a_serde_error() {
    let dir = temp_dir("corrupt");
    std::fs::create_dir_all(&dir).expect("mkdir");
    std::fs::write(dir.join("recent_midi.json"), b"{ not json").expect("write");

    let storage = FsStorage::new(dir.clone());
    assert!(matches!(storage.load_recents(), Err(StorageError::Serde(_))));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn partial_settings_fill_in_defaults() {
    let dir = temp_dir("settings");
    std::fs::create_dir_all(&dir).expect("mkdir");
    std::fs::write(dir.join("settings.json"), br#"{ "fall_speed_px_per_sec": 500.0 }"#)
        .expect("write");

    let storage = FsStorage::new(dir.clone());
    let settings = storage.load_settings().expect("settings");
    assert_eq!(settings.fall_speed_px_per_sec, 500.0);
    assert_eq!(settings.keybed_height_px, 80.0);
    assert_eq!(settings.tick_interval_ms, 16);
    assert_eq!(settings.recents_limit, 10);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn settings_roundtrip() {
    let dir = temp_dir("settings-save");
    let storage = FsStorage::new(dir.clone());
    let settings = SettingsDto {
        lookback_secs: 2.0,
        ..SettingsDto::default()
    };

    storage.save_settings(&settings).expect("save");
    assert_eq!(storage.load_settings().expect("load"), settings);

    let _ = std::fs::remove_dir_all(&dir);
}
