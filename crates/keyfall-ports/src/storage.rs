use serde::{Deserialize, Serialize};

fn default_fall_speed() -> f32 {
    350.0
}

fn default_keybed_height() -> f32 {
    80.0
}

fn default_lookback_secs() -> f64 {
    1.0
}

fn default_tick_interval_ms() -> u64 {
    16
}

fn default_recents_limit() -> usize {
    10
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(String),
    #[error("serialization error: {0}")]
    Serde(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsDto {
    #[serde(default = "default_fall_speed")]
    pub fall_speed_px_per_sec: f32,
    #[serde(default = "default_keybed_height")]
    pub keybed_height_px: f32,
    #[serde(default = "default_lookback_secs")]
    pub lookback_secs: f64,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_recents_limit")]
    pub recents_limit: usize,
}

impl Default for SettingsDto {
    fn default() -> Self {
        Self {
            fall_speed_px_per_sec: default_fall_speed(),
            keybed_height_px: default_keybed_height(),
            lookback_secs: default_lookback_secs(),
            tick_interval_ms: default_tick_interval_ms(),
            recents_limit: default_recents_limit(),
        }
    }
}

pub trait StoragePort: Send + Sync {
    fn load_settings(&self) -> Result<SettingsDto, StorageError>;
    fn save_settings(&self, s: &SettingsDto) -> Result<(), StorageError>;

    /// Most-recent-first. A missing document is an empty list.
    fn load_recents(&self) -> Result<Vec<String>, StorageError>;
    fn save_recents(&self, paths: &[String]) -> Result<(), StorageError>;
}
