mod app;
mod surface;

use app::KeyfallApp;
use clap::Parser;
use keyfall_core::PlaybackSession;
use keyfall_infra_audio_cpal::CpalMidiPlayer;
use keyfall_infra_storage_fs::FsStorage;
use keyfall_ports::storage::StoragePort;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "keyfall")]
#[command(about = "Falling-notes piano visualizer for MIDI files")]
struct Cli {
    /// MIDI file to start playing immediately
    file: Option<PathBuf>,

    /// Directory for settings and the recent files list
    #[arg(long)]
    config_dir: Option<PathBuf>,
}

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    let storage: Box<dyn StoragePort> = match cli.config_dir {
        Some(dir) => Box::new(FsStorage::new(dir)),
        None => Box::new(FsStorage::default()),
    };
    let mut session = PlaybackSession::new(Box::new(CpalMidiPlayer::new()), Some(storage));

    if let Some(path) = cli.file {
        if let Err(err) = session.open(&path) {
            log::error!("could not open {}: {err}", path.display());
        }
    }

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1100.0, 700.0])
        .with_title("keyfall");
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "keyfall",
        options,
        Box::new(move |_cc| Box::new(KeyfallApp::new(session))),
    )
}
