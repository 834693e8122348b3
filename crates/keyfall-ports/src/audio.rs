use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum AudioError {
    #[error("audio not initialized")]
    NotInitialized,
    #[error("device not found: {0}")]
    DeviceNotFound(String),
    #[error("unsupported config: {0}")]
    UnsupportedConfig(String),
    #[error("load failed: {0}")]
    Load(String),
    #[error("backend error: {0}")]
    Backend(String),
}

/// Fire-and-forget playback of a whole file. The session starts it once and
/// stops it once; visual timing never reads from it.
pub trait AudioPlaybackPort: Send + Sync {
    fn is_initialized(&self) -> bool;
    fn init(&self) -> Result<(), AudioError>;

    fn load(&self, path: &Path) -> Result<(), AudioError>;
    fn play(&self) -> Result<(), AudioError>;
    fn stop(&self) -> Result<(), AudioError>;
}

/// Playback port for hosts without an audio device.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentAudio;

impl AudioPlaybackPort for SilentAudio {
    fn is_initialized(&self) -> bool {
        true
    }

    fn init(&self) -> Result<(), AudioError> {
        Ok(())
    }

    fn load(&self, _path: &Path) -> Result<(), AudioError> {
        Ok(())
    }

    fn play(&self) -> Result<(), AudioError> {
        Ok(())
    }

    fn stop(&self) -> Result<(), AudioError> {
        Ok(())
    }
}
