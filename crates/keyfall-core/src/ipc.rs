use keyfall_ports::types::Seconds;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Idle,
    Loading,
    Playing,
    Stopped,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Command {
    OpenFile { path: String },
    Cancel,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Event {
    SessionStateUpdated { state: SessionState },
    PlaybackStarted {
        path: String,
        note_count: usize,
        total_span: Seconds,
    },
    LoadFailed { path: String, message: String },
    AudioUnavailable { message: String },
    RecentsUpdated { paths: Vec<String> },
}
