use crate::types::Seconds;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteEventKind {
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8 },
}

impl NoteEventKind {
    pub fn note(&self) -> u8 {
        match self {
            NoteEventKind::NoteOn { note, .. } => *note,
            NoteEventKind::NoteOff { note } => *note,
        }
    }

    /// A note-on with velocity 0 releases the key, same as a note-off.
    pub fn is_release(&self) -> bool {
        match self {
            NoteEventKind::NoteOn { velocity, .. } => *velocity == 0,
            NoteEventKind::NoteOff { .. } => true,
        }
    }
}

/// A decoded note event at an absolute time in seconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimedNoteEvent {
    pub time_secs: Seconds,
    pub kind: NoteEventKind,
}

impl TimedNoteEvent {
    pub fn note_on(time_secs: Seconds, note: u8, velocity: u8) -> Self {
        Self {
            time_secs,
            kind: NoteEventKind::NoteOn { note, velocity },
        }
    }

    pub fn note_off(time_secs: Seconds, note: u8) -> Self {
        Self {
            time_secs,
            kind: NoteEventKind::NoteOff { note },
        }
    }
}
