use serde::{Deserialize, Serialize};

/// Seconds since the start of a piece.
pub type Seconds = f64;

/// Zero-based piano key index. 0 is A0; 87 is C8. Values outside that range
/// are carried through and rejected by the renderer's clipping.
pub type KeyIndex = i16;

/// MIDI note number of the lowest piano key (A0).
pub const LOWEST_KEY_NOTE: u8 = 21;

/// Number of keys on the keybed.
pub const KEY_COUNT: usize = 88;

pub fn key_index_for_note(note: u8) -> KeyIndex {
    note as KeyIndex - LOWEST_KEY_NOTE as KeyIndex
}

pub fn note_for_key_index(key: KeyIndex) -> i32 {
    key as i32 + LOWEST_KEY_NOTE as i32
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }
}
