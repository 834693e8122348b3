use keyfall_ports::types::{KeyIndex, Seconds};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoteInterval {
    pub pitch: KeyIndex,
    pub start: Seconds,
    pub duration: Seconds,
}

impl NoteInterval {
    pub fn new(pitch: KeyIndex, start: Seconds, duration: Seconds) -> Self {
        Self {
            pitch,
            start,
            duration,
        }
    }

    pub fn end(&self) -> Seconds {
        self.start + self.duration
    }

    /// Inclusive on both ends, so a zero-length note sounds at its start.
    pub fn is_sounding_at(&self, t: Seconds) -> bool {
        self.start <= t && t <= self.end()
    }
}

/// Note intervals sorted ascending by start. Built once per load and never
/// mutated; a new file gets a new Timeline.
///
/// Serialized as a plain list of notes. Deserializing sorts, so a stored
/// timeline cannot break the start ordering the range query relies on.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<NoteInterval>", into = "Vec<NoteInterval>")]
pub struct Timeline {
    notes: Vec<NoteInterval>,
}

impl Timeline {
    pub fn from_intervals(mut notes: Vec<NoteInterval>) -> Self {
        notes.sort_by(|a, b| a.start.total_cmp(&b.start));
        Self { notes }
    }

    pub fn notes(&self) -> &[NoteInterval] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// End of the last-starting note, or 0 for an empty timeline.
    pub fn total_span(&self) -> Seconds {
        self.notes.last().map(NoteInterval::end).unwrap_or(0.0)
    }
}

impl From<Vec<NoteInterval>> for Timeline {
    fn from(notes: Vec<NoteInterval>) -> Self {
        Self::from_intervals(notes)
    }
}

impl From<Timeline> for Vec<NoteInterval> {
    fn from(timeline: Timeline) -> Self {
        timeline.notes
    }
}

/// Contiguous run of a Timeline, recomputed each frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibleSlice<'a> {
    notes: &'a [NoteInterval],
    offset: usize,
}

impl<'a> VisibleSlice<'a> {
    pub(crate) fn new(notes: &'a [NoteInterval], offset: usize) -> Self {
        Self { notes, offset }
    }

    pub fn notes(&self) -> &'a [NoteInterval] {
        self.notes
    }

    /// Indices of the slice within its Timeline.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.notes.len()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}
