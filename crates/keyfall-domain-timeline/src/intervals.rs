use crate::model::{NoteInterval, Timeline};
use keyfall_ports::midi::TimedNoteEvent;
use keyfall_ports::types::{key_index_for_note, Seconds};

const NOTE_SLOTS: usize = 128;

/// Pairs note-on/note-off events into intervals.
///
/// One open start per MIDI note. A second note-on on a key that is already
/// open replaces the earlier start, and the earlier note is lost. Releases
/// without an open start are ignored, and notes still open when the stream
/// ends are dropped.
#[derive(Clone, Debug)]
pub struct IntervalBuilder {
    open: [Option<Seconds>; NOTE_SLOTS],
    intervals: Vec<NoteInterval>,
}

impl IntervalBuilder {
    pub fn new() -> Self {
        Self {
            open: [None; NOTE_SLOTS],
            intervals: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            open: [None; NOTE_SLOTS],
            intervals: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, event: TimedNoteEvent) {
        let note = event.kind.note();
        let Some(slot) = self.open.get_mut(note as usize) else {
            return;
        };

        if !event.kind.is_release() {
            *slot = Some(event.time_secs);
            return;
        }
        if let Some(start) = slot.take() {
            self.intervals.push(NoteInterval {
                pitch: key_index_for_note(note),
                start,
                duration: (event.time_secs - start).max(0.0),
            });
        }
    }

    /// Notes currently waiting for a release.
    pub fn open_count(&self) -> usize {
        self.open.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn matched_count(&self) -> usize {
        self.intervals.len()
    }

    pub fn finish(self) -> Timeline {
        Timeline::from_intervals(self.intervals)
    }
}

impl Default for IntervalBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_timeline<I>(events: I) -> Timeline
where
    I: IntoIterator<Item = TimedNoteEvent>,
{
    let events = events.into_iter();
    let mut builder = IntervalBuilder::with_capacity(events.size_hint().0 / 2);
    for event in events {
        builder.push(event);
    }
    builder.finish()
}
