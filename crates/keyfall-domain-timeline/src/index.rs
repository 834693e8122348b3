use crate::model::{Timeline, VisibleSlice};
use keyfall_ports::types::Seconds;

/// Notes whose start lies in `[window_start, window_end]`.
///
/// Both bounds are found by binary search. Notes that began before the
/// window but are still sounding are not included; the renderer clips
/// geometry on its own.
pub fn visible_range(
    timeline: &Timeline,
    window_start: Seconds,
    window_end: Seconds,
) -> VisibleSlice<'_> {
    let notes = timeline.notes();
    let lo = notes.partition_point(|note| note.start < window_start);
    let hi = notes.partition_point(|note| note.start <= window_end).max(lo);
    VisibleSlice::new(&notes[lo..hi], lo)
}

impl Timeline {
    pub fn visible_range(&self, window_start: Seconds, window_end: Seconds) -> VisibleSlice<'_> {
        visible_range(self, window_start, window_end)
    }
}
