use crate::intervals::build_timeline;
use crate::model::Timeline;
use crate::tempo::{TempoMap, TempoPoint, Tick};
use keyfall_ports::midi::{NoteEventKind, TimedNoteEvent};
use midly::{Fps, MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("io error: {0}")]
    Io(String),
    #[error("parse error: {0}")]
    Parse(String),
}

pub fn import_timeline_path(path: &Path) -> Result<Timeline, LoadError> {
    let data = std::fs::read(path).map_err(|e| LoadError::Io(e.to_string()))?;
    import_timeline_bytes(&data)
}

pub fn import_timeline_bytes(data: &[u8]) -> Result<Timeline, LoadError> {
    let events = decode_midi_bytes(data)?;
    let timeline = build_timeline(events);
    log::debug!("built timeline with {} notes", timeline.len());
    Ok(timeline)
}

/// Merges every track into one note stream in absolute seconds.
///
/// Events on the same tick keep file order (track by track). Tempo events
/// from any track apply to all tracks.
pub fn decode_midi_bytes(data: &[u8]) -> Result<Vec<TimedNoteEvent>, LoadError> {
    let smf = Smf::parse(data).map_err(|e| LoadError::Parse(e.to_string()))?;
    let (ppq, tempo_override) = match smf.header.timing {
        Timing::Metrical(ticks) => (ticks.as_int(), None),
        Timing::Timecode(fps, ticks_per_frame) => {
            let (ppq, us_per_quarter) = timecode_ppq_and_tempo(fps, ticks_per_frame);
            (ppq, Some(us_per_quarter))
        }
    };

    let mut tempo_points: Vec<TempoPoint> = Vec::new();
    let mut note_events: Vec<(Tick, NoteEventKind)> = Vec::new();

    for track in &smf.tracks {
        let mut tick: Tick = 0;
        for event in track {
            tick += event.delta.as_int() as Tick;
            match &event.kind {
                TrackEventKind::Midi { message, .. } => match message {
                    MidiMessage::NoteOn { key, vel } => note_events.push((
                        tick,
                        NoteEventKind::NoteOn {
                            note: key.as_int(),
                            velocity: vel.as_int(),
                        },
                    )),
                    MidiMessage::NoteOff { key, .. } => {
                        note_events.push((tick, NoteEventKind::NoteOff { note: key.as_int() }))
                    }
                    _ => {}
                },
                TrackEventKind::Meta(MetaMessage::Tempo(us_per_quarter)) => {
                    tempo_points.push(TempoPoint {
                        tick,
                        us_per_quarter: us_per_quarter.as_int(),
                    });
                }
                _ => {}
            }
        }
    }

    let tempo_map = match tempo_override {
        Some(us_per_quarter) => TempoMap::new(
            ppq,
            vec![TempoPoint {
                tick: 0,
                us_per_quarter,
            }],
        ),
        None => TempoMap::new(ppq, tempo_points),
    };

    // Stable, so same-tick events stay in track order.
    note_events.sort_by_key(|(tick, _)| *tick);

    let events = note_events
        .into_iter()
        .map(|(tick, kind)| TimedNoteEvent {
            time_secs: tempo_map.tick_to_secs(tick),
            kind,
        })
        .collect::<Vec<_>>();

    log::debug!(
        "decoded {} note events from {} tracks (ppq {})",
        events.len(),
        smf.tracks.len(),
        ppq
    );
    Ok(events)
}

fn timecode_ppq_and_tempo(fps: Fps, ticks_per_frame: u8) -> (u16, u32) {
    let ticks_per_frame = ticks_per_frame.max(1) as u16;
    match fps {
        Fps::Fps24 => (24 * ticks_per_frame, 1_000_000),
        Fps::Fps25 => (25 * ticks_per_frame, 1_000_000),
        Fps::Fps30 => (30 * ticks_per_frame, 1_000_000),
        Fps::Fps29 => (30 * ticks_per_frame, 1_001_000),
    }
}
