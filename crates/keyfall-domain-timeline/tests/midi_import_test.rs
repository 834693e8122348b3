use keyfall_domain_timeline::{
    decode_midi_bytes, import_timeline_bytes, import_timeline_path, LoadError, NoteInterval,
};
use keyfall_ports::midi::NoteEventKind;
use midly::num::{u24, u28, u4, u7};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn build_midi(tracks: Vec<Vec<TrackEvent<'static>>>) -> Vec<u8> {
    let format = if tracks.len() > 1 {
        Format::Parallel
    } else {
        Format::SingleTrack
    };
    let smf = Smf {
        header: Header {
            format,
            timing: Timing::Metrical(480.into()),
        },
        tracks,
    };
    let mut data = Vec::new();
    smf.write(&mut data).expect("midi write should succeed");
    data
}

fn midi(delta: u32, message: MidiMessage) -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::new(delta),
        kind: TrackEventKind::Midi {
            channel: u4::new(0),
            message,
        },
    }
}

fn note_on(delta: u32, key: u8, vel: u8) -> TrackEvent<'static> {
    midi(
        delta,
        MidiMessage::NoteOn {
            key: u7::new(key),
            vel: u7::new(vel),
        },
    )
}

fn note_off(delta: u32, key: u8) -> TrackEvent<'static> {
    midi(
        delta,
        MidiMessage::NoteOff {
            key: u7::new(key),
            vel: u7::new(64),
        },
    )
}

fn tempo(delta: u32, us_per_quarter: u32) -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::new(delta),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(us_per_quarter))),
    }
}

fn end_of_track() -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    }
}

fn temp_midi_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!("keyfall-{name}-{nanos}.mid"))
}

#[test]
fn single_track_note_converts_ticks_to_seconds() {
    let data = build_midi(vec![vec![
        note_on(0, 60, 100),
        note_off(480, 60),
        end_of_track(),
    ]]);

    let timeline = import_timeline_bytes(&data).expect("import should succeed");
    assert_eq!(timeline.notes(), &[NoteInterval::new(39, 0.0, 0.5)]);
}

#[test]
fn tracks_are_merged_and_share_the_tempo_track() {
    let conductor = vec![tempo(0, 1_000_000), end_of_track()];
    let right = vec![note_on(480, 72, 90), note_off(480, 72), end_of_track()];
    let left = vec![note_on(0, 48, 90), note_on(960, 48, 0), end_of_track()];
    let data = build_midi(vec![conductor, right, left]);

    let timeline = import_timeline_bytes(&data).expect("import should succeed");
    assert_eq!(
        timeline.notes(),
        &[
            NoteInterval::new(27, 0.0, 2.0),
            NoteInterval::new(51, 1.0, 1.0),
        ]
    );
}

#[test]
fn same_tick_events_keep_track_order() {
    let first = vec![note_on(0, 60, 100), note_off(480, 60), end_of_track()];
    let second = vec![note_on(480, 60, 100), note_off(480, 60), end_of_track()];
    let data = build_midi(vec![first, second]);

    let events = decode_midi_bytes(&data).expect("decode should succeed");
    let kinds: Vec<_> = events.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NoteEventKind::NoteOn {
                note: 60,
                velocity: 100
            },
            NoteEventKind::NoteOff { note: 60 },
            NoteEventKind::NoteOn {
                note: 60,
                velocity: 100
            },
            NoteEventKind::NoteOff { note: 60 },
        ]
    );

    let timeline = import_timeline_bytes(&data).expect("import should succeed");
    assert_eq!(timeline.len(), 2);
}

#[test]
fn mid_piece_tempo_change_stretches_later_notes() {
    let data = build_midi(vec![vec![
        note_on(0, 60, 100),
        note_off(480, 60),
        tempo(0, 250_000),
        note_on(0, 62, 100),
        note_off(480, 62),
        end_of_track(),
    ]]);

    let timeline = import_timeline_bytes(&data).expect("import should succeed");
    assert_eq!(
        timeline.notes(),
        &[
            NoteInterval::new(39, 0.0, 0.5),
            NoteInterval::new(41, 0.5, 0.25),
        ]
    );
}

#[test]
fn file_without_notes_is_an_empty_timeline() {
    let data = build_midi(vec![vec![tempo(0, 500_000), end_of_track()]]);
    let timeline = import_timeline_bytes(&data).expect("import should succeed");
    assert!(timeline.is_empty());
}

#[test]
fn garbage_bytes_are_a_parse_error() {
    let result = import_timeline_bytes(b"definitely not a midi file");
    assert!(matches!(result, Err(LoadError::Parse(_))));
}

#[test]
fn missing_file_is_an_io_error() {
    let path = temp_midi_path("missing");
    let result = import_timeline_path(&path);
    assert!(matches!(result, Err(LoadError::Io(_))));
}

#[test]
fn import_from_path_reads_the_file() {
    let path = temp_midi_path("from-path");
    let data = build_midi(vec![vec![note_on(0, 21, 100), note_off(960, 21), end_of_track()]]);
    std::fs::write(&path, data).expect("write fixture");

    let timeline = import_timeline_path(&path).expect("import should succeed");
    assert_eq!(timeline.notes(), &[NoteInterval::new(0, 0.0, 1.0)]);

    let _ = std::fs::remove_file(&path);
}
