use keyfall_domain_timeline::{NoteInterval, Timeline};
use keyfall_ports::types::note_for_key_index;
use std::f32::consts::TAU;
use std::sync::Arc;

const AMPLITUDE: f32 = 0.15;
const RELEASE_SECS: f32 = 0.2;

/// Plays a Timeline as plain sine voices, one sample at a time.
pub struct NoteVoicer {
    timeline: Arc<Timeline>,
    cursor: usize,
    sample_rate_hz: f32,
    sample_time: u64,
    max_voices: usize,
    voices: Vec<Voice>,
    note_counter: u64,
}

#[derive(Clone, Debug)]
struct Voice {
    phase: f32,
    phase_step: f32,
    end_sample: u64,
    release_samples_left: u32,
    release_total_samples: u32,
    age: u64,
}

impl NoteVoicer {
    pub fn new(timeline: Arc<Timeline>, sample_rate_hz: u32, max_voices: usize) -> Self {
        Self {
            timeline,
            cursor: 0,
            sample_rate_hz: sample_rate_hz.max(1) as f32,
            sample_time: 0,
            max_voices: max_voices.max(8),
            voices: Vec::new(),
            note_counter: 0,
        }
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.timeline.len() && self.voices.is_empty()
    }

    /// Fills `out` with mono samples and advances the playhead.
    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            self.start_due_notes();

            let now = self.sample_time;
            let mut mixed = 0.0;
            for voice in &mut self.voices {
                let mut gain = 1.0;
                if now >= voice.end_sample {
                    gain = voice.release_samples_left as f32 / voice.release_total_samples as f32;
                    voice.release_samples_left = voice.release_samples_left.saturating_sub(1);
                }
                mixed += voice.phase.sin() * gain * AMPLITUDE;
                voice.phase += voice.phase_step;
                if voice.phase >= TAU {
                    voice.phase -= TAU;
                }
            }
            self.voices
                .retain(|voice| now < voice.end_sample || voice.release_samples_left > 0);

            *sample = mixed.clamp(-1.0, 1.0);
            self.sample_time += 1;
        }
    }

    fn start_due_notes(&mut self) {
        let now = self.sample_time;
        while let Some(note) = self.timeline.notes().get(self.cursor).copied() {
            if self.secs_to_samples(note.start) > now {
                break;
            }
            self.note_on(&note);
            self.cursor += 1;
        }
    }

    fn note_on(&mut self, note: &NoteInterval) {
        self.note_counter = self.note_counter.wrapping_add(1);
        if self.voices.len() >= self.max_voices {
            if let Some((idx, _)) = self
                .voices
                .iter()
                .enumerate()
                .min_by_key(|(_, voice)| voice.age)
            {
                self.voices.swap_remove(idx);
            }
        }

        let midi_note = note_for_key_index(note.pitch) as f32;
        let freq = 440.0 * 2.0_f32.powf((midi_note - 69.0) / 12.0);
        let release_total_samples = ((self.sample_rate_hz * RELEASE_SECS) as u32).max(1);
        self.voices.push(Voice {
            phase: 0.0,
            phase_step: TAU * freq / self.sample_rate_hz,
            end_sample: self.secs_to_samples(note.end()),
            release_samples_left: release_total_samples,
            release_total_samples,
            age: self.note_counter,
        });
    }

    fn secs_to_samples(&self, secs: f64) -> u64 {
        if secs <= 0.0 {
            return 0;
        }
        (secs * self.sample_rate_hz as f64).round() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voicer(notes: Vec<NoteInterval>, max_voices: usize) -> NoteVoicer {
        NoteVoicer::new(Arc::new(Timeline::from_intervals(notes)), 1_000, max_voices)
    }

    #[test]
    fn silent_until_first_note() {
        let mut v = voicer(vec![NoteInterval::new(48, 0.5, 0.5)], 8);
        let mut out = vec![1.0; 400];
        v.render(&mut out);
        assert!(out.iter().all(|s| *s == 0.0));
        assert_eq!(v.active_voices(), 0);

        let mut out = vec![0.0; 200];
        v.render(&mut out);
        assert_eq!(v.active_voices(), 1);
        assert!(out.iter().any(|s| s.abs() > 0.01));
    }

    #[test]
    fn finishes_after_release() {
        let mut v = voicer(vec![NoteInterval::new(48, 0.0, 0.1)], 8);
        let mut out = vec![0.0; 250];
        v.render(&mut out);
        assert!(!v.is_finished());

        let mut out = vec![0.0; 100];
        v.render(&mut out);
        assert!(v.is_finished());
    }

    #[test]
    fn oldest_voice_is_stolen_at_the_cap() {
        let notes = (0..12).map(|i| NoteInterval::new(40 + i, 0.0, 1.0)).collect();
        let mut v = voicer(notes, 8);
        let mut out = vec![0.0; 10];
        v.render(&mut out);
        assert_eq!(v.active_voices(), 8);
    }
}
