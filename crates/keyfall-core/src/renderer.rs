use crate::lod::{LodDecision, LodPolicy, RenderMode};
use keyfall_domain_timeline::{NoteInterval, Timeline, VisibleSlice};
use keyfall_ports::render::{RectPx, RenderSurface, Rgba};
use keyfall_ports::storage::SettingsDto;
use keyfall_ports::types::{Seconds, Viewport, KEY_COUNT};

pub const BACKGROUND: Rgba = Rgba::rgb(10, 10, 10);
pub const KEY_GAP: Rgba = Rgba::BLACK;
pub const WHITE_KEY: Rgba = Rgba::WHITE;
pub const BLACK_KEY: Rgba = Rgba::rgb(40, 40, 40);
pub const SOUNDING_HIGHLIGHT: Rgba = Rgba::rgba(255, 255, 255, 120);
pub const PROGRESS: Rgba = Rgba::rgb(46, 204, 113);

pub const PROGRESS_BAR_HEIGHT: f32 = 3.0;
pub const HIGHLIGHT_STRIP_HEIGHT: f32 = 10.0;
/// Seconds added to the progress denominator so the bar fills just after the
/// last note ends.
pub const PROGRESS_TAIL_SECS: Seconds = 1.0;

const NOTE_GAP: f32 = 1.0;
// Applied to the offset key index (0 = A0), not the raw MIDI note number.
const HUE_STEP: i32 = 14;
const NOTE_SATURATION: u8 = 180;
const NOTE_VALUE: u8 = 255;

const BLACK_KEY_OFFSETS: [usize; 5] = [1, 4, 6, 9, 11];
const BLACK_KEY_WIDTH: f32 = 0.7;
const BLACK_KEY_HEIGHT: f32 = 0.6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewConfig {
    /// Pixels per second of fall.
    pub fall_speed: f32,
    pub keybed_height: f32,
    /// How far behind the playhead note starts are still fetched.
    pub lookback_secs: Seconds,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self::from(&SettingsDto::default())
    }
}

impl From<&SettingsDto> for ViewConfig {
    fn from(settings: &SettingsDto) -> Self {
        Self {
            fall_speed: settings.fall_speed_px_per_sec.max(1.0),
            keybed_height: settings.keybed_height_px.max(0.0),
            lookback_secs: settings.lookback_secs.max(0.0),
        }
    }
}

impl ViewConfig {
    /// Height of the area notes fall through; the keybed line sits at its bottom.
    pub fn playfield_height(&self, viewport: Viewport) -> f32 {
        (viewport.height - self.keybed_height).max(0.0)
    }

    pub fn lookahead_secs(&self, viewport: Viewport) -> Seconds {
        self.playfield_height(viewport) as f64 / self.fall_speed as f64
    }

    pub fn visible_window(&self, viewport: Viewport, elapsed: Seconds) -> (Seconds, Seconds) {
        (
            elapsed - self.lookback_secs,
            elapsed + self.lookahead_secs(viewport),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameStats {
    pub visible: usize,
    pub drawn: usize,
    pub skipped: usize,
    pub mode: RenderMode,
}

pub fn key_width(viewport: Viewport) -> f32 {
    viewport.width / KEY_COUNT as f32
}

pub fn is_black_key(key: usize) -> bool {
    BLACK_KEY_OFFSETS.contains(&(key % 12))
}

/// Hue advances 14 degrees per key.
pub fn note_color(pitch: i16) -> Rgba {
    let hue = (pitch as i32 * HUE_STEP).rem_euclid(360) as u16;
    Rgba::from_hsv(hue, NOTE_SATURATION, NOTE_VALUE)
}

/// Fraction of the progress bar to fill, clamped to `[0, 1]`. An empty
/// timeline (`None`) is already complete.
pub fn progress_fraction(elapsed: Seconds, total_span: Option<Seconds>) -> f32 {
    match total_span {
        Some(span) => (elapsed / (span + PROGRESS_TAIL_SECS)).clamp(0.0, 1.0) as f32,
        None => 1.0,
    }
}

/// Screen rectangle for a note, or `None` when it is off the keybed range or
/// entirely outside the playfield.
pub fn note_rect(
    note: &NoteInterval,
    viewport: Viewport,
    config: &ViewConfig,
    elapsed: Seconds,
) -> Option<RectPx> {
    if note.pitch < 0 || note.pitch as usize >= KEY_COUNT {
        return None;
    }

    let playfield = config.playfield_height(viewport);
    let speed = config.fall_speed as f64;
    let y_bottom = playfield - ((note.start - elapsed) * speed) as f32;
    let y_top = playfield - ((note.end() - elapsed) * speed) as f32;
    if y_bottom < 0.0 || y_top >= playfield {
        return None;
    }

    let kw = key_width(viewport);
    Some(RectPx::new(
        note.pitch as f32 * kw,
        y_top,
        (kw - NOTE_GAP).max(0.0),
        (y_bottom - y_top).max(0.0),
    ))
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FrameRenderer {
    config: ViewConfig,
    policy: LodPolicy,
}

impl FrameRenderer {
    pub fn new(config: ViewConfig, policy: LodPolicy) -> Self {
        Self { config, policy }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn policy(&self) -> &LodPolicy {
        &self.policy
    }

    /// Draws one frame of `timeline` at `elapsed`. Reads only.
    pub fn render(
        &self,
        surface: &mut dyn RenderSurface,
        viewport: Viewport,
        timeline: &Timeline,
        elapsed: Seconds,
    ) -> FrameStats {
        let (window_start, window_end) = self.config.visible_window(viewport, elapsed);
        let slice = timeline.visible_range(window_start, window_end);
        let decision = self.policy.decide(slice.len());
        let span = (!timeline.is_empty()).then(|| timeline.total_span());
        self.draw_frame(surface, viewport, slice, decision, elapsed, span)
    }

    pub fn draw_frame(
        &self,
        surface: &mut dyn RenderSurface,
        viewport: Viewport,
        slice: VisibleSlice<'_>,
        decision: LodDecision,
        elapsed: Seconds,
        total_span: Option<Seconds>,
    ) -> FrameStats {
        surface.set_antialiasing(decision.antialias);
        surface.fill_rect(
            RectPx::new(0.0, 0.0, viewport.width, viewport.height),
            BACKGROUND,
        );

        let mut stats = FrameStats {
            visible: slice.len(),
            drawn: 0,
            skipped: 0,
            mode: decision.mode,
        };

        let playfield = self.config.playfield_height(viewport);
        for note in decision.thin(slice.notes()) {
            let Some(rect) = note_rect(note, viewport, &self.config, elapsed) else {
                stats.skipped += 1;
                continue;
            };

            if decision.highlight_active && note.is_sounding_at(elapsed) {
                surface.fill_rect(
                    RectPx::new(
                        rect.x,
                        playfield - HIGHLIGHT_STRIP_HEIGHT,
                        rect.width,
                        HIGHLIGHT_STRIP_HEIGHT,
                    ),
                    SOUNDING_HIGHLIGHT,
                );
            }
            surface.fill_rect(rect, note_color(note.pitch));
            stats.drawn += 1;
        }

        self.draw_keybed(surface, viewport);
        self.draw_progress(surface, viewport, progress_fraction(elapsed, total_span));
        stats
    }

    pub fn draw_keybed(&self, surface: &mut dyn RenderSurface, viewport: Viewport) {
        let kw = key_width(viewport);
        let top = self.config.playfield_height(viewport);
        let height = viewport.height - top;

        surface.fill_rect(RectPx::new(0.0, top, viewport.width, height), KEY_GAP);
        for key in 0..KEY_COUNT {
            surface.fill_rect(
                RectPx::new(key as f32 * kw, top, (kw - NOTE_GAP).max(0.0), height),
                WHITE_KEY,
            );
        }

        let black_width = kw * BLACK_KEY_WIDTH;
        for key in (0..KEY_COUNT).filter(|key| is_black_key(*key)) {
            surface.fill_rect(
                RectPx::new(
                    key as f32 * kw - black_width / 2.0,
                    top,
                    black_width,
                    height * BLACK_KEY_HEIGHT,
                ),
                BLACK_KEY,
            );
        }
    }

    fn draw_progress(&self, surface: &mut dyn RenderSurface, viewport: Viewport, fraction: f32) {
        surface.fill_rect(
            RectPx::new(0.0, 0.0, viewport.width * fraction, PROGRESS_BAR_HEIGHT),
            PROGRESS,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keybed_has_36_black_keys() {
        let count = (0..KEY_COUNT).filter(|key| is_black_key(*key)).count();
        assert_eq!(count, 36);
        assert!(!is_black_key(0));
        assert!(is_black_key(1));
        assert!(!is_black_key(87));
    }

    #[test]
    fn note_colors_repeat_with_hue() {
        assert_eq!(note_color(0), Rgba::from_hsv(0, 180, 255));
        assert_eq!(note_color(1), Rgba::from_hsv(14, 180, 255));
        assert_eq!(note_color(-1), Rgba::from_hsv(346, 180, 255));
        assert_eq!(note_color(180), note_color(0));
    }

    #[test]
    fn progress_is_padded_and_clamped() {
        assert_eq!(progress_fraction(0.0, Some(3.0)), 0.0);
        assert_eq!(progress_fraction(2.0, Some(3.0)), 0.5);
        assert!(progress_fraction(3.0, Some(3.0)) < 1.0);
        assert_eq!(progress_fraction(100.0, Some(3.0)), 1.0);
        assert_eq!(progress_fraction(-1.0, Some(3.0)), 0.0);
        assert_eq!(progress_fraction(0.0, None), 1.0);
    }
}
