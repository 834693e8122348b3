use crate::clock::PlaybackClock;
use crate::ipc::{Command, Event, SessionState};
use crate::lod::{LodPolicy, RenderMode};
use crate::recents::RecentFiles;
use crate::renderer::{FrameRenderer, FrameStats, ViewConfig};
use crate::ticker::RenderTicker;
use keyfall_domain_timeline::{import_timeline_path, LoadError, Timeline};
use keyfall_ports::audio::{AudioError, AudioPlaybackPort};
use keyfall_ports::render::RenderSurface;
use keyfall_ports::storage::{SettingsDto, StorageError, StoragePort};
use keyfall_ports::types::{Seconds, Viewport};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("load failed: {0}")]
    Load(#[from] LoadError),
    #[error("audio error: {0}")]
    Audio(#[from] AudioError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("cannot {action} while {state:?}")]
    InvalidTransition {
        state: SessionState,
        action: &'static str,
    },
}

/// One playback session at a time: Idle, then Loading, then Playing until
/// cancelled, then Stopped and back to Idle.
///
/// Everything here runs on the host's UI thread. Audio is started and stopped
/// but never consulted for timing.
pub struct PlaybackSession {
    audio: Box<dyn AudioPlaybackPort>,
    storage: Option<Box<dyn StoragePort>>,
    settings: SettingsDto,
    state: SessionState,
    renderer: FrameRenderer,
    clock: PlaybackClock,
    ticker: RenderTicker,
    timeline: Option<Timeline>,
    current_path: Option<PathBuf>,
    recents: RecentFiles,
    events: VecDeque<Event>,
    last_mode: Option<RenderMode>,
}

impl PlaybackSession {
    pub fn new(audio: Box<dyn AudioPlaybackPort>, storage: Option<Box<dyn StoragePort>>) -> Self {
        let settings = match storage.as_ref() {
            Some(storage) => storage.load_settings().unwrap_or_else(|err| {
                log::warn!("using default settings: {err}");
                SettingsDto::default()
            }),
            None => SettingsDto::default(),
        };
        Self::with_settings(audio, storage, settings)
    }

    pub fn with_settings(
        audio: Box<dyn AudioPlaybackPort>,
        storage: Option<Box<dyn StoragePort>>,
        settings: SettingsDto,
    ) -> Self {
        let recents = match storage.as_deref() {
            Some(storage) => RecentFiles::load(storage, settings.recents_limit),
            None => RecentFiles::new(settings.recents_limit),
        };
        let renderer = FrameRenderer::new(ViewConfig::from(&settings), LodPolicy::default());
        let ticker = RenderTicker::new(Duration::from_millis(settings.tick_interval_ms));

        Self {
            audio,
            storage,
            settings,
            state: SessionState::Idle,
            renderer,
            clock: PlaybackClock::new(),
            ticker,
            timeline: None,
            current_path: None,
            recents,
            events: VecDeque::new(),
            last_mode: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn settings(&self) -> &SettingsDto {
        &self.settings
    }

    pub fn recents(&self) -> &RecentFiles {
        &self.recents
    }

    pub fn timeline(&self) -> Option<&Timeline> {
        self.timeline.as_ref()
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    pub fn renderer(&self) -> &FrameRenderer {
        &self.renderer
    }

    pub fn handle_command(&mut self, cmd: Command) -> Result<(), SessionError> {
        match cmd {
            Command::OpenFile { path } => self.open(Path::new(&path)),
            Command::Cancel => self.cancel(),
        }
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain(..).collect()
    }

    pub fn open(&mut self, path: &Path) -> Result<(), SessionError> {
        self.open_at(path, Instant::now())
    }

    /// Builds the timeline synchronously and starts playback anchored at `now`.
    /// On a load error nothing is installed and the session stays Idle.
    pub fn open_at(&mut self, path: &Path, now: Instant) -> Result<(), SessionError> {
        if self.state != SessionState::Idle {
            return Err(SessionError::InvalidTransition {
                state: self.state,
                action: "open a file",
            });
        }

        let display = path.to_string_lossy().into_owned();
        self.set_state(SessionState::Loading);
        log::info!("loading {display}");

        let timeline = match import_timeline_path(path) {
            Ok(timeline) => timeline,
            Err(err) => {
                log::warn!("failed to load {display}: {err}");
                self.events.push_back(Event::LoadFailed {
                    path: display,
                    message: err.to_string(),
                });
                self.set_state(SessionState::Idle);
                return Err(err.into());
            }
        };

        log::info!(
            "loaded {} notes spanning {:.1}s",
            timeline.len(),
            timeline.total_span()
        );
        self.remember(&display);
        self.events.push_back(Event::PlaybackStarted {
            path: display,
            note_count: timeline.len(),
            total_span: timeline.total_span(),
        });

        self.timeline = Some(timeline);
        self.current_path = Some(path.to_path_buf());
        self.last_mode = None;
        self.clock.start_at(now);
        self.ticker.start_at(now);
        self.start_audio(path);
        self.set_state(SessionState::Playing);
        Ok(())
    }

    /// Stops audio, clock and tick in one step, then returns to Idle.
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Playing {
            return Err(SessionError::InvalidTransition {
                state: self.state,
                action: "cancel",
            });
        }

        if let Err(err) = self.audio.stop() {
            log::warn!("audio stop failed: {err}");
        }
        self.clock.stop();
        self.ticker.stop();
        self.set_state(SessionState::Stopped);

        self.timeline = None;
        self.current_path = None;
        self.last_mode = None;
        self.set_state(SessionState::Idle);
        Ok(())
    }

    pub fn elapsed_at(&self, now: Instant) -> Option<Seconds> {
        if self.state != SessionState::Playing {
            return None;
        }
        self.clock.elapsed_at(now)
    }

    /// True when the host should draw a frame at `now`.
    pub fn poll_tick(&mut self, now: Instant) -> bool {
        self.state == SessionState::Playing && self.ticker.poll(now)
    }

    pub fn time_until_next_frame(&self, now: Instant) -> Option<Duration> {
        if self.state != SessionState::Playing {
            return None;
        }
        self.ticker.time_until_due(now)
    }

    pub fn render(
        &mut self,
        surface: &mut dyn RenderSurface,
        viewport: Viewport,
    ) -> Option<FrameStats> {
        self.render_at(surface, viewport, Instant::now())
    }

    /// Draws the current frame. Nothing is drawn outside Playing.
    pub fn render_at(
        &mut self,
        surface: &mut dyn RenderSurface,
        viewport: Viewport,
        now: Instant,
    ) -> Option<FrameStats> {
        let elapsed = self.elapsed_at(now)?;
        let timeline = self.timeline.as_ref()?;
        let stats = self.renderer.render(surface, viewport, timeline, elapsed);

        if self.last_mode != Some(stats.mode) {
            log::debug!(
                "render mode {:?} at {:.2}s ({} visible notes)",
                stats.mode,
                elapsed,
                stats.visible
            );
            self.last_mode = Some(stats.mode);
        }
        Some(stats)
    }

    fn start_audio(&mut self, path: &Path) {
        let result = (|| -> Result<(), AudioError> {
            if !self.audio.is_initialized() {
                self.audio.init()?;
            }
            self.audio.load(path)?;
            self.audio.play()
        })();

        if let Err(err) = result {
            log::warn!("audio unavailable, continuing without sound: {err}");
            self.events.push_back(Event::AudioUnavailable {
                message: err.to_string(),
            });
        }
    }

    fn remember(&mut self, path: &str) {
        self.recents.touch(path);
        if let Some(storage) = self.storage.as_ref() {
            if let Err(err) = storage.save_recents(self.recents.paths()) {
                log::warn!("could not save recent files: {err}");
            }
        }
        self.events.push_back(Event::RecentsUpdated {
            paths: self.recents.paths().to_vec(),
        });
    }

    fn set_state(&mut self, state: SessionState) {
        log::debug!("session {:?} -> {:?}", self.state, state);
        self.state = state;
        self.events.push_back(Event::SessionStateUpdated { state });
    }
}
