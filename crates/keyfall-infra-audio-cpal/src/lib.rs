pub mod voices;

pub use voices::NoteVoicer;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample, StreamConfig};
use keyfall_domain_timeline::{import_timeline_path, Timeline};
use keyfall_ports::audio::{AudioError, AudioPlaybackPort};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::{mpsc, Arc};
use std::thread;

const MAX_VOICES: usize = 64;

/// Plays a MIDI file through the default cpal output device.
///
/// The stream lives on its own thread because cpal streams are not `Send`;
/// `stop` signals that thread and joins it.
pub struct CpalMidiPlayer {
    inner: Mutex<PlayerState>,
}

#[derive(Default)]
struct PlayerState {
    device_name: Option<String>,
    timeline: Option<Arc<Timeline>>,
    stream: Option<StreamThread>,
}

struct StreamThread {
    stop_tx: mpsc::Sender<()>,
    join_handle: Option<thread::JoinHandle<()>>,
}

impl StreamThread {
    fn close(mut self) {
        let _ = self.stop_tx.send(());
        if let Some(handle) = self.join_handle.take() {
            let _ = handle.join();
        }
    }
}

impl CpalMidiPlayer {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(PlayerState::default()),
        }
    }

    pub fn device_name(&self) -> Option<String> {
        self.inner.lock().device_name.clone()
    }

    fn default_device() -> Result<cpal::Device, AudioError> {
        cpal::default_host()
            .default_output_device()
            .ok_or_else(|| AudioError::DeviceNotFound("default output".to_string()))
    }

    fn spawn_stream(timeline: Arc<Timeline>) -> Result<StreamThread, AudioError> {
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let join_handle = thread::spawn(move || {
            let stream = match Self::default_device().and_then(|device| open_stream(&device, timeline))
            {
                Ok(stream) => stream,
                Err(err) => {
                    let _ = ready_tx.send(Err(err));
                    return;
                }
            };

            if let Err(err) = stream.play() {
                let _ = ready_tx.send(Err(AudioError::Backend(err.to_string())));
                return;
            }

            let _ = ready_tx.send(Ok(()));
            let _ = stop_rx.recv();
            drop(stream);
        });

        match ready_rx
            .recv()
            .map_err(|e| AudioError::Backend(e.to_string()))?
        {
            Ok(()) => Ok(StreamThread {
                stop_tx,
                join_handle: Some(join_handle),
            }),
            Err(err) => Err(err),
        }
    }
}

impl Default for CpalMidiPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioPlaybackPort for CpalMidiPlayer {
    fn is_initialized(&self) -> bool {
        self.inner.lock().device_name.is_some()
    }

    fn init(&self) -> Result<(), AudioError> {
        let device = Self::default_device()?;
        device
            .default_output_config()
            .map_err(|e| AudioError::UnsupportedConfig(e.to_string()))?;
        let name = device
            .name()
            .unwrap_or_else(|_| "Unknown Output".to_string());
        log::info!("audio output: {name}");
        self.inner.lock().device_name = Some(name);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<(), AudioError> {
        let timeline = import_timeline_path(path).map_err(|e| AudioError::Load(e.to_string()))?;
        let mut state = self.inner.lock();
        if let Some(stream) = state.stream.take() {
            stream.close();
        }
        state.timeline = Some(Arc::new(timeline));
        Ok(())
    }

    fn play(&self) -> Result<(), AudioError> {
        let mut state = self.inner.lock();
        if state.device_name.is_none() {
            return Err(AudioError::NotInitialized);
        }
        let timeline = state
            .timeline
            .clone()
            .ok_or_else(|| AudioError::Load("nothing loaded".to_string()))?;
        if let Some(stream) = state.stream.take() {
            stream.close();
        }
        state.stream = Some(Self::spawn_stream(timeline)?);
        Ok(())
    }

    fn stop(&self) -> Result<(), AudioError> {
        let stream = self.inner.lock().stream.take();
        if let Some(stream) = stream {
            stream.close();
        }
        Ok(())
    }
}

impl Drop for CpalMidiPlayer {
    fn drop(&mut self) {
        if let Some(stream) = self.inner.get_mut().stream.take() {
            stream.close();
        }
    }
}

fn open_stream(device: &cpal::Device, timeline: Arc<Timeline>) -> Result<cpal::Stream, AudioError> {
    let supported = device
        .default_output_config()
        .map_err(|e| AudioError::UnsupportedConfig(e.to_string()))?;
    let sample_format = supported.sample_format();
    let config = supported.config();
    let voicer = NoteVoicer::new(timeline, config.sample_rate.0, MAX_VOICES);

    match sample_format {
        SampleFormat::F32 => build_stream::<f32>(device, &config, voicer),
        SampleFormat::I16 => build_stream::<i16>(device, &config, voicer),
        SampleFormat::U16 => build_stream::<u16>(device, &config, voicer),
        other => Err(AudioError::UnsupportedConfig(format!(
            "sample format {other:?}"
        ))),
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    mut voicer: NoteVoicer,
) -> Result<cpal::Stream, AudioError>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = (config.channels as usize).max(1);
    let mut mono: Vec<f32> = vec![0.0; 8192];

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _info: &cpal::OutputCallbackInfo| {
                let frames = data.len() / channels;
                if frames > mono.len() {
                    mono.resize(frames, 0.0);
                }
                voicer.render(&mut mono[..frames]);
                for (frame, value) in data.chunks_mut(channels).zip(mono.iter()) {
                    let sample = T::from_sample(*value);
                    for out in frame.iter_mut() {
                        *out = sample;
                    }
                }
            },
            |err| log::error!("cpal stream error: {err}"),
            None,
        )
        .map_err(|e| AudioError::Backend(e.to_string()))
}
