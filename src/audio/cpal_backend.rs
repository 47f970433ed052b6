//! Default audio backend: cpal for microphone capture, rodio for playback.
//!
//! Neither handle is `Send`; both the cpal input stream and the rodio output
//! stream stay on the thread that created them.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, error, info};

use super::backend::{AudioBackend, PlaybackHandle, RecorderSettings, RecordingHandle};
use super::error::{AudioError, AudioResult};
use super::wav_sink::{wav_duration, WavSink};

type SharedSink = Arc<Mutex<Option<WavSink>>>;

pub struct CpalBackend {
    volume: f32,
}

impl CpalBackend {
    pub fn new(volume: f32) -> Self {
        Self { volume }
    }
}

impl Default for CpalBackend {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl AudioBackend for CpalBackend {
    fn open_recorder(
        &self,
        settings: &RecorderSettings,
        path: &Path,
    ) -> AudioResult<Box<dyn RecordingHandle>> {
        Ok(Box::new(MicRecorder::new(settings.clone(), path)))
    }

    fn open_player(&self, path: &Path) -> AudioResult<Box<dyn PlaybackHandle>> {
        Ok(Box::new(FilePlayer::open(path, self.volume)?))
    }
}

pub struct MicRecorder {
    settings: RecorderSettings,
    path: PathBuf,
    sink: SharedSink,
    stream: Option<cpal::Stream>,
}

impl MicRecorder {
    pub fn new(settings: RecorderSettings, path: &Path) -> Self {
        Self {
            settings,
            path: path.to_path_buf(),
            sink: Arc::new(Mutex::new(None)),
            stream: None,
        }
    }

    fn build_stream(
        &self,
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        sample_format: SampleFormat,
    ) -> AudioResult<cpal::Stream> {
        let sink = self.sink.clone();
        match sample_format {
            SampleFormat::F32 => build_input_stream::<f32>(device, config, sink),
            SampleFormat::I16 => build_input_stream::<i16>(device, config, sink),
            SampleFormat::U16 => build_input_stream::<u16>(device, config, sink),
            SampleFormat::I32 => build_input_stream::<i32>(device, config, sink),
            other => Err(AudioError::InputDevice(format!(
                "Unsupported sample format: {:?}",
                other
            ))),
        }
    }
}

impl RecordingHandle for MicRecorder {
    fn prepare(&mut self) -> AudioResult<()> {
        if self.stream.is_some() {
            return Err(AudioError::InvalidState("recorder already prepared"));
        }

        let device = find_input_device(self.settings.input_device.as_deref())?;
        info!(
            "Recording from device: {}",
            device.name().unwrap_or_else(|_| "unknown".to_string())
        );

        let supported = device
            .default_input_config()
            .map_err(|e| AudioError::InputDevice(e.to_string()))?;
        let sample_format = supported.sample_format();
        let config = supported.config();
        debug!(
            "Device config: {} Hz, {} channel(s), {:?}",
            config.sample_rate.0, config.channels, sample_format
        );

        let sink = WavSink::create(
            &self.path,
            &self.settings,
            config.sample_rate.0,
            config.channels,
        )?;
        *lock(&self.sink) = Some(sink);

        let stream = match self.build_stream(&device, &config, sample_format) {
            Ok(stream) => stream,
            Err(e) => {
                lock(&self.sink).take();
                return Err(e);
            }
        };

        // Some hosts run a stream as soon as it is built.
        if let Err(e) = stream.pause() {
            debug!("Input stream cannot be paused before start: {}", e);
        }

        self.stream = Some(stream);
        Ok(())
    }

    fn start(&mut self) -> AudioResult<()> {
        let stream = self
            .stream
            .as_ref()
            .ok_or(AudioError::InvalidState("recorder not prepared"))?;
        stream.play()?;
        Ok(())
    }

    fn stop(&mut self) -> AudioResult<()> {
        let stream = self
            .stream
            .take()
            .ok_or(AudioError::InvalidState("recorder not prepared"))?;

        // Dropping the stream ends the callbacks before the sink is finalized.
        drop(stream);

        match lock(&self.sink).take() {
            Some(sink) => {
                let frames = sink.finalize()?;
                debug!("Finalized {:?} ({} frames)", self.path, frames);
            }
            None => debug!("Recording sink already closed after a write error"),
        }
        Ok(())
    }
}

impl Drop for MicRecorder {
    fn drop(&mut self) {
        if self.stream.is_some() {
            debug!("Dropping active MicRecorder, cleaning up");
            let _ = self.stop();
        }
    }
}

fn lock(sink: &SharedSink) -> std::sync::MutexGuard<'_, Option<WavSink>> {
    sink.lock().unwrap_or_else(PoisonError::into_inner)
}

fn find_input_device(name: Option<&str>) -> AudioResult<cpal::Device> {
    let host = cpal::default_host();
    let Some(wanted) = name else {
        return host.default_input_device().ok_or(AudioError::NoInputDevice);
    };

    let mut devices = host
        .input_devices()
        .map_err(|e| AudioError::InputDevice(e.to_string()))?;
    devices
        .find(|device| device.name().map(|n| n == wanted).unwrap_or(false))
        .ok_or_else(|| AudioError::InputDevice(format!("No input device named {:?}", wanted)))
}

fn build_input_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    sink: SharedSink,
) -> AudioResult<cpal::Stream>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let err_fn = |err| error!("Input stream error: {}", err);

    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            let samples: Vec<f32> = data.iter().map(|&s| f32::from_sample(s)).collect();
            let mut guard = lock(&sink);
            if let Some(wav) = guard.as_mut() {
                if let Err(e) = wav.push(&samples) {
                    error!("Failed to write recording, closing file: {}", e);
                    if let Some(wav) = guard.take() {
                        let _ = wav.finalize();
                    }
                }
            }
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}

struct Output {
    _stream: OutputStream,
    _handle: OutputStreamHandle,
    sink: Sink,
}

pub struct FilePlayer {
    path: PathBuf,
    file: Option<File>,
    volume: f32,
    source: Option<Decoder<BufReader<File>>>,
    duration: Option<Duration>,
    output: Option<Output>,
}

impl FilePlayer {
    /// Bind a player to `path`. The file must exist and be readable.
    pub fn open(path: &Path, volume: f32) -> AudioResult<Self> {
        let file = File::open(path).map_err(|source| AudioError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            file: Some(file),
            volume,
            source: None,
            duration: None,
            output: None,
        })
    }
}

impl PlaybackHandle for FilePlayer {
    fn prepare(&mut self) -> AudioResult<()> {
        let file = self
            .file
            .take()
            .ok_or(AudioError::InvalidState("player already prepared"))?;

        let decoder =
            Decoder::new(BufReader::new(file)).map_err(|e| AudioError::Decode(e.to_string()))?;
        self.duration = decoder
            .total_duration()
            .or_else(|| wav_duration(&self.path).ok());
        self.source = Some(decoder);
        Ok(())
    }

    fn start(&mut self) -> AudioResult<()> {
        let source = self
            .source
            .take()
            .ok_or(AudioError::InvalidState("player not prepared"))?;

        let (stream, handle) =
            OutputStream::try_default().map_err(|e| AudioError::Output(e.to_string()))?;
        let sink = Sink::try_new(&handle).map_err(|e| AudioError::Output(e.to_string()))?;
        sink.set_volume(self.volume);
        sink.append(source);

        self.output = Some(Output {
            _stream: stream,
            _handle: handle,
            sink,
        });
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(output) = self.output.take() {
            output.sink.stop();
        }
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn is_playing(&self) -> bool {
        self.output
            .as_ref()
            .map(|output| !output.sink.empty())
            .unwrap_or(false)
    }

    fn wait_until_end(&self) {
        if let Some(output) = &self.output {
            output.sink.sleep_until_end();
        }
    }
}
