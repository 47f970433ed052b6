//! Handle-based recording and playback primitives.
//!
//! A backend hands out handles that follow the same lifecycle whatever the
//! device underneath: bind to a file, `prepare`, `start`, then `stop`.
//! Releasing a handle is dropping it.

use std::path::Path;
use std::time::Duration;

use super::error::AudioResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioInput {
    Microphone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// RIFF/WAVE container with a single audio track.
    Wav,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEncoder {
    /// 16-bit linear PCM.
    Pcm16,
}

/// How a recording handle captures and encodes audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecorderSettings {
    pub input: AudioInput,
    pub format: OutputFormat,
    pub encoder: AudioEncoder,
    pub channels: u16,
    pub sample_rate: u32,
    pub input_device: Option<String>,
}

impl RecorderSettings {
    /// Mono narrowband speech from the microphone.
    pub fn speech(sample_rate: u32) -> Self {
        Self {
            input: AudioInput::Microphone,
            format: OutputFormat::Wav,
            encoder: AudioEncoder::Pcm16,
            channels: 1,
            sample_rate,
            input_device: None,
        }
    }

    pub fn with_input_device(mut self, name: Option<String>) -> Self {
        self.input_device = name;
        self
    }

    pub fn bits_per_sample(&self) -> u16 {
        match self.encoder {
            AudioEncoder::Pcm16 => 16,
        }
    }
}

impl Default for RecorderSettings {
    fn default() -> Self {
        Self::speech(8000)
    }
}

pub trait RecordingHandle {
    /// Open the capture stream and create the output file.
    fn prepare(&mut self) -> AudioResult<()>;

    /// Begin capture. The output file grows until `stop`.
    fn start(&mut self) -> AudioResult<()>;

    /// End capture and finalize the output file.
    fn stop(&mut self) -> AudioResult<()>;
}

pub trait PlaybackHandle {
    /// Read the bound file far enough to know its format and length.
    fn prepare(&mut self) -> AudioResult<()>;

    fn start(&mut self) -> AudioResult<()>;

    fn stop(&mut self);

    /// Total length of the prepared file.
    fn duration(&self) -> Option<Duration>;

    fn is_playing(&self) -> bool;

    /// Block until playback drains or is stopped.
    fn wait_until_end(&self);
}

/// The audio subsystem. Acquiring a handle binds it to a file; it does not
/// touch the device until the handle is prepared.
pub trait AudioBackend {
    fn open_recorder(
        &self,
        settings: &RecorderSettings,
        path: &Path,
    ) -> AudioResult<Box<dyn RecordingHandle>>;

    /// Fails when `path` cannot be opened for reading.
    fn open_player(&self, path: &Path) -> AudioResult<Box<dyn PlaybackHandle>>;
}
