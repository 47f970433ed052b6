//! Failures raised by the audio subsystem.
//!
//! Every variant is an I/O failure at the device or file boundary. Nothing in
//! this crate retries them; they surface to whoever issued the call.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("No input device available")]
    NoInputDevice,

    #[error("Input device error: {0}")]
    InputDevice(String),

    #[error("Failed to build input stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("Failed to start input stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("Audio output error: {0}")]
    Output(String),

    #[error("Cannot open audio file {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("Cannot decode audio: {0}")]
    Decode(String),

    #[error("Invalid recorder settings: {0}")]
    InvalidSettings(String),

    #[error("Recorder used out of order: {0}")]
    InvalidState(&'static str),
}

pub type AudioResult<T> = Result<T, AudioError>;
