//! The recorder screen: owns one session and forwards user actions to it.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::audio::{AudioBackend, CpalBackend, RecorderSettings, RecordingSession};
use crate::config::Config;
use crate::global;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenAction {
    Start,
    Stop,
    Playback,
    StopPlayback,
}

impl ScreenAction {
    pub const ALL: [ScreenAction; 4] = [
        ScreenAction::Start,
        ScreenAction::Stop,
        ScreenAction::Playback,
        ScreenAction::StopPlayback,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ScreenAction::Start => "Start",
            ScreenAction::Stop => "Stop",
            ScreenAction::Playback => "Playback",
            ScreenAction::StopPlayback => "Stop playback",
        }
    }
}

pub struct Screen {
    session: RecordingSession,
}

impl Screen {
    /// Build the screen with the cpal backend. The recording lives in the
    /// private data directory unless `file_override` is given.
    pub fn create(config: &Config, file_override: Option<PathBuf>) -> Result<Self> {
        let path = match file_override {
            Some(path) => path,
            None => {
                let path = global::recording_file(&config.recorder.file_name)?;
                if let Some(dir) = path.parent() {
                    global::ensure_private_dir(dir)?;
                }
                path
            }
        };

        let settings = RecorderSettings::speech(config.recorder.sample_rate)
            .with_input_device(config.recorder.input_device.clone());
        let backend = CpalBackend::new(config.playback.volume);

        Ok(Self::with_settings(path, settings, Box::new(backend)))
    }

    pub fn with_backend(path: impl Into<PathBuf>, backend: Box<dyn AudioBackend>) -> Self {
        Self::with_settings(path, RecorderSettings::default(), backend)
    }

    fn with_settings(
        path: impl Into<PathBuf>,
        settings: RecorderSettings,
        backend: Box<dyn AudioBackend>,
    ) -> Self {
        let session = RecordingSession::with_settings(path, settings, backend);
        debug!("Screen recording to {:?}", session.file_path());
        Self { session }
    }

    pub fn file_path(&self) -> &Path {
        self.session.file_path()
    }

    pub fn session(&self) -> &RecordingSession {
        &self.session
    }

    pub fn on_start_action(&mut self) -> Result<()> {
        self.session.start().context("Failed to start recording")
    }

    pub fn on_stop_action(&mut self) {
        self.session.stop();
    }

    pub fn on_playback_action(&mut self) -> Result<()> {
        self.session.playback().context("Failed to play recording")
    }

    pub fn on_stop_playback_action(&mut self) {
        self.session.stop_playback();
    }

    pub fn dispatch(&mut self, action: ScreenAction) -> Result<()> {
        match action {
            ScreenAction::Start => self.on_start_action()?,
            ScreenAction::Stop => self.on_stop_action(),
            ScreenAction::Playback => self.on_playback_action()?,
            ScreenAction::StopPlayback => self.on_stop_playback_action(),
        }
        Ok(())
    }

    pub fn wait_for_playback(&self) {
        self.session.wait_for_playback();
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        self.session.stop_playback();
        if self.session.is_active() {
            debug!("Screen closed while recording, stopping");
            self.session.stop();
        }
    }
}
