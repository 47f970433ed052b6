//! Recorder/player bound to a single file.
//!
//! At most one recording handle exists at a time. Calls that would conflict
//! with the current state (start while recording, stop while idle, playback
//! while recording) return quietly instead of failing.

use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::backend::{AudioBackend, PlaybackHandle, RecorderSettings, RecordingHandle};
use super::error::AudioResult;

pub struct RecordingSession {
    file_path: PathBuf,
    settings: RecorderSettings,
    backend: Box<dyn AudioBackend>,
    recorder: Option<Box<dyn RecordingHandle>>,
    player: Option<Box<dyn PlaybackHandle>>,
}

impl RecordingSession {
    pub fn new(file_path: impl Into<PathBuf>, backend: Box<dyn AudioBackend>) -> Self {
        Self::with_settings(file_path, RecorderSettings::default(), backend)
    }

    pub fn with_settings(
        file_path: impl Into<PathBuf>,
        settings: RecorderSettings,
        backend: Box<dyn AudioBackend>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            settings,
            backend,
            recorder: None,
            player: None,
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn is_active(&self) -> bool {
        self.recorder.is_some()
    }

    pub fn start(&mut self) -> AudioResult<()> {
        if self.recorder.is_some() {
            debug!("start ignored: already recording");
            return Ok(());
        }

        // The recorder truncates the file a player may still be reading.
        self.stop_playback();

        let mut recorder = self.backend.open_recorder(&self.settings, &self.file_path)?;
        recorder.prepare()?;
        recorder.start()?;
        self.recorder = Some(recorder);

        info!("started");
        Ok(())
    }

    pub fn stop(&mut self) {
        let Some(mut recorder) = self.recorder.take() else {
            debug!("stop ignored: not recording");
            return;
        };

        if let Err(e) = recorder.stop() {
            warn!("Recording did not stop cleanly: {}", e);
        }
        drop(recorder);

        info!("stopped");
    }

    pub fn playback(&mut self) -> AudioResult<()> {
        if self.recorder.is_some() {
            debug!("playback ignored: recording in progress");
            return Ok(());
        }

        let mut player = self.backend.open_player(&self.file_path)?;
        player.prepare()?;
        self.stop_playback();
        player.start()?;

        let duration_ms = player.duration().map(|d| d.as_millis()).unwrap_or(0);
        info!("playing back; duration: {} ms", duration_ms);

        self.player = Some(player);
        Ok(())
    }

    pub fn stop_playback(&mut self) {
        if let Some(mut player) = self.player.take() {
            player.stop();
            debug!("playback stopped");
        }
    }

    pub fn is_playing(&self) -> bool {
        self.player.as_ref().is_some_and(|p| p.is_playing())
    }

    pub fn playback_duration(&self) -> Option<Duration> {
        self.player.as_ref().and_then(|p| p.duration())
    }

    pub fn wait_for_playback(&self) {
        if let Some(player) = &self.player {
            player.wait_until_end();
        }
    }
}
