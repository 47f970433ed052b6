//! Session lifecycle against a backend that writes real WAV files from a
//! synthetic signal, so no audio hardware is needed.

use std::path::{Path, PathBuf};
use std::time::Duration;

use audio_sensor::audio::wav_sink::{wav_duration, WavSink};
use audio_sensor::audio::{
    AudioBackend, AudioError, AudioResult, PlaybackHandle, RecorderSettings, RecordingHandle,
    RecordingSession,
};
use tempfile::TempDir;

struct ToneBackend;

struct ToneRecorder {
    settings: RecorderSettings,
    path: PathBuf,
    sink: Option<WavSink>,
}

impl RecordingHandle for ToneRecorder {
    fn prepare(&mut self) -> AudioResult<()> {
        self.sink = Some(WavSink::create(&self.path, &self.settings, 16000, 2)?);
        Ok(())
    }

    fn start(&mut self) -> AudioResult<()> {
        // 0.25 s of stereo audio at 16 kHz
        let frame = [0.2f32, -0.2];
        let samples: Vec<f32> = frame.iter().copied().cycle().take(8000).collect();
        self.sink
            .as_mut()
            .ok_or(AudioError::InvalidState("not prepared"))?
            .push(&samples)
    }

    fn stop(&mut self) -> AudioResult<()> {
        if let Some(sink) = self.sink.take() {
            sink.finalize()?;
        }
        Ok(())
    }
}

struct HeaderPlayer {
    path: PathBuf,
    duration: Option<Duration>,
}

impl PlaybackHandle for HeaderPlayer {
    fn prepare(&mut self) -> AudioResult<()> {
        self.duration = Some(wav_duration(&self.path)?);
        Ok(())
    }

    fn start(&mut self) -> AudioResult<()> {
        Ok(())
    }

    fn stop(&mut self) {}

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn is_playing(&self) -> bool {
        false
    }

    fn wait_until_end(&self) {}
}

impl AudioBackend for ToneBackend {
    fn open_recorder(
        &self,
        settings: &RecorderSettings,
        path: &Path,
    ) -> AudioResult<Box<dyn RecordingHandle>> {
        Ok(Box::new(ToneRecorder {
            settings: settings.clone(),
            path: path.to_path_buf(),
            sink: None,
        }))
    }

    fn open_player(&self, path: &Path) -> AudioResult<Box<dyn PlaybackHandle>> {
        std::fs::File::open(path).map_err(|source| AudioError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Box::new(HeaderPlayer {
            path: path.to_path_buf(),
            duration: None,
        }))
    }
}

fn session(dir: &TempDir) -> RecordingSession {
    RecordingSession::new(dir.path().join("test.wav"), Box::new(ToneBackend))
}

#[test]
fn record_stop_then_play_back() {
    let dir = TempDir::new().unwrap();
    let mut session = session(&dir);

    session.start().unwrap();
    assert!(session.is_active());
    assert!(session.file_path().exists());

    session.stop();
    assert!(!session.is_active());

    // 4000 stereo frames at 16 kHz -> 2000 mono frames at 8 kHz
    assert_eq!(
        wav_duration(session.file_path()).unwrap(),
        Duration::from_millis(250)
    );

    session.playback().unwrap();
    let duration = session.playback_duration().unwrap();
    assert_eq!(duration, Duration::from_millis(250));
}

#[test]
fn stop_without_start_creates_no_file() {
    let dir = TempDir::new().unwrap();
    let mut session = session(&dir);

    session.stop();

    assert!(!session.is_active());
    assert!(!session.file_path().exists());
}

#[test]
fn second_start_leaves_first_recording_untouched() {
    let dir = TempDir::new().unwrap();
    let mut session = session(&dir);

    session.start().unwrap();
    session.start().unwrap();
    session.stop();

    assert_eq!(
        wav_duration(session.file_path()).unwrap(),
        Duration::from_millis(250)
    );
}

#[test]
fn playback_while_recording_does_nothing() {
    let dir = TempDir::new().unwrap();
    let mut session = session(&dir);

    session.start().unwrap();
    session.playback().unwrap();
    assert!(session.playback_duration().is_none());

    session.stop();
}

#[test]
fn playback_without_recording_fails() {
    let dir = TempDir::new().unwrap();
    let mut session = session(&dir);

    let err = session.playback().unwrap_err();
    assert!(matches!(err, AudioError::Open { .. }));
    assert!(err.to_string().contains("test.wav"));
}
