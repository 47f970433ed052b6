//! Incremental WAV writer fed from capture callbacks.

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use super::backend::RecorderSettings;
use super::error::{AudioError, AudioResult};
use super::resampler::{downmix, Resampler};

/// Writes interleaved `f32` capture buffers to a mono 16-bit PCM file at the
/// configured rate, whatever the rate and channel count of the device.
pub struct WavSink {
    writer: WavWriter<BufWriter<File>>,
    resampler: Resampler,
    input_channels: u16,
    frames_written: u64,
}

impl WavSink {
    pub fn create(
        path: &Path,
        settings: &RecorderSettings,
        input_rate: u32,
        input_channels: u16,
    ) -> AudioResult<Self> {
        if settings.sample_rate == 0 || input_rate == 0 {
            return Err(AudioError::InvalidSettings(format!(
                "sample rate must be non-zero (device {} Hz, output {} Hz)",
                input_rate, settings.sample_rate
            )));
        }
        if input_channels == 0 {
            return Err(AudioError::InvalidSettings(
                "device reports zero channels".to_string(),
            ));
        }

        let spec = WavSpec {
            channels: settings.channels,
            sample_rate: settings.sample_rate,
            bits_per_sample: settings.bits_per_sample(),
            sample_format: SampleFormat::Int,
        };

        let writer = WavWriter::create(path, spec)?;
        debug!(
            "WAV sink at {:?}: {} Hz x{} in, {} Hz mono out",
            path, input_rate, input_channels, settings.sample_rate
        );

        Ok(Self {
            writer,
            resampler: Resampler::new(input_rate, settings.sample_rate),
            input_channels,
            frames_written: 0,
        })
    }

    pub fn push(&mut self, interleaved: &[f32]) -> AudioResult<()> {
        let mono = downmix(interleaved, self.input_channels);
        for sample in self.resampler.process(&mono) {
            let pcm = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            self.writer.write_sample(pcm)?;
            self.frames_written += 1;
        }
        Ok(())
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Patch the header lengths and close the file.
    pub fn finalize(self) -> AudioResult<u64> {
        let frames = self.frames_written;
        self.writer.finalize()?;
        Ok(frames)
    }
}

/// Length of a WAV file according to its header.
pub fn wav_duration(path: &Path) -> AudioResult<Duration> {
    let reader = WavReader::open(path).map_err(|err| match err {
        hound::Error::IoError(source) => AudioError::Open {
            path: path.to_path_buf(),
            source,
        },
        other => AudioError::Wav(other),
    })?;
    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return Err(AudioError::Decode("sample rate is zero".to_string()));
    }
    let frames = reader.duration() as u64;
    Ok(Duration::from_micros(
        frames * 1_000_000 / spec.sample_rate as u64,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_and_finalize() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sink.wav");
        let settings = RecorderSettings::speech(8000);

        let mut sink = WavSink::create(&path, &settings, 8000, 1).unwrap();
        sink.push(&vec![0.25; 4000]).unwrap();
        sink.push(&vec![-0.25; 4000]).unwrap();
        assert_eq!(sink.frames_written(), 8000);
        assert_eq!(sink.finalize().unwrap(), 8000);

        let reader = WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 8000);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(reader.duration(), 8000);

        assert_eq!(wav_duration(&path).unwrap(), Duration::from_secs(1));
    }

    #[test]
    fn test_stereo_device_is_written_mono_at_target_rate() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stereo.wav");
        let settings = RecorderSettings::speech(8000);

        // 48 kHz stereo, 0.5 s
        let mut sink = WavSink::create(&path, &settings, 48000, 2).unwrap();
        sink.push(&vec![0.5; 48000]).unwrap();
        let frames = sink.finalize().unwrap();
        assert_eq!(frames, 4000);

        let mut reader = WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().channels, 1);
        let first: i16 = reader.samples::<i16>().next().unwrap().unwrap();
        assert_eq!(first, (0.5 * i16::MAX as f32) as i16);
    }

    #[test]
    fn test_samples_are_clamped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("loud.wav");

        let mut sink = WavSink::create(&path, &RecorderSettings::speech(8000), 8000, 1).unwrap();
        sink.push(&[2.0, -2.0]).unwrap();
        sink.finalize().unwrap();

        let mut reader = WavReader::open(&path).unwrap();
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![i16::MAX, -i16::MAX]);
    }

    #[test]
    fn test_zero_sample_rate_is_rejected_before_file_creation() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("zero.wav");

        let err = WavSink::create(&path, &RecorderSettings::speech(0), 48000, 1)
            .err()
            .unwrap();
        assert!(matches!(err, AudioError::InvalidSettings(_)));

        let err = WavSink::create(&path, &RecorderSettings::speech(8000), 0, 1)
            .err()
            .unwrap();
        assert!(matches!(err, AudioError::InvalidSettings(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_empty_recording_has_zero_duration() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.wav");

        let sink = WavSink::create(&path, &RecorderSettings::speech(8000), 44100, 1).unwrap();
        sink.finalize().unwrap();

        assert_eq!(wav_duration(&path).unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_duration_of_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = wav_duration(&dir.path().join("missing.wav")).unwrap_err();
        assert!(matches!(err, AudioError::Open { .. }));
    }

    #[test]
    fn test_duration_of_non_wav_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("junk.wav");
        std::fs::write(&path, b"definitely not riff").unwrap();

        let err = wav_duration(&path).unwrap_err();
        assert!(matches!(err, AudioError::Wav(_)));
    }
}
