//! Down-mixing and streaming sample-rate conversion.
//!
//! Capture callbacks deliver audio in arbitrary chunks, so the resampler
//! carries its read position and the last input sample across calls.

/// Average interleaved frames into a single channel.
pub fn downmix(interleaved: &[f32], channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }

    interleaved
        .chunks(channels as usize)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

/// Linear-interpolation resampler. Suitable for speech where perfect quality
/// isn't critical.
#[derive(Debug, Clone)]
pub struct Resampler {
    from_rate: u32,
    to_rate: u32,
    step: f64,
    // Read position relative to the buffer built in `process`.
    position: f64,
    last: Option<f32>,
}

impl Resampler {
    pub fn new(from_rate: u32, to_rate: u32) -> Self {
        Self {
            from_rate,
            to_rate,
            step: from_rate as f64 / to_rate as f64,
            position: 0.0,
            last: None,
        }
    }

    pub fn is_passthrough(&self) -> bool {
        self.from_rate == self.to_rate
    }

    pub fn process(&mut self, input: &[f32]) -> Vec<f32> {
        if self.is_passthrough() || input.is_empty() {
            return input.to_vec();
        }

        let mut buffer = Vec::with_capacity(input.len() + 1);
        buffer.extend(self.last);
        buffer.extend_from_slice(input);

        let mut output =
            Vec::with_capacity((input.len() as f64 / self.step).ceil() as usize + 1);

        loop {
            let index = self.position as usize;
            if index + 1 >= buffer.len() {
                break;
            }
            let frac = self.position - index as f64;
            let sample = buffer[index] as f64 * (1.0 - frac) + buffer[index + 1] as f64 * frac;
            output.push(sample as f32);
            self.position += self.step;
        }

        // The last sample becomes index 0 of the next buffer.
        self.position -= (buffer.len() - 1) as f64;
        self.last = buffer.last().copied();

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downmix_mono_is_identity() {
        let samples = vec![0.1, 0.2, 0.3];
        assert_eq!(downmix(&samples, 1), samples);
    }

    #[test]
    fn test_downmix_stereo() {
        let samples = vec![1.0, 0.0, 0.5, 0.5, -1.0, 1.0];
        assert_eq!(downmix(&samples, 2), vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_resample_same_rate() {
        let mut resampler = Resampler::new(16000, 16000);
        let samples = vec![1.0, 2.0, 3.0];
        assert!(resampler.is_passthrough());
        assert_eq!(resampler.process(&samples), samples);
    }

    #[test]
    fn test_resample_downsample() {
        // 48kHz to 16kHz (3:1 ratio)
        let mut resampler = Resampler::new(48000, 16000);
        let samples: Vec<f32> = (0..48).map(|i| i as f32).collect();
        let result = resampler.process(&samples);
        assert_eq!(result.len(), 16);
        assert_eq!(result[1], 3.0);
    }

    #[test]
    fn test_resample_empty() {
        let mut resampler = Resampler::new(48000, 8000);
        assert!(resampler.process(&[]).is_empty());
    }

    #[test]
    fn test_resample_is_continuous_across_chunks() {
        let mut resampler = Resampler::new(8000, 16000);

        let first = resampler.process(&[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(first, vec![0.0, 0.5, 1.0, 1.5, 2.0, 2.5]);

        let second = resampler.process(&[4.0, 5.0]);
        assert_eq!(second, vec![3.0, 3.5, 4.0, 4.5]);
    }

    #[test]
    fn test_resample_chunked_matches_whole() {
        let samples: Vec<f32> = (0..480).map(|i| (i as f32 * 0.01).sin()).collect();

        let mut whole = Resampler::new(44100, 8000);
        let expected = whole.process(&samples);

        let mut chunked = Resampler::new(44100, 8000);
        let mut actual = Vec::new();
        for chunk in samples.chunks(37) {
            actual.extend(chunked.process(chunk));
        }

        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(&expected) {
            assert!((a - e).abs() < 1e-5);
        }
    }
}
