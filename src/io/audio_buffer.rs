//! Decoded audio buffer

use crate::error::AnalysisError;

/// Decoded PCM audio, one sample vector per channel
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Planar channel data, samples normalized to [-1.0, 1.0]
    channels: Vec<Vec<f32>>,
    /// Sample rate in Hz
    sample_rate: u32,
}

impl AudioBuffer {
    /// Create a buffer from planar channel data
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: u32) -> Self {
        Self {
            channels,
            sample_rate,
        }
    }

    /// Create a single-channel buffer
    pub fn from_mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self::new(vec![samples], sample_rate)
    }

    /// Create a buffer from interleaved samples (`L R L R ...`)
    ///
    /// A trailing partial frame is dropped.
    pub fn from_interleaved(samples: &[f32], channel_count: usize, sample_rate: u32) -> Self {
        if channel_count == 0 {
            return Self::new(Vec::new(), sample_rate);
        }

        let frames = samples.len() / channel_count;
        let mut channels = vec![Vec::with_capacity(frames); channel_count];
        for frame in samples.chunks_exact(channel_count) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }

        Self::new(channels, sample_rate)
    }

    /// Channel data
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Number of channels
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of sample frames (samples per channel)
    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Duration in seconds
    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f32 / self.sample_rate as f32
    }

    /// Check that the buffer can be analysed
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if the sample rate is zero, there are no
    /// channels, channel lengths differ, or any sample is NaN or infinite.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.sample_rate == 0 {
            return Err(AnalysisError::InvalidInput("Invalid sample rate".to_string()));
        }

        if self.channels.is_empty() {
            return Err(AnalysisError::InvalidInput(
                "Audio buffer has no channels".to_string(),
            ));
        }

        let frames = self.frames();
        if let Some((index, channel)) = self
            .channels
            .iter()
            .enumerate()
            .find(|(_, c)| c.len() != frames)
        {
            return Err(AnalysisError::InvalidInput(format!(
                "Channel {} has {} samples, expected {}",
                index,
                channel.len(),
                frames
            )));
        }

        if self.channels.iter().flatten().any(|s| !s.is_finite()) {
            return Err(AnalysisError::InvalidInput(
                "Audio contains non-finite samples".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_interleaved_splits_channels() {
        let buffer = AudioBuffer::from_interleaved(&[0.1, -0.1, 0.2, -0.2, 0.3], 2, 8000);
        assert_eq!(buffer.channel_count(), 2);
        assert_eq!(buffer.frames(), 2);
        assert_eq!(buffer.channels()[0], vec![0.1, 0.2]);
        assert_eq!(buffer.channels()[1], vec![-0.1, -0.2]);
    }

    #[test]
    fn test_duration() {
        let buffer = AudioBuffer::from_mono(vec![0.0; 22050], 44100);
        assert!((buffer.duration_seconds() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_validate_rejects_bad_buffers() {
        assert!(AudioBuffer::from_mono(vec![0.0; 10], 0).validate().is_err());
        assert!(AudioBuffer::new(vec![], 44100).validate().is_err());
        assert!(AudioBuffer::new(vec![vec![0.0; 10], vec![0.0; 9]], 44100)
            .validate()
            .is_err());
        assert!(AudioBuffer::from_mono(vec![0.0, f32::NAN], 44100)
            .validate()
            .is_err());
        assert!(AudioBuffer::from_mono(vec![0.0; 10], 44100).validate().is_ok());
    }
}
