//! Energy-rise onset detection
//!
//! Flags an onset where frame energy jumps sharply.
//!
//! Algorithm:
//! 1. Divide audio into overlapping frames (frame_size, hop_size)
//! 2. Compute RMS energy per frame
//! 3. Keep a trailing history of frame RMS values for a local moving average
//! 4. A frame is an onset when its RMS exceeds the previous frame's RMS by
//!    `rise_ratio`, the moving average by `average_ratio`, and the absolute floor
//!    `min_rms`
//!
//! The triple condition rejects both gradual swells and very quiet noise spikes.
//!
//! # Example
//!
//! ```no_run
//! use tonescribe::features::onset::energy_rise::{detect_energy_rise_onsets, EnergyRiseParams};
//!
//! let samples = vec![0.0f32; 44100 * 30];
//! let onsets = detect_energy_rise_onsets(&samples, 44100, &EnergyRiseParams::default());
//! println!("Found {} onsets", onsets.len());
//! ```

use std::collections::VecDeque;

use crate::config::AnalysisConfig;
use crate::features::signal::{frames, rms};

/// Energy-rise onset detector parameters
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyRiseParams {
    /// Frame size in samples (default: 1024)
    pub frame_size: usize,
    /// Hop size in samples (default: 256)
    pub hop_size: usize,
    /// Frames in the trailing moving average (default: 10)
    pub history_frames: usize,
    /// Required rise over the previous frame (default: 1.5)
    pub rise_ratio: f32,
    /// Required rise over the moving average (default: 1.1)
    pub average_ratio: f32,
    /// Absolute RMS floor (default: 0.01)
    pub min_rms: f32,
}

impl Default for EnergyRiseParams {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

impl EnergyRiseParams {
    /// Parameters from the analysis configuration
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            frame_size: config.onset_frame_size,
            hop_size: config.onset_hop_size,
            history_frames: config.onset_history_frames.max(1),
            rise_ratio: config.onset_rise_ratio,
            average_ratio: config.onset_average_ratio,
            min_rms: config.onset_min_rms,
        }
    }
}

/// Detect onsets from sharp frame-energy rises
///
/// The moving average covers the frames before the current one (up to
/// `history_frames`); with no history it is zero.
///
/// # Arguments
///
/// * `samples` - Mono audio samples
/// * `sample_rate` - Sample rate in Hz
/// * `params` - Detector parameters
///
/// # Returns
///
/// Onset times in seconds (frame start times), ascending. Empty for audio shorter
/// than one frame or a zero sample rate.
pub fn detect_energy_rise_onsets(
    samples: &[f32],
    sample_rate: u32,
    params: &EnergyRiseParams,
) -> Vec<f32> {
    if sample_rate == 0 || samples.len() < params.frame_size {
        return Vec::new();
    }

    let sr = sample_rate as f32;
    let mut history: VecDeque<f32> = VecDeque::with_capacity(params.history_frames);
    let mut previous_rms = 0.0f32;
    let mut onsets = Vec::new();

    for (start, frame) in frames(samples, params.frame_size, params.hop_size) {
        let current = rms(frame);
        let average = if history.is_empty() {
            0.0
        } else {
            history.iter().sum::<f32>() / history.len() as f32
        };

        if current > params.rise_ratio * previous_rms
            && current > params.average_ratio * average
            && current > params.min_rms
        {
            onsets.push(start as f32 / sr);
        }

        if history.len() == params.history_frames {
            history.pop_front();
        }
        history.push_back(current);
        previous_rms = current;
    }

    log::debug!(
        "Energy rise detected {} onsets in {:.2}s of audio",
        onsets.len(),
        samples.len() as f32 / sr
    );

    onsets
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Single-sample clicks every `interval` seconds, starting at `offset`
    fn click_track(duration: f32, interval: f32, offset: f32, sample_rate: u32) -> Vec<f32> {
        let sr = sample_rate as f32;
        let mut samples = vec![0.0f32; (duration * sr) as usize];
        let mut t = offset;
        while ((t * sr) as usize) < samples.len() {
            samples[(t * sr) as usize] = 1.0;
            t += interval;
        }
        samples
    }

    #[test]
    fn test_one_onset_per_click() {
        let samples = click_track(5.0, 0.5, 0.25, 44100);
        let onsets = detect_energy_rise_onsets(&samples, 44100, &EnergyRiseParams::default());
        assert_eq!(onsets.len(), 10, "Got onsets {:?}", onsets);

        // Each onset frame contains its click
        let frame = 1024.0 / 44100.0;
        for (i, &onset) in onsets.iter().enumerate() {
            let click = 0.25 + i as f32 * 0.5;
            assert!(onset <= click && onset > click - frame, "onset {} vs click {}", onset, click);
        }
    }

    #[test]
    fn test_gradual_swell_has_single_onset() {
        // Linear fade-in over 2 s: only the very first audible frame jumps from silence
        let sr = 44100;
        let samples: Vec<f32> = (0..sr * 2)
            .map(|i| {
                let t = i as f32 / sr as f32;
                (t / 2.0) * (2.0 * std::f32::consts::PI * 220.0 * t).sin()
            })
            .collect();
        let onsets = detect_energy_rise_onsets(&samples, sr, &EnergyRiseParams::default());
        assert!(onsets.len() <= 2, "Swell produced {} onsets", onsets.len());
    }

    #[test]
    fn test_quiet_clicks_below_floor() {
        let mut samples = click_track(5.0, 0.5, 0.25, 44100);
        for s in &mut samples {
            *s *= 0.1; // frame RMS 0.003 < 0.01
        }
        let onsets = detect_energy_rise_onsets(&samples, 44100, &EnergyRiseParams::default());
        assert!(onsets.is_empty());
    }

    #[test]
    fn test_degenerate_input() {
        let params = EnergyRiseParams::default();
        assert!(detect_energy_rise_onsets(&[], 44100, &params).is_empty());
        assert!(detect_energy_rise_onsets(&[1.0; 500], 44100, &params).is_empty());
        assert!(detect_energy_rise_onsets(&[1.0; 5000], 0, &params).is_empty());
        assert!(detect_energy_rise_onsets(&[0.0; 44100], 44100, &params).is_empty());
    }
}
