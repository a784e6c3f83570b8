//! Tempo estimation from inter-onset intervals
//!
//! # Algorithm
//!
//! 1. Detect onsets with the energy-rise detector
//! 2. With fewer than `min_onsets` onsets, report the default tempo
//! 3. Fold every inter-onset interval (IOI) into the plausible beat-period range
//!    `[60 / max_bpm, 60 / min_bpm]` seconds: keep the IOI if it fits, otherwise its
//!    double, otherwise its half; drop it if none fit
//! 4. With fewer than `min_ioi_candidates` folded IOIs, report the default tempo
//! 5. BPM = `round(60 / median(folded IOIs))`, clamped to the band
//!
//! # Example
//!
//! ```no_run
//! use tonescribe::features::period::TempoEstimator;
//! use tonescribe::AnalysisConfig;
//!
//! let samples = vec![0.0f32; 44100 * 30];
//! let estimate = TempoEstimator::from_config(&AnalysisConfig::default()).estimate(&samples, 44100);
//! println!("Tempo: {} BPM", estimate.bpm);
//! ```

use super::BpmEstimate;
use crate::config::AnalysisConfig;
use crate::features::onset::{detect_energy_rise_onsets, EnergyRiseParams};
use crate::features::signal::median;

/// Onset-driven tempo estimator
#[derive(Debug, Clone, PartialEq)]
pub struct TempoEstimator {
    onset_params: EnergyRiseParams,
    min_onsets: usize,
    min_ioi_candidates: usize,
    min_bpm: u32,
    max_bpm: u32,
    default_bpm: u32,
}

impl TempoEstimator {
    /// Estimator using the configured onset detector and tempo band
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            onset_params: EnergyRiseParams::from_config(config),
            min_onsets: config.min_onsets,
            min_ioi_candidates: config.min_ioi_candidates,
            min_bpm: config.min_bpm.max(1),
            max_bpm: config.max_bpm.max(config.min_bpm.max(1)),
            default_bpm: config.default_bpm,
        }
    }

    /// Estimate the tempo of a mono buffer
    ///
    /// Never fails: insufficient evidence yields the default tempo.
    pub fn estimate(&self, samples: &[f32], sample_rate: u32) -> BpmEstimate {
        let onsets = detect_energy_rise_onsets(samples, sample_rate, &self.onset_params);
        self.estimate_from_onsets(&onsets)
    }

    /// Estimate the tempo from onset times in seconds (ascending)
    pub fn estimate_from_onsets(&self, onsets: &[f32]) -> BpmEstimate {
        let onset_count = onsets.len();
        let fallback = BpmEstimate {
            bpm: self.default_bpm,
            onset_count,
            is_default: true,
        };

        if onset_count < self.min_onsets {
            log::debug!(
                "Only {} onsets (need {}), using default tempo {}",
                onset_count,
                self.min_onsets,
                self.default_bpm
            );
            return fallback;
        }

        let candidates: Vec<f32> = onsets
            .windows(2)
            .filter_map(|w| self.fold_interval(w[1] - w[0]))
            .collect();

        if candidates.len() < self.min_ioi_candidates {
            log::debug!(
                "Only {} usable inter-onset intervals (need {}), using default tempo {}",
                candidates.len(),
                self.min_ioi_candidates,
                self.default_bpm
            );
            return fallback;
        }

        let period = match median(&candidates) {
            Some(p) if p > 0.0 => p,
            _ => return fallback,
        };

        let bpm = (60.0 / period)
            .round()
            .clamp(self.min_bpm as f32, self.max_bpm as f32) as u32;

        log::debug!(
            "Tempo {} BPM from median IOI {:.4}s ({} of {} intervals usable)",
            bpm,
            period,
            candidates.len(),
            onset_count.saturating_sub(1)
        );

        BpmEstimate {
            bpm,
            onset_count,
            is_default: false,
        }
    }

    /// Fold an interval into the beat-period range, preferring it unchanged
    fn fold_interval(&self, interval: f32) -> Option<f32> {
        let shortest = 60.0 / self.max_bpm as f32;
        let longest = 60.0 / self.min_bpm as f32;
        [interval, interval * 2.0, interval / 2.0]
            .into_iter()
            .find(|&candidate| candidate >= shortest && candidate <= longest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimator() -> TempoEstimator {
        TempoEstimator::from_config(&AnalysisConfig::default())
    }

    /// Single-sample clicks every `interval` seconds
    fn click_track(count: usize, interval: f32, sample_rate: u32) -> Vec<f32> {
        let sr = sample_rate as f32;
        let offset = 0.25;
        let mut samples = vec![0.0f32; ((offset + interval * count as f32 + 0.5) * sr) as usize];
        for i in 0..count {
            samples[((offset + interval * i as f32) * sr) as usize] = 1.0;
        }
        samples
    }

    #[test]
    fn test_click_track_120_bpm() {
        let samples = click_track(20, 0.5, 44100);
        let estimate = estimator().estimate(&samples, 44100);
        assert_eq!(estimate.bpm, 120);
        assert!(!estimate.is_default);
        assert_eq!(estimate.onset_count, 20);
    }

    #[test]
    fn test_click_track_100_bpm() {
        let samples = click_track(20, 0.6, 44100);
        assert_eq!(estimator().estimate(&samples, 44100).bpm, 100);
    }

    #[test]
    fn test_double_time_folds_into_band() {
        // 240 BPM clicks fold down to 120
        let samples = click_track(30, 0.25, 44100);
        assert_eq!(estimator().estimate(&samples, 44100).bpm, 120);
    }

    #[test]
    fn test_too_few_onsets_uses_default() {
        let samples = click_track(6, 0.5, 44100);
        let estimate = estimator().estimate(&samples, 44100);
        assert_eq!(estimate.bpm, 120);
        assert!(estimate.is_default);
    }

    #[test]
    fn test_unfoldable_intervals_use_default() {
        // 12 onsets 3 s apart: 3.0, 6.0 and 1.5 are all outside [0.333, 1.0]
        let onsets: Vec<f32> = (0..12).map(|i| i as f32 * 3.0).collect();
        let estimate = estimator().estimate_from_onsets(&onsets);
        assert!(estimate.is_default);
        assert_eq!(estimate.bpm, 120);
    }

    #[test]
    fn test_result_clamped_to_band() {
        // 0.34 s period is just inside the band (176 BPM); 1.0 s is exactly 60 BPM
        let fast: Vec<f32> = (0..12).map(|i| i as f32 * 0.34).collect();
        assert_eq!(estimator().estimate_from_onsets(&fast).bpm, 176);
        let slow: Vec<f32> = (0..12).map(|i| i as f32 * 1.0).collect();
        assert_eq!(estimator().estimate_from_onsets(&slow).bpm, 60);
    }

    #[test]
    fn test_silence_uses_default() {
        let estimate = estimator().estimate(&vec![0.0; 44100 * 5], 44100);
        assert_eq!(estimate.bpm, 120);
        assert!(estimate.is_default);
    }
}
