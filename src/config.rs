//! Configuration parameters for audio-to-note analysis
//!
//! Every numeric threshold used by the pipeline lives here. The defaults are the
//! reference values; changing them changes the musical output.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Analysis configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    // Preprocessing
    /// Longest stretch of audio analysed, in seconds (default: 60.0)
    /// Longer input is truncated and flagged in the result
    pub max_duration_seconds: f32,

    // Note detection
    /// Pitch analysis frame size in samples (default: 2048)
    pub note_frame_size: usize,

    /// Hop between pitch analysis frames in samples (default: 441, ~10 ms at 44.1 kHz)
    pub note_hop_size: usize,

    /// Frames quieter than this fraction of the global RMS are silence (default: 0.08)
    pub silence_gate_ratio: f32,

    /// Length of the rolling median filter over detected frequencies (default: 3)
    pub median_window: usize,

    /// Minimum detector clarity for a frame to count as pitched (default: 0.88)
    pub clarity_threshold: f32,

    /// Consecutive same-name frames needed to confirm a note (default: 3)
    pub stability_frames: usize,

    /// Shortest note the detector emits, in seconds (default: 0.07)
    pub min_detected_note_seconds: f32,

    // Pitch naming
    /// Frequencies at or below this are "no pitch", in Hz (default: 10.0)
    pub min_pitch_frequency: f32,

    /// Largest accepted deviation from equal temperament, in cents (default: 50.0)
    pub max_cents_deviation: f32,

    // Onset detection / tempo
    /// Onset analysis frame size in samples (default: 1024)
    pub onset_frame_size: usize,

    /// Hop between onset analysis frames in samples (default: 256)
    pub onset_hop_size: usize,

    /// Frames in the trailing RMS moving average (default: 10)
    pub onset_history_frames: usize,

    /// Required RMS rise over the previous frame (default: 1.5)
    pub onset_rise_ratio: f32,

    /// Required RMS rise over the trailing moving average (default: 1.1)
    pub onset_average_ratio: f32,

    /// Absolute RMS floor for an onset (default: 0.01)
    pub onset_min_rms: f32,

    /// Onsets required before a tempo is estimated (default: 10)
    pub min_onsets: usize,

    /// Folded inter-onset intervals required before a tempo is estimated (default: 5)
    pub min_ioi_candidates: usize,

    /// Lower edge of the tempo band in BPM (default: 60)
    pub min_bpm: u32,

    /// Upper edge of the tempo band in BPM (default: 180)
    pub max_bpm: u32,

    /// Tempo reported when there is not enough rhythmic evidence (default: 120)
    pub default_bpm: u32,

    // Time signature
    /// Alignment tolerance as a fraction of the beat duration (default: 0.2)
    pub meter_tolerance_ratio: f32,

    /// Compound score must exceed the simple score by this factor (default: 1.1)
    pub compound_bias: f32,

    /// Notes required before the meter heuristic runs (default: 5)
    pub min_meter_notes: usize,

    // Post-processing
    /// Notes shorter than this are dropped from the result, in seconds (default: 0.12)
    pub min_note_seconds: f32,

    /// Same-pitch notes separated by less than this are merged, in seconds (default: 0.05)
    pub merge_gap_seconds: f32,

    // Synthetic fallback notes
    /// Onset spacing of synthetic notes, in seconds (default: 0.5)
    pub synthetic_note_spacing: f32,

    /// Fraction of the spacing each synthetic note sounds for (default: 0.9)
    pub synthetic_duty_cycle: f32,

    /// Velocity of synthetic notes (default: 80)
    pub synthetic_velocity: u8,

    /// Minimum number of synthetic notes (default: 8)
    pub synthetic_min_notes: usize,

    // Execution
    /// Run note detection and tempo estimation concurrently (default: true)
    pub parallel: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_duration_seconds: 60.0,
            note_frame_size: 2048,
            note_hop_size: 441,
            silence_gate_ratio: 0.08,
            median_window: 3,
            clarity_threshold: 0.88,
            stability_frames: 3,
            min_detected_note_seconds: 0.07,
            min_pitch_frequency: 10.0,
            max_cents_deviation: 50.0,
            onset_frame_size: 1024,
            onset_hop_size: 256,
            onset_history_frames: 10,
            onset_rise_ratio: 1.5,
            onset_average_ratio: 1.1,
            onset_min_rms: 0.01,
            min_onsets: 10,
            min_ioi_candidates: 5,
            min_bpm: 60,
            max_bpm: 180,
            default_bpm: 120,
            meter_tolerance_ratio: 0.2,
            compound_bias: 1.1,
            min_meter_notes: 5,
            min_note_seconds: 0.12,
            merge_gap_seconds: 0.05,
            synthetic_note_spacing: 0.5,
            synthetic_duty_cycle: 0.9,
            synthetic_velocity: 80,
            synthetic_min_notes: 8,
            parallel: true,
        }
    }
}

impl AnalysisConfig {
    /// Check that the configuration describes a runnable analysis
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` naming the first offending field.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let sizes = [
            ("note_frame_size", self.note_frame_size),
            ("note_hop_size", self.note_hop_size),
            ("median_window", self.median_window),
            ("stability_frames", self.stability_frames),
            ("onset_frame_size", self.onset_frame_size),
            ("onset_hop_size", self.onset_hop_size),
            ("onset_history_frames", self.onset_history_frames),
        ];
        for (name, value) in sizes {
            if value == 0 {
                return Err(AnalysisError::InvalidInput(format!("{} must be > 0", name)));
            }
        }

        let positive = [
            ("max_duration_seconds", self.max_duration_seconds),
            ("synthetic_note_spacing", self.synthetic_note_spacing),
            ("synthetic_duty_cycle", self.synthetic_duty_cycle),
            ("min_note_seconds", self.min_note_seconds),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(AnalysisError::InvalidInput(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        if self.synthetic_min_notes == 0 {
            return Err(AnalysisError::InvalidInput(
                "synthetic_min_notes must be > 0".to_string(),
            ));
        }

        let synthetic_duration = self.synthetic_note_spacing * self.synthetic_duty_cycle;
        if synthetic_duration < self.min_note_seconds {
            return Err(AnalysisError::InvalidInput(format!(
                "Synthetic notes ({:.3}s) would be shorter than min_note_seconds ({:.3}s)",
                synthetic_duration, self.min_note_seconds
            )));
        }

        if self.min_bpm == 0 || self.min_bpm > self.max_bpm {
            return Err(AnalysisError::InvalidInput(format!(
                "Invalid tempo band: {}-{} BPM",
                self.min_bpm, self.max_bpm
            )));
        }

        if !(self.min_bpm..=self.max_bpm).contains(&self.default_bpm) {
            return Err(AnalysisError::InvalidInput(format!(
                "default_bpm {} outside tempo band {}-{}",
                self.default_bpm, self.min_bpm, self.max_bpm
            )));
        }

        if !(0.0..=1.0).contains(&self.clarity_threshold) {
            return Err(AnalysisError::InvalidInput(format!(
                "clarity_threshold must be in [0, 1], got {}",
                self.clarity_threshold
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_hop_rejected() {
        let config = AnalysisConfig {
            note_hop_size: 0,
            ..AnalysisConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("note_hop_size"));
    }

    #[test]
    fn test_inverted_tempo_band_rejected() {
        let config = AnalysisConfig {
            min_bpm: 200,
            max_bpm: 100,
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_synthetic_notes_must_survive_filter() {
        let config = AnalysisConfig {
            synthetic_note_spacing: 0.1,
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());

        let config = AnalysisConfig {
            synthetic_min_notes: 0,
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{ "clarity_threshold": 0.9, "parallel": false }"#).unwrap();
        assert_eq!(config.clarity_threshold, 0.9);
        assert!(!config.parallel);
        assert_eq!(config.note_frame_size, 2048);
    }
}
