//! Time signature detection
//!
//! Scores note onsets against simple-time and compound-time subdivisions of the
//! beat and picks 4/4 or 6/8.
//!
//! # Algorithm
//!
//! 1. Beat duration = 60 / BPM
//! 2. For every note start and every simple-time period (beat, half beat), count a
//!    hit when the start lies within `tolerance` of a period boundary (either end
//!    of the modulo interval)
//! 3. Do the same for the compound-time periods (dotted beat, three half beats)
//! 4. 6/8 wins only if the compound score exceeds the simple score by the
//!    configured bias; otherwise 4/4
//!
//! This is a coarse heuristic. It cannot report any other signature.
//!
//! # Example
//!
//! ```
//! use tonescribe::analysis::result::TimeSignature;
//! use tonescribe::features::meter::TimeSignatureEstimator;
//! use tonescribe::AnalysisConfig;
//!
//! let estimator = TimeSignatureEstimator::from_config(&AnalysisConfig::default());
//! assert_eq!(estimator.estimate(&[], 120), TimeSignature::FourFour);
//! ```

use crate::analysis::result::{Note, TimeSignature};
use crate::config::AnalysisConfig;

/// Simple-vs-compound meter estimator
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSignatureEstimator {
    tolerance_ratio: f32,
    compound_bias: f32,
    min_notes: usize,
}

impl Default for TimeSignatureEstimator {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

impl TimeSignatureEstimator {
    /// Estimator using the configured tolerance, bias and note minimum
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            tolerance_ratio: config.meter_tolerance_ratio,
            compound_bias: config.compound_bias,
            min_notes: config.min_meter_notes,
        }
    }

    /// Estimate the time signature of a note list at the given tempo
    ///
    /// # Arguments
    ///
    /// * `notes` - Notes in any order
    /// * `tempo` - Tempo in BPM
    ///
    /// # Returns
    ///
    /// [`TimeSignature::SixEight`] if compound subdivisions dominate, otherwise
    /// [`TimeSignature::FourFour`] (also for fewer than `min_notes` notes or a zero
    /// tempo)
    pub fn estimate(&self, notes: &[Note], tempo: u32) -> TimeSignature {
        if notes.len() < self.min_notes || tempo == 0 {
            return TimeSignature::FourFour;
        }

        let beat = 60.0 / tempo as f32;
        let tolerance = self.tolerance_ratio * beat;
        let simple_periods = [beat, beat / 2.0];
        let compound_periods = [beat * 1.5, (beat / 2.0) * 3.0];

        let score = |periods: &[f32]| -> f32 {
            notes
                .iter()
                .map(|note| {
                    periods
                        .iter()
                        .filter(|&&period| aligned(note.start_time, period, tolerance))
                        .count() as f32
                })
                .sum()
        };

        let common_score = score(&simple_periods[..]);
        let compound_score = score(&compound_periods[..]);

        log::debug!(
            "Meter scores at {} BPM: simple {:.1}, compound {:.1}",
            tempo,
            common_score,
            compound_score
        );

        if compound_score > self.compound_bias * common_score {
            TimeSignature::SixEight
        } else {
            TimeSignature::FourFour
        }
    }
}

/// Whether `time` falls within `tolerance` of a multiple of `period`
fn aligned(time: f32, period: f32, tolerance: f32) -> bool {
    if !(period > 0.0) || !time.is_finite() {
        return false;
    }
    let offset = time.rem_euclid(period);
    offset < tolerance || period - offset < tolerance
}
