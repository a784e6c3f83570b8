//! Key detection algorithm
//!
//! Builds a duration- and velocity-weighted pitch-class histogram from the notes
//! and correlates it with the Krumhansl-Schmuckler templates of all 24 keys.
//!
//! # Reference
//!
//! Krumhansl, C. L. (1990). *Cognitive Foundations of Musical Pitch*. Oxford
//! University Press. (Key-finding algorithm after Krumhansl & Schmuckler.)

use super::templates::KeyTemplates;
use crate::analysis::result::{Key, Note};

/// Relative score difference below which two keys are tied
const TIE_TOLERANCE: f64 = 1e-9;

/// Note-based key estimator
#[derive(Debug, Clone, Default)]
pub struct KeyEstimator {
    templates: KeyTemplates,
}

impl KeyEstimator {
    /// Create an estimator with the Krumhansl-Kessler templates
    pub fn new() -> Self {
        Self::default()
    }

    /// Estimate the key of a note list
    ///
    /// Each note adds `duration * (0.5 + velocity / 254)` to its pitch class. The
    /// normalized histogram is scored against every major and minor template
    /// (roots C to B, major before minor); the first highest score wins.
    ///
    /// # Returns
    ///
    /// `None` if the notes carry no weight (empty list or zero durations)
    pub fn estimate(&self, notes: &[Note]) -> Option<Key> {
        let histogram = pitch_class_histogram(notes)?;

        let mut best: Option<(Key, f64)> = None;
        for root in 0..12u32 {
            let candidates = [
                (Key::Major(root), self.templates.get_major_template(root)),
                (Key::Minor(root), self.templates.get_minor_template(root)),
            ];
            for (key, template) in candidates {
                let score: f64 = histogram
                    .iter()
                    .zip(template)
                    .map(|(h, t)| h * t)
                    .sum();
                // Scores within rounding of the best count as ties; the earlier key stays
                if best.map_or(true, |(_, best_score)| {
                    score - best_score > TIE_TOLERANCE * best_score.abs()
                }) {
                    best = Some((key, score));
                }
            }
        }

        if let Some((key, score)) = best {
            log::debug!("Estimated key {} (correlation {:.4})", key, score);
        }
        best.map(|(key, _)| key)
    }
}

/// Normalized, weighted pitch-class histogram of a note list
///
/// Returns `None` when the total weight is zero.
pub fn pitch_class_histogram(notes: &[Note]) -> Option<[f64; 12]> {
    let mut histogram = [0.0f64; 12];
    let mut total_weight = 0.0f64;

    for note in notes {
        let weight = note.duration as f64 * (0.5 + note.velocity as f64 / 254.0);
        histogram[note.pitch.pitch_class()] += weight;
        total_weight += weight;
    }

    if !(total_weight > 0.0) {
        log::debug!("Key indeterminate: {} notes carry no weight", notes.len());
        return None;
    }

    for bin in &mut histogram {
        *bin /= total_weight;
    }
    Some(histogram)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(pitch: &str, start: f32, duration: f32) -> Note {
        Note {
            pitch: pitch.parse().unwrap(),
            start_time: start,
            duration,
            velocity: 100,
        }
    }

    #[test]
    fn test_c_major_triad() {
        let notes: Vec<Note> = ["C4", "E4", "G4"]
            .iter()
            .cycle()
            .take(12)
            .enumerate()
            .map(|(i, p)| note(p, i as f32 * 0.5, 0.5))
            .collect();
        assert_eq!(KeyEstimator::new().estimate(&notes), Some(Key::Major(0)));
    }

    #[test]
    fn test_a_minor_tonic_weighted() {
        let notes = vec![
            note("A3", 0.0, 2.0),
            note("C4", 2.0, 1.0),
            note("E4", 3.0, 1.0),
        ];
        assert_eq!(KeyEstimator::new().estimate(&notes), Some(Key::Minor(9)));
    }

    #[test]
    fn test_c_major_scale_with_octave_tonic() {
        let notes: Vec<Note> = ["C4", "D4", "E4", "F4", "G4", "A4", "B4", "C5"]
            .iter()
            .enumerate()
            .map(|(i, p)| note(p, i as f32 * 0.5, 0.45))
            .collect();
        assert_eq!(KeyEstimator::new().estimate(&notes), Some(Key::Major(0)));
    }

    #[test]
    fn test_octave_does_not_matter() {
        let low = vec![note("G2", 0.0, 1.0), note("B2", 1.0, 1.0), note("D3", 2.0, 1.0)];
        let high = vec![note("G5", 0.0, 1.0), note("B5", 1.0, 1.0), note("D6", 2.0, 1.0)];
        let estimator = KeyEstimator::new();
        assert_eq!(estimator.estimate(&low), estimator.estimate(&high));
        assert_eq!(estimator.estimate(&low), Some(Key::Major(7)));
    }

    #[test]
    fn test_zero_velocity_keeps_half_weight() {
        let mut quiet = note("D4", 0.0, 1.0);
        quiet.velocity = 0;
        let histogram = pitch_class_histogram(&[quiet, note("A4", 1.0, 1.0)]).unwrap();
        // 0.5 vs 0.5 + 100/254
        let expected = 0.5 / (0.5 + 0.5 + 100.0 / 254.0);
        assert!((histogram[2] - expected).abs() < 1e-9);
    }

    #[test]
    fn test_uniform_chromatic_tie_keeps_first_key() {
        // Every template sums to one, so all 24 correlations are equal
        let chromatic = [
            "C4", "C#4", "D4", "D#4", "E4", "F4", "F#4", "G4", "G#4", "A4", "A#4", "B4",
        ];
        let notes: Vec<Note> = chromatic
            .iter()
            .enumerate()
            .map(|(i, p)| note(p, i as f32 * 0.5, 0.5))
            .collect();
        assert_eq!(KeyEstimator::new().estimate(&notes), Some(Key::Major(0)));
    }

    #[test]
    fn test_indeterminate_without_weight() {
        let estimator = KeyEstimator::new();
        assert_eq!(estimator.estimate(&[]), None);
        assert_eq!(estimator.estimate(&[note("C4", 0.0, 0.0)]), None);
    }
}
