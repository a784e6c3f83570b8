//! McLeod Pitch Method detector
//!
//! Default [`PitchDetector`] backed by the `pitch_detection` crate's MPM
//! implementation (normalized square difference function with quadratic peak
//! interpolation).
//!
//! # Reference
//!
//! McLeod, P., & Wyvill, G. (2005). A Smarter Way to Find Pitch.
//! *Proceedings of the International Computer Music Conference*.

use pitch_detection::detector::mcleod::McLeodDetector;
use pitch_detection::detector::PitchDetector as _;

use super::{PitchDetector, PitchEstimate};

/// McLeod (MPM) pitch detector
///
/// The underlying detector is sized on first use and rebuilt if the frame length
/// changes. Frames with no energy or no NSDF peak above `peak_threshold` report
/// [`PitchEstimate::UNPITCHED`].
pub struct McLeodPitchDetector {
    /// Minimum NSDF value for a peak to be chosen as the period (default: 0.6)
    pub peak_threshold: f32,
    detector: Option<(usize, McLeodDetector<f32>)>,
}

impl McLeodPitchDetector {
    /// Create a detector with the default peak threshold
    pub fn new() -> Self {
        Self::with_peak_threshold(0.6)
    }

    /// Create a detector with a custom peak threshold
    pub fn with_peak_threshold(peak_threshold: f32) -> Self {
        Self {
            peak_threshold,
            detector: None,
        }
    }

    fn detector_for(&mut self, size: usize) -> &mut McLeodDetector<f32> {
        if matches!(self.detector, Some((len, _)) if len != size) {
            self.detector = None;
        }
        let (_, detector) = self.detector.get_or_insert_with(|| {
            log::debug!("Building McLeod detector for {}-sample frames", size);
            (size, McLeodDetector::new(size, size / 2))
        });
        detector
    }
}

impl Default for McLeodPitchDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for McLeodPitchDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McLeodPitchDetector")
            .field("peak_threshold", &self.peak_threshold)
            .field("frame_size", &self.detector.as_ref().map(|(len, _)| *len))
            .finish()
    }
}

impl PitchDetector for McLeodPitchDetector {
    fn estimate(&mut self, frame: &[f32], sample_rate: u32) -> PitchEstimate {
        if frame.len() < 4 || sample_rate == 0 || frame.iter().all(|&s| s == 0.0) {
            return PitchEstimate::UNPITCHED;
        }

        let peak_threshold = self.peak_threshold;
        let pitch = self
            .detector_for(frame.len())
            .get_pitch(frame, sample_rate as usize, 0.0, peak_threshold);

        match pitch {
            Some(p) if p.frequency.is_finite() && p.clarity.is_finite() && p.frequency > 0.0 => {
                PitchEstimate {
                    frequency: p.frequency,
                    clarity: p.clarity.clamp(0.0, 1.0),
                }
            }
            _ => PitchEstimate::UNPITCHED,
        }
    }
}
