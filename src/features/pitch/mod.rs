//! Pitch tracking modules
//!
//! Monophonic pitch tracking from a mono buffer to discrete notes:
//! - Note naming (frequency to piano key with a cents gate)
//! - Pluggable per-frame pitch detection (McLeod by default)
//! - Frame-by-frame note segmentation

pub mod mcleod;
pub mod note_detector;
pub mod note_name;

pub use mcleod::McLeodPitchDetector;
pub use note_detector::{FrameReading, NoteDetector, NoteTracker};
pub use note_name::{NoteName, PitchNamer};

/// Best-estimate fundamental of one analysis frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchEstimate {
    /// Fundamental frequency in Hz (0.0 = no pitch)
    pub frequency: f32,

    /// Periodicity confidence (0.0-1.0)
    pub clarity: f32,
}

impl PitchEstimate {
    /// No reliable pitch
    pub const UNPITCHED: PitchEstimate = PitchEstimate {
        frequency: 0.0,
        clarity: 0.0,
    };
}

/// Per-frame pitch detection capability
///
/// Implementations receive a frame of exactly the configured frame size and report
/// the fundamental and a clarity score. They never fail: "no pitch" is
/// [`PitchEstimate::UNPITCHED`] or a low clarity.
pub trait PitchDetector {
    /// Estimate the fundamental of `frame`
    fn estimate(&mut self, frame: &[f32], sample_rate: u32) -> PitchEstimate;
}

impl<D: PitchDetector + ?Sized> PitchDetector for &mut D {
    fn estimate(&mut self, frame: &[f32], sample_rate: u32) -> PitchEstimate {
        (**self).estimate(frame, sample_rate)
    }
}
