//! Period estimation modules
//!
//! Convert an onset list to a tempo using:
//! - Inter-onset intervals with octave folding and a median estimate

pub mod ioi;

pub use ioi::TempoEstimator;

/// Final tempo estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BpmEstimate {
    /// Tempo in BPM, inside the configured band
    pub bpm: u32,

    /// Number of onsets the estimate was based on
    pub onset_count: usize,

    /// True if evidence was insufficient and `bpm` is the default
    pub is_default: bool,
}
