//! Meter estimation
//!
//! Coarse simple-vs-compound time signature guess from note onsets and tempo.

pub mod time_signature;

pub use time_signature::TimeSignatureEstimator;
