//! Key detection modules
//!
//! Detect musical key using:
//! - Krumhansl-Kessler templates (24 keys)
//! - Template matching against a weighted pitch-class histogram of the notes

pub mod detector;
pub mod templates;

pub use detector::{pitch_class_histogram, KeyEstimator};
pub use templates::KeyTemplates;
