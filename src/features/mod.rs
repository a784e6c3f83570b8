//! Feature extraction modules
//!
//! This module contains all feature extraction algorithms:
//! - Signal helpers (RMS, median, framing)
//! - Pitch tracking and note segmentation
//! - Onset detection (energy rise)
//! - Period estimation (BPM from inter-onset intervals)
//! - Key detection
//! - Meter (time signature) estimation

pub mod key;
pub mod meter;
pub mod onset;
pub mod period;
pub mod pitch;
pub mod signal;
