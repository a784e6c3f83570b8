//! Onset detection modules
//!
//! Detect rhythmic events as sudden increases in signal energy:
//! - Energy rise with an adaptive moving-average threshold

pub mod energy_rise;

pub use energy_rise::{detect_energy_rise_onsets, EnergyRiseParams};
