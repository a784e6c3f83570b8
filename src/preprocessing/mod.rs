//! Audio preprocessing modules
//!
//! This module contains utilities for preparing audio for analysis:
//! - Truncation to the maximum analysable duration
//! - Channel mixing (multichannel to mono)

pub mod channel_mixer;
pub mod truncation;
