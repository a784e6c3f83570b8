//! Analysis and result aggregation modules
//!
//! Turns feature extraction output into the final analysis:
//! - Result types
//! - Note filtering, sorting and merging
//! - Synthetic placeholder notes

pub mod postprocess;
pub mod result;
pub mod synthetic;
