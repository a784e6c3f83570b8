//! Audio I/O modules
//!
//! Decoded audio buffers and decoding using Symphonia.

pub mod audio_buffer;
pub mod decoder;

pub use audio_buffer::AudioBuffer;
