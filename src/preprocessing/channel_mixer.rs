//! Channel mixing utilities (multichannel to mono conversion)

use crate::error::AnalysisError;

/// Mix planar channels down to mono by per-sample averaging
///
/// Only the first `frames` samples of each channel are used.
///
/// # Arguments
///
/// * `channels` - Planar channel data
/// * `frames` - Number of samples per channel to mix
///
/// # Returns
///
/// Mono samples, `frames` long
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if there are no channels or a channel is
/// shorter than `frames`.
pub fn mix_to_mono(channels: &[Vec<f32>], frames: usize) -> Result<Vec<f32>, AnalysisError> {
    if channels.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "Cannot mix zero channels".to_string(),
        ));
    }

    if let Some(short) = channels.iter().find(|c| c.len() < frames) {
        return Err(AnalysisError::InvalidInput(format!(
            "Channel has {} samples, expected at least {}",
            short.len(),
            frames
        )));
    }

    log::debug!(
        "Mixing {} channel(s) x {} frames to mono",
        channels.len(),
        frames
    );

    if channels.len() == 1 {
        return Ok(channels[0][..frames].to_vec());
    }

    let scale = 1.0 / channels.len() as f32;
    let mono = (0..frames)
        .map(|i| channels.iter().map(|c| c[i]).sum::<f32>() * scale)
        .collect();

    Ok(mono)
}
