//! Duration capping

/// Number of sample frames to analyse, and whether the input was cut short
///
/// Audio longer than `max_duration_seconds` is limited to its first
/// `max_duration_seconds`; anything at or below the cap is kept whole.
pub fn analysable_frames(frames: usize, sample_rate: u32, max_duration_seconds: f32) -> (usize, bool) {
    if sample_rate == 0 {
        return (frames, false);
    }

    let duration = frames as f32 / sample_rate as f32;
    if duration <= max_duration_seconds {
        return (frames, false);
    }

    let limit = (max_duration_seconds as f64 * sample_rate as f64) as usize;
    log::debug!(
        "Truncating {:.2}s of audio to {:.2}s ({} of {} frames)",
        duration,
        max_duration_seconds,
        limit,
        frames
    );
    (limit.min(frames), true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_audio_untouched() {
        assert_eq!(analysable_frames(44100 * 30, 44100, 60.0), (44100 * 30, false));
    }

    #[test]
    fn test_exact_cap_untouched() {
        assert_eq!(analysable_frames(44100 * 60, 44100, 60.0), (44100 * 60, false));
    }

    #[test]
    fn test_long_audio_truncated() {
        assert_eq!(analysable_frames(44100 * 90, 44100, 60.0), (44100 * 60, true));
    }
}
