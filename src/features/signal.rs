//! Small numeric helpers shared by the feature extractors

/// Numerical stability epsilon
pub const EPSILON: f32 = 1e-10;

/// Root-mean-square energy of a buffer (0.0 for an empty buffer)
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|&x| x * x).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

/// Median of a small window
///
/// For an even number of values the upper of the two middle values is returned, so
/// the result is always one of the inputs. Returns `None` for an empty window.
pub fn median(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    Some(sorted[sorted.len() / 2])
}

/// Iterate over full-length overlapping frames
///
/// Yields `(start_sample, frame)` for every frame of exactly `frame_size` samples
/// starting at multiples of `hop_size`. A trailing partial frame is dropped. Zero
/// frame or hop sizes yield nothing.
pub fn frames(
    samples: &[f32],
    frame_size: usize,
    hop_size: usize,
) -> impl Iterator<Item = (usize, &[f32])> {
    let count = if frame_size == 0 || hop_size == 0 || samples.len() < frame_size {
        0
    } else {
        (samples.len() - frame_size) / hop_size + 1
    };

    (0..count).map(move |i| {
        let start = i * hop_size;
        (start, &samples[start..start + frame_size])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rms() {
        assert_eq!(rms(&[]), 0.0);
        assert!((rms(&[0.5; 64]) - 0.5).abs() < 1e-6);
        assert!((rms(&[1.0, -1.0, 1.0, -1.0]) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[440.0, 0.0, 441.0]), Some(440.0));
        assert_eq!(median(&[0.0, 440.0]), Some(440.0));
        assert_eq!(median(&[3.0]), Some(3.0));
    }

    #[test]
    fn test_frames_drop_partial_tail() {
        let samples: Vec<f32> = (0..10).map(|i| i as f32).collect();
        let collected: Vec<(usize, Vec<f32>)> = frames(&samples, 4, 3)
            .map(|(start, f)| (start, f.to_vec()))
            .collect();
        assert_eq!(collected.len(), 3);
        assert_eq!(collected[0], (0, vec![0.0, 1.0, 2.0, 3.0]));
        assert_eq!(collected[2], (6, vec![6.0, 7.0, 8.0, 9.0]));
    }

    #[test]
    fn test_frames_degenerate() {
        let samples = vec![0.0f32; 100];
        assert_eq!(frames(&samples, 0, 10).count(), 0);
        assert_eq!(frames(&samples, 10, 0).count(), 0);
        assert_eq!(frames(&samples, 101, 10).count(), 0);
        assert_eq!(frames(&samples, 100, 10).count(), 1);
    }
}
