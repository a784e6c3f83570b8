//! Note list post-processing
//!
//! Turns raw detector output into the final note list:
//! 1. Filter out notes that are too short or carry non-finite timing
//! 2. Sort by start time (stable, so equal starts keep detection order)
//! 3. Merge same-pitch neighbours separated by a brief dropout

use crate::analysis::result::Note;

/// Keep notes at least `min_duration` long with finite, non-negative timing
///
/// Pitch well-formedness is guaranteed by [`NoteName`](crate::features::pitch::NoteName).
pub fn filter_notes(notes: Vec<Note>, min_duration: f32) -> Vec<Note> {
    let before = notes.len();
    let kept: Vec<Note> = notes
        .into_iter()
        .filter(|note| {
            note.start_time.is_finite()
                && note.start_time >= 0.0
                && note.duration.is_finite()
                && note.duration >= min_duration
        })
        .collect();

    if kept.len() < before {
        log::debug!(
            "Filtered {} of {} notes shorter than {:.3}s",
            before - kept.len(),
            before,
            min_duration
        );
    }
    kept
}

/// Sort notes by start time
pub fn sort_notes(notes: &mut [Note]) {
    notes.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
}

/// Merge adjacent same-pitch notes whose gap is under `max_gap` seconds
///
/// Expects notes sorted by start time. The merged note keeps the first start,
/// extends to the later end, and takes the louder velocity. Running this on its
/// own output changes nothing.
pub fn merge_adjacent(notes: Vec<Note>, max_gap: f32) -> Vec<Note> {
    let before = notes.len();
    let mut merged: Vec<Note> = Vec::with_capacity(before);

    for note in notes {
        if let Some(last) = merged.last_mut() {
            if last.pitch == note.pitch && note.start_time - last.end_time() < max_gap {
                let end = last.end_time().max(note.end_time());
                last.duration = end - last.start_time;
                last.velocity = last.velocity.max(note.velocity);
                continue;
            }
        }
        merged.push(note);
    }

    if merged.len() < before {
        log::debug!("Merged {} notes into {}", before, merged.len());
    }
    merged
}
