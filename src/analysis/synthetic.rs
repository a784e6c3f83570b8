//! Synthetic placeholder notes
//!
//! Used when detection yields nothing usable so a result always has renderable
//! content: an ascending C-major scale (C4 to C5), repeated as needed.

use crate::analysis::result::Note;
use crate::config::AnalysisConfig;
use crate::features::pitch::NoteName;

/// Piano key numbers of the C-major scale from C4 to C5
pub const C_MAJOR_SCALE: [u8; 8] = [60, 62, 64, 65, 67, 69, 71, 72];

/// Build the placeholder note sequence for a buffer of `duration_seconds`
///
/// Produces `max(synthetic_min_notes, floor(duration / spacing))` notes, one every
/// `synthetic_note_spacing` seconds starting at 0, each lasting
/// `spacing * synthetic_duty_cycle` at `synthetic_velocity`. The output depends
/// only on its arguments.
pub fn synthetic_notes(duration_seconds: f32, config: &AnalysisConfig) -> Vec<Note> {
    let spacing = config.synthetic_note_spacing;
    let fitting = if duration_seconds.is_finite() && duration_seconds > 0.0 && spacing > 0.0 {
        (duration_seconds / spacing).floor() as usize
    } else {
        0
    };
    let count = fitting.max(config.synthetic_min_notes);

    C_MAJOR_SCALE
        .iter()
        .cycle()
        .take(count)
        .enumerate()
        .filter_map(|(i, &number)| {
            NoteName::from_number(number).map(|pitch| Note {
                pitch,
                start_time: i as f32 * spacing,
                duration: spacing * config.synthetic_duty_cycle,
                velocity: config.synthetic_velocity.min(127),
            })
        })
        .collect()
}
