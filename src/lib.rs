//! # Tonescribe
//!
//! An audio-to-note analysis engine: turns a decoded recording into a symbolic
//! description made of discrete notes, a global tempo, a musical key and a coarse
//! time signature.
//!
//! ## Features
//!
//! - **Note Detection**: Frame-based monophonic pitch tracking (McLeod by default)
//!   with median smoothing and a stability state machine
//! - **Tempo Estimation**: Energy-rise onsets and median inter-onset interval with
//!   octave folding
//! - **Key Detection**: Krumhansl-Schmuckler template matching over a weighted
//!   pitch-class histogram of the notes
//! - **Time Signature**: Simple (4/4) vs compound (6/8) onset alignment heuristic
//!
//! ## Quick Start
//!
//! ```no_run
//! use tonescribe::{analyze_audio, AnalysisConfig, AudioBuffer};
//!
//! // Decoded audio (planar f32 channels)
//! let audio = AudioBuffer::from_mono(vec![0.0f32; 44100 * 10], 44100);
//!
//! // Analyze (never fails; problems fall back to safe defaults)
//! let result = analyze_audio(&audio, &AnalysisConfig::default());
//!
//! println!("Tempo: {} BPM", result.tempo);
//! println!("Key: {:?}", result.key);
//! println!("Notes: {}", result.notes.len());
//! ```
//!
//! ## Architecture
//!
//! The analysis pipeline follows this flow:
//!
//! ```text
//! AudioBuffer → Truncate → Mono Mixdown → {Note Detection, Tempo} → Key / Meter
//!             → Filter → Sort → Merge → AnalysisResult
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod preprocessing;

// Re-export main types
pub use analysis::result::{
    AnalysisFlag, AnalysisMetadata, AnalysisResult, Key, Note, TimeSignature,
};
pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use features::pitch::{McLeodPitchDetector, NoteName, PitchDetector, PitchEstimate};
pub use io::AudioBuffer;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use analysis::postprocess::{filter_notes, merge_adjacent, sort_notes};
use analysis::result::ALGORITHM_VERSION;
use analysis::synthetic::synthetic_notes;
use features::key::KeyEstimator;
use features::meter::TimeSignatureEstimator;
use features::period::{BpmEstimate, TempoEstimator};
use features::pitch::NoteDetector;
use features::signal::rms;
use preprocessing::channel_mixer::mix_to_mono;
use preprocessing::truncation::analysable_frames;

/// Main analysis function
///
/// Analyzes decoded audio with the default McLeod pitch detector. Never fails:
/// any internal error is logged and replaced by [`AnalysisResult::fallback`].
///
/// # Arguments
///
/// * `audio` - Decoded audio, any channel count
/// * `config` - Analysis configuration parameters
///
/// # Returns
///
/// `AnalysisResult` with a non-empty note list and a tempo inside the tempo band
///
/// # Example
///
/// ```no_run
/// use tonescribe::{analyze_audio, AnalysisConfig, AudioBuffer};
///
/// let audio = AudioBuffer::from_mono(vec![0.0f32; 44100 * 30], 44100); // 30 seconds of silence
/// let result = analyze_audio(&audio, &AnalysisConfig::default());
/// assert!(!result.notes.is_empty());
/// ```
pub fn analyze_audio(audio: &AudioBuffer, config: &AnalysisConfig) -> AnalysisResult {
    analyze_audio_with_detector(audio, config, &mut McLeodPitchDetector::new())
}

/// Analyze with a caller-supplied pitch detector
///
/// Same never-fail contract as [`analyze_audio`]: errors and panics raised inside
/// the pipeline (including the detector) yield [`AnalysisResult::fallback`].
pub fn analyze_audio_with_detector(
    audio: &AudioBuffer,
    config: &AnalysisConfig,
    detector: &mut dyn PitchDetector,
) -> AnalysisResult {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        try_analyze_audio(audio, config, detector)
    }));

    let reason = match outcome {
        Ok(Ok(result)) => return result,
        Ok(Err(e)) => e.to_string(),
        Err(payload) => format!("panic: {}", panic_message(payload.as_ref())),
    };

    log::warn!("Analysis failed, returning safe default result: {}", reason);
    let default_config;
    let fallback_config = if config.validate().is_ok() {
        config
    } else {
        default_config = AnalysisConfig::default();
        &default_config
    };
    AnalysisResult::fallback(audio.sample_rate(), fallback_config)
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        *msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "unknown panic"
    }
}

/// Fallible analysis pipeline
///
/// Steps, in order:
/// 1. Truncate to `max_duration_seconds`
/// 2. Mix all channels down to mono
/// 3. Detect notes and estimate tempo (concurrently if `config.parallel`)
/// 4. Substitute synthetic notes if detection found none
/// 5. Estimate key and time signature from the notes
/// 6. Drop short notes (re-synthesizing if none survive), sort, merge
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for an invalid buffer or configuration, and
/// `AnalysisError::NumericalError` if the signal energy is not finite.
pub fn try_analyze_audio(
    audio: &AudioBuffer,
    config: &AnalysisConfig,
    detector: &mut dyn PitchDetector,
) -> Result<AnalysisResult, AnalysisError> {
    use std::time::Instant;
    let start_time = Instant::now();

    config.validate()?;
    audio.validate()?;

    let sample_rate = audio.sample_rate();
    log::debug!(
        "Starting audio analysis: {} channel(s) x {} frames at {} Hz",
        audio.channel_count(),
        audio.frames(),
        sample_rate
    );

    // Preprocessing
    let (frames, truncated) =
        analysable_frames(audio.frames(), sample_rate, config.max_duration_seconds);
    if truncated {
        log::debug!(
            "Truncating {:.2}s of audio to {:.2}s",
            audio.duration_seconds(),
            config.max_duration_seconds
        );
    }
    let mono = mix_to_mono(audio.channels(), frames)?;
    let level = rms(&mono);
    if !level.is_finite() {
        return Err(AnalysisError::NumericalError(format!(
            "Signal energy overflows ({})",
            level
        )));
    }
    let duration_seconds = frames as f32 / sample_rate as f32;

    // Note detection and tempo
    let note_detector = NoteDetector::from_config(config);
    let tempo_estimator = TempoEstimator::from_config(config);
    let (detected, tempo) = if config.parallel {
        detect_parallel(&mono, sample_rate, &note_detector, &tempo_estimator, detector)?
    } else {
        let detected = note_detector.detect(&mono, sample_rate, detector);
        (detected, tempo_estimator.estimate(&mono, sample_rate))
    };

    let mut flags = Vec::new();
    if tempo.is_default {
        flags.push(AnalysisFlag::DefaultTempo);
    }

    let notes = if detected.is_empty() {
        log::debug!("No notes detected, substituting synthetic notes");
        flags.push(AnalysisFlag::SyntheticNotes);
        synthetic_notes(duration_seconds, config)
    } else {
        detected
    };

    // Key and meter
    let key = KeyEstimator::new().estimate(&notes);
    if key.is_none() {
        flags.push(AnalysisFlag::IndeterminateKey);
    }
    let time_signature = TimeSignatureEstimator::from_config(config).estimate(&notes, tempo.bpm);
    let bpm = tempo.bpm.max(config.min_bpm);

    // Post-processing
    let filtered = filter_notes(notes, config.min_note_seconds);
    let notes = if filtered.is_empty() {
        log::debug!("No notes survived filtering, substituting synthetic notes");
        if !flags.contains(&AnalysisFlag::SyntheticNotes) {
            flags.push(AnalysisFlag::SyntheticNotes);
        }
        synthetic_notes(duration_seconds, config)
    } else {
        let mut sorted = filtered;
        sort_notes(&mut sorted);
        merge_adjacent(sorted, config.merge_gap_seconds)
    };

    log::debug!(
        "Analysis complete in {:.2} ms: {} BPM, key {}, {}, {} notes",
        start_time.elapsed().as_secs_f32() * 1000.0,
        bpm,
        key.map(|k| k.name()).unwrap_or_else(|| "indeterminate".to_string()),
        time_signature,
        notes.len()
    );

    Ok(AnalysisResult {
        tempo: bpm,
        key,
        time_signature,
        notes,
        truncated,
        metadata: AnalysisMetadata {
            duration_seconds,
            sample_rate,
            algorithm_version: ALGORITHM_VERSION.to_string(),
            flags,
        },
    })
}

/// Run tempo estimation on the rayon pool while notes are detected on this thread
fn detect_parallel(
    mono: &[f32],
    sample_rate: u32,
    note_detector: &NoteDetector,
    tempo_estimator: &TempoEstimator,
    detector: &mut dyn PitchDetector,
) -> Result<(Vec<Note>, BpmEstimate), AnalysisError> {
    let mut tempo: Option<BpmEstimate> = None;
    let tempo_slot = &mut tempo;

    let notes = rayon::in_place_scope(|scope| {
        scope.spawn(move |_| *tempo_slot = Some(tempo_estimator.estimate(mono, sample_rate)));
        note_detector.detect(mono, sample_rate, detector)
    });

    let tempo = tempo.ok_or_else(|| {
        AnalysisError::ProcessingError("Tempo estimation did not complete".to_string())
    })?;
    Ok((notes, tempo))
}
