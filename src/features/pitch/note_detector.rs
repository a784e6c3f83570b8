//! Frame-based note detection
//!
//! Turns a mono buffer into confirmed notes.
//!
//! # Algorithm
//!
//! 1. Slide a frame (2048 samples) across the buffer with a fixed hop (441 samples)
//! 2. Gate silence at a fraction of the global RMS; run the pitch detector on the rest
//! 3. Median-filter the detected frequency over the last few frames
//! 4. Name the smoothed frequency; a frame is confident if named and clear enough
//! 5. Feed each frame to [`NoteTracker`], which confirms a note after a run of
//!    identical confident frames and closes it when the pitch changes or drops out
//!
//! Velocity is derived from the frame RMS relative to the global RMS.
//!
//! # Example
//!
//! ```no_run
//! use tonescribe::features::pitch::{McLeodPitchDetector, NoteDetector};
//! use tonescribe::AnalysisConfig;
//!
//! let samples = vec![0.0f32; 44100 * 5];
//! let detector = NoteDetector::from_config(&AnalysisConfig::default());
//! let notes = detector.detect(&samples, 44100, &mut McLeodPitchDetector::new());
//! println!("Found {} notes", notes.len());
//! ```

use std::collections::VecDeque;

use super::{NoteName, PitchDetector, PitchEstimate, PitchNamer};
use crate::analysis::result::Note;
use crate::config::AnalysisConfig;
use crate::features::signal::{frames, median, rms, EPSILON};

/// Outcome of one analysis frame, as seen by the note tracker
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameReading {
    /// A named pitch with enough clarity
    Pitched {
        /// Smoothed note name
        name: NoteName,
        /// Frame velocity (0-127)
        velocity: u8,
    },
    /// Silence, unclear pitch, or low clarity
    Unpitched,
}

#[derive(Debug, Clone, Copy)]
struct OpenNote {
    pitch: NoteName,
    start: f32,
    velocity: u8,
}

/// Note segmentation state machine
///
/// Advanced once per frame. A pitch must be seen on `stability_frames` consecutive
/// confident frames before a note is confirmed; the note then starts at the first
/// of those frames. Notes shorter than `min_duration` are discarded when closed.
#[derive(Debug, Clone)]
pub struct NoteTracker {
    stability_frames: usize,
    min_duration: f32,
    last_pitch: Option<NoteName>,
    consecutive_frames: usize,
    potential_start: f32,
    current: Option<OpenNote>,
}

impl NoteTracker {
    /// Create a tracker
    pub fn new(stability_frames: usize, min_duration: f32) -> Self {
        Self {
            stability_frames: stability_frames.max(1),
            min_duration,
            last_pitch: None,
            consecutive_frames: 0,
            potential_start: 0.0,
            current: None,
        }
    }

    /// Process the frame starting at `time` seconds
    ///
    /// Returns a note when this frame closes one that is long enough.
    pub fn advance(&mut self, time: f32, reading: FrameReading) -> Option<Note> {
        match reading {
            FrameReading::Unpitched => {
                let closed = self.close(time);
                self.reset();
                closed
            }
            FrameReading::Pitched { name, velocity } => {
                let mut closed = None;
                if self.last_pitch == Some(name) {
                    self.consecutive_frames += 1;
                } else {
                    closed = self.close(time);
                    self.last_pitch = Some(name);
                    self.consecutive_frames = 1;
                    self.potential_start = time;
                }

                if self.consecutive_frames >= self.stability_frames {
                    match self.current.as_mut() {
                        Some(open) => open.velocity = open.velocity.max(velocity),
                        None => {
                            self.current = Some(OpenNote {
                                pitch: name,
                                start: self.potential_start,
                                velocity,
                            })
                        }
                    }
                }

                closed
            }
        }
    }

    /// Close any open note at `end_time` (the end of the buffer)
    pub fn finish(mut self, end_time: f32) -> Option<Note> {
        self.close(end_time)
    }

    /// Whether a note is currently confirmed and open
    pub fn has_open_note(&self) -> bool {
        self.current.is_some()
    }

    fn close(&mut self, end_time: f32) -> Option<Note> {
        let open = self.current.take()?;
        let duration = end_time - open.start;
        if duration >= self.min_duration {
            Some(Note {
                pitch: open.pitch,
                start_time: open.start,
                duration,
                velocity: open.velocity,
            })
        } else {
            log::trace!(
                "Dropping {} at {:.3}s: {:.3}s is too short",
                open.pitch,
                open.start,
                duration
            );
            None
        }
    }

    fn reset(&mut self) {
        self.last_pitch = None;
        self.consecutive_frames = 0;
        self.potential_start = 0.0;
        self.current = None;
    }
}

/// Monophonic note detector
#[derive(Debug, Clone)]
pub struct NoteDetector {
    frame_size: usize,
    hop_size: usize,
    silence_gate_ratio: f32,
    median_window: usize,
    clarity_threshold: f32,
    stability_frames: usize,
    min_note_duration: f32,
    namer: PitchNamer,
}

impl NoteDetector {
    /// Detector using the configured framing and thresholds
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            frame_size: config.note_frame_size,
            hop_size: config.note_hop_size,
            silence_gate_ratio: config.silence_gate_ratio,
            median_window: config.median_window.max(1),
            clarity_threshold: config.clarity_threshold,
            stability_frames: config.stability_frames,
            min_note_duration: config.min_detected_note_seconds,
            namer: PitchNamer::from_config(config),
        }
    }

    /// Detect notes in a mono buffer
    ///
    /// Consumes the whole buffer in one pass. Degenerate input (too short for one
    /// frame, silent, zero sample rate) yields no notes rather than an error.
    ///
    /// # Arguments
    ///
    /// * `samples` - Mono audio samples
    /// * `sample_rate` - Sample rate in Hz
    /// * `detector` - Per-frame pitch detector
    ///
    /// # Returns
    ///
    /// Notes in order of start time
    pub fn detect(
        &self,
        samples: &[f32],
        sample_rate: u32,
        detector: &mut dyn PitchDetector,
    ) -> Vec<Note> {
        if sample_rate == 0 || samples.len() < self.frame_size {
            log::debug!(
                "Note detection skipped: {} samples, frame size {}",
                samples.len(),
                self.frame_size
            );
            return Vec::new();
        }

        let global_rms = rms(samples);
        if !(global_rms > 0.0) {
            log::debug!("Note detection skipped: buffer is silent");
            return Vec::new();
        }

        let gate = self.silence_gate_ratio * global_rms;
        let sr = sample_rate as f32;
        log::debug!(
            "Detecting notes: {} samples at {} Hz, frame={}, hop={}, global RMS={:.5}",
            samples.len(),
            sample_rate,
            self.frame_size,
            self.hop_size,
            global_rms
        );

        let mut window: VecDeque<f32> = VecDeque::with_capacity(self.median_window);
        let mut tracker = NoteTracker::new(self.stability_frames, self.min_note_duration);
        let mut notes = Vec::new();
        let mut frame_count = 0usize;

        for (start, frame) in frames(samples, self.frame_size, self.hop_size) {
            frame_count += 1;
            let time = start as f32 / sr;
            let frame_rms = rms(frame);

            let estimate = if frame_rms < gate {
                PitchEstimate::UNPITCHED
            } else {
                detector.estimate(frame, sample_rate)
            };

            if window.len() == self.median_window {
                window.pop_front();
            }
            window.push_back(estimate.frequency);
            let smoothed = median(window.make_contiguous()).unwrap_or(0.0);

            let reading = match self.namer.name_of(smoothed) {
                Some(name) if estimate.clarity >= self.clarity_threshold => FrameReading::Pitched {
                    name,
                    velocity: frame_velocity(frame_rms, global_rms),
                },
                _ => FrameReading::Unpitched,
            };

            if reading == FrameReading::Unpitched {
                window.clear();
            }

            if let Some(note) = tracker.advance(time, reading) {
                notes.push(note);
            }
        }

        if let Some(note) = tracker.finish(samples.len() as f32 / sr) {
            notes.push(note);
        }

        log::debug!("Detected {} notes over {} frames", notes.len(), frame_count);
        notes
    }
}

/// Velocity of a frame from its loudness relative to the whole buffer
pub fn frame_velocity(frame_rms: f32, global_rms: f32) -> u8 {
    ((frame_rms / (global_rms + EPSILON)) * 90.0 + 30.0)
        .round()
        .clamp(0.0, 127.0) as u8
}
