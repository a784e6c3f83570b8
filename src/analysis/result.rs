//! Analysis result types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::analysis::synthetic::synthetic_notes;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::features::pitch::note_name::NOTE_NAMES;
use crate::features::pitch::NoteName;

/// Version string recorded in result metadata
pub const ALGORITHM_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A detected (or synthetic) note
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Pitch as a piano note name (e.g. "F#5")
    pub pitch: NoteName,

    /// Onset time in seconds
    pub start_time: f32,

    /// Duration in seconds
    pub duration: f32,

    /// Loudness proxy (0-127)
    pub velocity: u8,
}

impl Note {
    /// End time in seconds
    pub fn end_time(&self) -> f32 {
        self.start_time + self.duration
    }
}

/// Musical key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Key {
    /// Major key (0 = C, 1 = C#, ..., 11 = B)
    Major(u32),
    /// Minor key (0 = C, 1 = C#, ..., 11 = B)
    Minor(u32),
}

impl Key {
    /// Tonic pitch class (0 = C, ..., 11 = B)
    pub fn root(&self) -> u32 {
        match self {
            Key::Major(i) | Key::Minor(i) => *i % 12,
        }
    }

    /// Get key name (e.g., "C Major", "A Minor", "F# Major")
    ///
    /// # Example
    ///
    /// ```
    /// use tonescribe::analysis::result::Key;
    ///
    /// assert_eq!(Key::Major(0).name(), "C Major");
    /// assert_eq!(Key::Minor(9).name(), "A Minor");
    /// assert_eq!(Key::Major(6).name(), "F# Major");
    /// ```
    pub fn name(&self) -> String {
        let root = NOTE_NAMES[self.root() as usize];
        match self {
            Key::Major(_) => format!("{} Major", root),
            Key::Minor(_) => format!("{} Minor", root),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for Key {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AnalysisError::InvalidInput(format!("Invalid key: {:?}", s));

        let (root, mode) = s.trim().split_once(' ').ok_or_else(invalid)?;
        let root = NOTE_NAMES
            .iter()
            .position(|&n| n == root)
            .ok_or_else(invalid)? as u32;

        match mode.trim() {
            "Major" => Ok(Key::Major(root)),
            "Minor" => Ok(Key::Minor(root)),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Key {
    type Error = AnalysisError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.name()
    }
}

/// Musical time signature
///
/// Only simple duple (4/4) and compound duple (6/8) are distinguished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeSignature {
    /// 4/4 time (common time)
    #[default]
    #[serde(rename = "4/4")]
    FourFour,
    /// 6/8 time (compound duple)
    #[serde(rename = "6/8")]
    SixEight,
}

impl TimeSignature {
    /// Get name as string ("4/4" or "6/8")
    pub fn name(&self) -> &'static str {
        match self {
            TimeSignature::FourFour => "4/4",
            TimeSignature::SixEight => "6/8",
        }
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Analysis flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisFlag {
    /// No usable notes were detected; the notes are a placeholder scale
    SyntheticNotes,
    /// Too little rhythmic evidence; the tempo is the default
    DefaultTempo,
    /// No notes carried weight for key estimation
    IndeterminateKey,
    /// Analysis failed internally; every field is the safe default
    AnalysisFailed,
}

/// Analysis metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Analysed audio duration in seconds (after truncation)
    pub duration_seconds: f32,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Algorithm version
    pub algorithm_version: String,

    /// Analysis flags
    pub flags: Vec<AnalysisFlag>,
}

/// Complete analysis result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Tempo in BPM, within the configured band
    pub tempo: u32,

    /// Detected key (`None` when indeterminate)
    pub key: Option<Key>,

    /// Coarse time signature
    pub time_signature: TimeSignature,

    /// Notes sorted by start time; never empty
    pub notes: Vec<Note>,

    /// True if the source exceeded the maximum analysable duration
    pub truncated: bool,

    /// Analysis metadata
    pub metadata: AnalysisMetadata,
}

impl AnalysisResult {
    /// Safe default result returned when analysis fails
    ///
    /// Default tempo, C Major, 4/4 and the minimum synthetic scale; flagged
    /// [`AnalysisFlag::AnalysisFailed`] and [`AnalysisFlag::SyntheticNotes`].
    pub fn fallback(sample_rate: u32, config: &AnalysisConfig) -> Self {
        Self {
            tempo: config.default_bpm,
            key: Some(Key::Major(0)),
            time_signature: TimeSignature::FourFour,
            notes: synthetic_notes(0.0, config),
            truncated: false,
            metadata: AnalysisMetadata {
                duration_seconds: 0.0,
                sample_rate,
                algorithm_version: ALGORITHM_VERSION.to_string(),
                flags: vec![AnalysisFlag::AnalysisFailed, AnalysisFlag::SyntheticNotes],
            },
        }
    }

    /// Whether a flag was raised during analysis
    pub fn has_flag(&self, flag: AnalysisFlag) -> bool {
        self.metadata.flags.contains(&flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_name_major() {
        assert_eq!(Key::Major(0).name(), "C Major");
        assert_eq!(Key::Major(1).name(), "C# Major");
        assert_eq!(Key::Major(11).name(), "B Major");
    }

    #[test]
    fn test_key_name_minor() {
        assert_eq!(Key::Minor(0).name(), "C Minor");
        assert_eq!(Key::Minor(9).name(), "A Minor");
        assert_eq!(Key::Minor(6).name(), "F# Minor");
    }

    #[test]
    fn test_key_parse() {
        assert_eq!("G Major".parse::<Key>().unwrap(), Key::Major(7));
        assert_eq!("D# Minor".parse::<Key>().unwrap(), Key::Minor(3));
        assert!("H Major".parse::<Key>().is_err());
        assert!("C Lydian".parse::<Key>().is_err());
        assert!("C".parse::<Key>().is_err());
    }

    #[test]
    fn test_time_signature_name() {
        assert_eq!(TimeSignature::FourFour.name(), "4/4");
        assert_eq!(TimeSignature::SixEight.name(), "6/8");
        assert_eq!(TimeSignature::default(), TimeSignature::FourFour);
    }

    #[test]
    fn test_fallback_is_safe_default() {
        let result = AnalysisResult::fallback(48000, &AnalysisConfig::default());
        assert_eq!(result.tempo, 120);
        assert_eq!(result.key, Some(Key::Major(0)));
        assert_eq!(result.time_signature, TimeSignature::FourFour);
        assert_eq!(result.notes.len(), 8);
        assert!(!result.truncated);
        assert!(result.has_flag(AnalysisFlag::AnalysisFailed));
        assert!(result.has_flag(AnalysisFlag::SyntheticNotes));
        assert!(!result.has_flag(AnalysisFlag::DefaultTempo));
    }

    #[test]
    fn test_result_serializes_musical_strings() {
        let result = AnalysisResult {
            tempo: 96,
            key: Some(Key::Minor(9)),
            time_signature: TimeSignature::SixEight,
            notes: vec![Note {
                pitch: "E4".parse().unwrap(),
                start_time: 0.5,
                duration: 0.25,
                velocity: 100,
            }],
            truncated: false,
            metadata: AnalysisMetadata {
                duration_seconds: 1.0,
                sample_rate: 44100,
                algorithm_version: "test".to_string(),
                flags: vec![],
            },
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["key"], "A Minor");
        assert_eq!(json["time_signature"], "6/8");
        assert_eq!(json["notes"][0]["pitch"], "E4");

        let back: AnalysisResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }
}
