//! Frequency to note-name conversion
//!
//! Maps a frequency to the nearest equal-tempered piano key (A4 = 440 Hz) and
//! rejects frequencies that are off the keyboard or too far from any key.
//!
//! # Example
//!
//! ```
//! use tonescribe::features::pitch::note_name::note_name_for_frequency;
//!
//! assert_eq!(note_name_for_frequency(440.0).unwrap().to_string(), "A4");
//! assert_eq!(note_name_for_frequency(261.63).unwrap().to_string(), "C4");
//! assert!(note_name_for_frequency(5.0).is_none());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;

/// Chromatic note names starting at C
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Key number of A4
pub const A4_NUMBER: u8 = 69;

/// Frequency of A4 in Hz
pub const A4_FREQUENCY: f32 = 440.0;

/// Lowest piano key (A0)
pub const LOWEST_KEY: u8 = 21;

/// Highest piano key (C8)
pub const HIGHEST_KEY: u8 = 108;

/// A note on the 88-key piano, identified by its MIDI key number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NoteName {
    number: u8,
}

impl NoteName {
    /// Note for a MIDI key number, if it lies on the piano (21-108)
    pub fn from_number(number: u8) -> Option<Self> {
        (LOWEST_KEY..=HIGHEST_KEY)
            .contains(&number)
            .then_some(Self { number })
    }

    /// MIDI key number
    pub fn number(&self) -> u8 {
        self.number
    }

    /// Pitch class (0 = C, 1 = C#, ..., 11 = B)
    pub fn pitch_class(&self) -> usize {
        self.number as usize % 12
    }

    /// Scientific-pitch octave (C4 = middle C)
    pub fn octave(&self) -> i32 {
        self.number as i32 / 12 - 1
    }

    /// Equal-tempered frequency in Hz
    pub fn frequency(&self) -> f32 {
        A4_FREQUENCY * 2f32.powf((self.number as f32 - A4_NUMBER as f32) / 12.0)
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", NOTE_NAMES[self.pitch_class()], self.octave())
    }
}

impl FromStr for NoteName {
    type Err = AnalysisError;

    /// Parse `<Letter>[#|b]<Octave>`, e.g. `"F#5"`, `"Bb3"`, `"A0"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AnalysisError::InvalidInput(format!("Invalid note name: {:?}", s));

        let mut chars = s.chars();
        let letter = chars.next().ok_or_else(invalid)?;
        let natural: i32 = match letter.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return Err(invalid()),
        };

        let rest = chars.as_str();
        let (accidental, octave_str) = match rest.as_bytes().first() {
            Some(b'#') => (1, &rest[1..]),
            Some(b'b') => (-1, &rest[1..]),
            _ => (0, rest),
        };

        let octave: i32 = octave_str.parse().map_err(|_| invalid())?;
        let number = (octave + 1) * 12 + natural + accidental;

        u8::try_from(number)
            .ok()
            .and_then(Self::from_number)
            .ok_or_else(invalid)
    }
}

impl TryFrom<String> for NoteName {
    type Error = AnalysisError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NoteName> for String {
    fn from(note: NoteName) -> Self {
        note.to_string()
    }
}

/// Converts frequencies to piano note names
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchNamer {
    /// Frequencies at or below this are "no pitch" (Hz)
    pub min_frequency: f32,
    /// Largest accepted deviation from the nearest key (cents)
    pub max_cents_deviation: f32,
}

impl Default for PitchNamer {
    fn default() -> Self {
        Self {
            min_frequency: 10.0,
            max_cents_deviation: 50.0,
        }
    }
}

impl PitchNamer {
    /// Namer using the configured frequency floor and cents gate
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            min_frequency: config.min_pitch_frequency,
            max_cents_deviation: config.max_cents_deviation,
        }
    }

    /// Nearest piano note for `frequency_hz`, or `None` for no usable pitch
    pub fn name_of(&self, frequency_hz: f32) -> Option<NoteName> {
        if !(frequency_hz > self.min_frequency) || !frequency_hz.is_finite() {
            return None;
        }

        let exact = A4_NUMBER as f32 + 12.0 * (frequency_hz / A4_FREQUENCY).log2();
        let rounded = exact.round();
        if rounded < LOWEST_KEY as f32 || rounded > HIGHEST_KEY as f32 {
            return None;
        }

        let note = NoteName::from_number(rounded as u8)?;
        let cents = 1200.0 * (frequency_hz / note.frequency()).log2();
        if cents.abs() > self.max_cents_deviation {
            return None;
        }

        Some(note)
    }
}

/// [`PitchNamer::name_of`] with the default frequency floor and cents gate
pub fn note_name_for_frequency(frequency_hz: f32) -> Option<NoteName> {
    PitchNamer::default().name_of(frequency_hz)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(f: f32) -> Option<String> {
        note_name_for_frequency(f).map(|n| n.to_string())
    }

    #[test]
    fn test_reference_pitches() {
        assert_eq!(name(440.0).as_deref(), Some("A4"));
        assert_eq!(name(261.63).as_deref(), Some("C4"));
        assert_eq!(name(880.0).as_deref(), Some("A5"));
        assert_eq!(name(27.5).as_deref(), Some("A0"));
        assert_eq!(name(4186.01).as_deref(), Some("C8"));
        assert_eq!(name(739.99).as_deref(), Some("F#5"));
    }

    #[test]
    fn test_no_pitch_below_floor() {
        assert_eq!(name(5.0), None);
        assert_eq!(name(10.0), None);
        assert_eq!(name(0.0), None);
        assert_eq!(name(-440.0), None);
        assert_eq!(name(f32::NAN), None);
    }

    #[test]
    fn test_outside_piano_range() {
        assert_eq!(name(20.0), None); // key 15
        assert_eq!(name(4500.0), None); // key 109
    }

    #[test]
    fn test_nearest_key_rounding() {
        // ~46.6 cents above A4 still rounds to A4
        assert_eq!(name(452.0).as_deref(), Some("A4"));
        // 466.5 Hz is ~1 cent above A#4, not a quarter-tone off A4
        assert_eq!(name(466.5).as_deref(), Some("A#4"));
    }

    #[test]
    fn test_cents_gate() {
        let strict = PitchNamer {
            min_frequency: 10.0,
            max_cents_deviation: 40.0,
        };
        assert_eq!(strict.name_of(452.0), None);
        assert_eq!(strict.name_of(445.0).map(|n| n.to_string()).as_deref(), Some("A4"));
    }

    #[test]
    fn test_parse_and_display() {
        let note: NoteName = "F#5".parse().unwrap();
        assert_eq!(note.number(), 78);
        assert_eq!(note.to_string(), "F#5");
        assert_eq!(note.octave(), 5);
        assert_eq!(note.pitch_class(), 6);

        let flat: NoteName = "Bb3".parse().unwrap();
        assert_eq!(flat.to_string(), "A#3");

        assert!("H4".parse::<NoteName>().is_err());
        assert!("C".parse::<NoteName>().is_err());
        assert!("C9".parse::<NoteName>().is_err());
        assert!("".parse::<NoteName>().is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let note = NoteName::from_number(60).unwrap();
        let json = serde_json::to_string(&note).unwrap();
        assert_eq!(json, "\"C4\"");
        let back: NoteName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, note);
        assert!(serde_json::from_str::<NoteName>("\"X1\"").is_err());
    }
}
