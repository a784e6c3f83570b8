//! Error types for the audio-to-note analysis engine

use std::fmt;

/// Errors that can occur while decoding or analysing audio
///
/// The pipeline entry points [`crate::analyze_audio`] and
/// [`crate::analyze_audio_with_detector`] never return these; they fall back to a
/// safe default result instead. [`crate::try_analyze_audio`] and the decoder do.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Invalid input parameters or malformed audio buffer
    InvalidInput(String),

    /// Audio could not be decoded
    DecodingError(String),

    /// Processing error during analysis
    ProcessingError(String),

    /// Numerical error (non-finite intermediate values, etc.)
    NumericalError(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AnalysisError::DecodingError(msg) => write!(f, "Decoding error: {}", msg),
            AnalysisError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
            AnalysisError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        let err = AnalysisError::DecodingError("no audio track".to_string());
        assert_eq!(err.to_string(), "Decoding error: no audio track");

        let err = AnalysisError::InvalidInput("sample rate is 0".to_string());
        assert!(err.to_string().starts_with("Invalid input"));
    }
}
