//! Audio decoding using Symphonia
//!
//! Turns a compressed or uncompressed audio file into an [`AudioBuffer`]. This is the
//! host side of the analysis boundary: decode failures are reported to the caller
//! and the analysis pipeline is never invoked on them.
//!
//! # Example
//!
//! ```no_run
//! use tonescribe::io::decoder::decode_file;
//! use tonescribe::{analyze_audio, AnalysisConfig};
//!
//! let audio = decode_file("take_01.wav")?;
//! let result = analyze_audio(&audio, &AnalysisConfig::default());
//! println!("{} notes at {} BPM", result.notes.len(), result.tempo);
//! # Ok::<(), tonescribe::AnalysisError>(())
//! ```

use std::fs::File;
use std::io::Cursor;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::AudioBuffer;
use crate::error::AnalysisError;

/// Decode an audio file into planar f32 samples
///
/// # Errors
///
/// Returns `AnalysisError::DecodingError` if the file cannot be opened, its format is
/// not recognised, it has no audio track, or it yields no samples.
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<AudioBuffer, AnalysisError> {
    let path = path.as_ref();
    log::debug!("Decoding audio file: {}", path.display());

    let file = File::open(path).map_err(|e| {
        AnalysisError::DecodingError(format!("Cannot open {}: {}", path.display(), e))
    })?;

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    decode_source(Box::new(file), hint)
}

/// Decode an in-memory audio stream
///
/// `extension_hint` (e.g. `"mp3"`) helps format probing but is optional.
///
/// # Errors
///
/// Same conditions as [`decode_file`].
pub fn decode_bytes(
    bytes: Vec<u8>,
    extension_hint: Option<&str>,
) -> Result<AudioBuffer, AnalysisError> {
    log::debug!("Decoding {} bytes of audio", bytes.len());

    let mut hint = Hint::new();
    if let Some(ext) = extension_hint {
        hint.with_extension(ext);
    }

    decode_source(Box::new(Cursor::new(bytes)), hint)
}

fn decode_source(source: Box<dyn MediaSource>, hint: Hint) -> Result<AudioBuffer, AnalysisError> {
    let mss = MediaSourceStream::new(source, Default::default());

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| AnalysisError::DecodingError(format!("Unrecognised format: {}", e)))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AnalysisError::DecodingError("No supported audio tracks found".to_string()))?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();
    let mut sample_rate = codec_params.sample_rate;
    let mut channel_count = codec_params.channels.map(|c| c.count());

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| AnalysisError::DecodingError(format!("Unsupported codec: {}", e)))?;

    let mut interleaved: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => {
                return Err(AnalysisError::DecodingError(format!(
                    "Failed to read packet: {}",
                    e
                )))
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate = Some(spec.rate);
                channel_count = Some(spec.channels.count());

                let needed = decoded.capacity() as u64;
                if sample_buf
                    .as_ref()
                    .map_or(true, |buf| (buf.capacity() as u64) < needed)
                {
                    sample_buf = Some(SampleBuffer::new(needed, spec));
                }
                if let Some(buf) = sample_buf.as_mut() {
                    buf.copy_interleaved_ref(decoded);
                    interleaved.extend_from_slice(buf.samples());
                }
            }
            Err(SymphoniaError::DecodeError(msg)) => {
                // Corrupted packets are skipped; the rest of the stream is still usable.
                log::warn!("Skipping undecodable packet: {}", msg);
            }
            Err(e) => {
                return Err(AnalysisError::DecodingError(format!(
                    "Decoder failed: {}",
                    e
                )))
            }
        }
    }

    let sample_rate = sample_rate
        .filter(|&rate| rate > 0)
        .ok_or_else(|| AnalysisError::DecodingError("Unknown sample rate".to_string()))?;
    let channel_count = channel_count
        .filter(|&count| count > 0)
        .ok_or_else(|| AnalysisError::DecodingError("Unknown channel layout".to_string()))?;

    if interleaved.is_empty() {
        return Err(AnalysisError::DecodingError(
            "Stream contains no audio samples".to_string(),
        ));
    }

    let buffer = AudioBuffer::from_interleaved(&interleaved, channel_count, sample_rate);
    log::debug!(
        "Decoded {} frames x {} channels at {} Hz ({:.2}s)",
        buffer.frames(),
        buffer.channel_count(),
        sample_rate,
        buffer.duration_seconds()
    );

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_garbage_bytes_fails() {
        let result = decode_bytes(vec![0x42; 512], None);
        assert!(matches!(result, Err(AnalysisError::DecodingError(_))));
    }

    #[test]
    fn test_decode_missing_file_fails() {
        let result = decode_file("/definitely/not/here.wav");
        assert!(matches!(result, Err(AnalysisError::DecodingError(_))));
    }
}
