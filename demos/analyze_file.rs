//! Example: Analyze a single audio file
//!
//! Usage:
//!   cargo run --release --example analyze_file -- <file>
//!
//! Decodes the file, analyzes it, and prints the full result as pretty JSON.

use std::env;
use std::time::Instant;

use tonescribe::io::decoder::decode_file;
use tonescribe::{analyze_audio, AnalysisConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::init();

    let path = match env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("Usage: analyze_file <file>");
            std::process::exit(2);
        }
    };

    let audio = decode_file(&path)?;
    eprintln!(
        "Decoded {}: {} channel(s), {} Hz, {:.2}s",
        path,
        audio.channel_count(),
        audio.sample_rate(),
        audio.duration_seconds()
    );

    let t0 = Instant::now();
    let result = analyze_audio(&audio, &AnalysisConfig::default());
    eprintln!("Analyzed in {:.2} ms", t0.elapsed().as_secs_f64() * 1000.0);

    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
