//! Example: Analyze multiple audio files in parallel
//!
//! Usage:
//!   cargo run --release --example analyze_batch -- [--jobs N] <file1> <file2> ...
//!
//! Notes:
//! - Parallelism is across files (batch-level) on a rayon pool.
//! - Default workers: (available CPU threads - 1), keeping one core free for the system.
//! - Output is one JSON object per line (JSONL), in input order.

use std::env;
use std::time::Instant;

use rayon::prelude::*;
use serde_json::json;
use tonescribe::io::decoder::decode_file;
use tonescribe::{analyze_audio, AnalysisConfig};

fn default_jobs() -> usize {
    let n = std::thread::available_parallelism().map(|v| v.get()).unwrap_or(1);
    std::cmp::max(1, n.saturating_sub(1))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let mut jobs: Option<usize> = None;
    let mut paths: Vec<String> = Vec::new();

    while !args.is_empty() {
        let a = args.remove(0);
        match a.as_str() {
            "--jobs" => {
                if args.is_empty() {
                    return Err("--jobs requires a value".into());
                }
                let v = args.remove(0).parse::<usize>()?;
                jobs = Some(std::cmp::max(1, v));
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: analyze_batch [--jobs N] <file1> <file2> ...\n\
                     \n\
                     --jobs N   Parallel workers (default: CPU-1)\n"
                );
                return Ok(());
            }
            _ => paths.push(a),
        }
    }

    if paths.is_empty() {
        eprintln!("ERROR: Provide at least one audio file path. Use --help for usage.");
        std::process::exit(2);
    }

    let jobs = jobs.unwrap_or_else(default_jobs);
    eprintln!("Batch: {} files, jobs={}", paths.len(), jobs);

    let config = AnalysisConfig::default();
    let t0 = Instant::now();
    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;

    let lines: Vec<(bool, serde_json::Value)> = pool.install(|| {
        paths
            .par_iter()
            .map(|path| match decode_file(path) {
                Ok(audio) => {
                    let result = analyze_audio(&audio, &config);
                    (true, json!({ "file": path, "result": result }))
                }
                Err(e) => (false, json!({ "file": path, "error": e.to_string() })),
            })
            .collect()
    });

    for (_, line) in &lines {
        println!("{}", line);
    }

    let ok = lines.iter().filter(|(ok, _)| *ok).count();
    eprintln!(
        "Done: ok={}/{} wall={:.0}ms",
        ok,
        lines.len(),
        t0.elapsed().as_secs_f64() * 1000.0
    );

    Ok(())
}
