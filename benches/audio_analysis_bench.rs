//! Performance benchmarks for audio analysis

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tonescribe::features::period::TempoEstimator;
use tonescribe::features::pitch::{McLeodPitchDetector, NoteDetector};
use tonescribe::{analyze_audio, AnalysisConfig, AudioBuffer};

/// Repeating C-major scale, 0.4 s per note, with a click on every note onset
fn synthetic_melody(seconds: usize, sample_rate: u32) -> Vec<f32> {
    let scale = [261.63f32, 293.66, 329.63, 349.23, 392.00, 440.00, 493.88, 523.25];
    let note_len = (0.4 * sample_rate as f32) as usize;
    (0..sample_rate as usize * seconds)
        .map(|i| {
            let f = scale[(i / note_len) % scale.len()];
            let t = i as f32 / sample_rate as f32;
            let click = if i % note_len == 0 { 0.5 } else { 0.0 };
            (t * f * 2.0 * std::f32::consts::PI).sin() * 0.4 + click
        })
        .collect()
}

fn bench_analyze_audio(c: &mut Criterion) {
    // 30 seconds at 44.1kHz
    let samples = synthetic_melody(30, 44100);
    let audio = AudioBuffer::from_mono(samples.clone(), 44100);
    let config = AnalysisConfig::default();
    let sequential = AnalysisConfig {
        parallel: false,
        ..AnalysisConfig::default()
    };

    c.bench_function("analyze_audio_30s", |b| {
        b.iter(|| analyze_audio(black_box(&audio), black_box(&config)));
    });

    c.bench_function("analyze_audio_30s_sequential", |b| {
        b.iter(|| analyze_audio(black_box(&audio), black_box(&sequential)));
    });

    let note_detector = NoteDetector::from_config(&config);
    c.bench_function("note_detection_30s", |b| {
        let mut detector = McLeodPitchDetector::new();
        b.iter(|| note_detector.detect(black_box(&samples), 44100, &mut detector));
    });

    let tempo_estimator = TempoEstimator::from_config(&config);
    c.bench_function("tempo_estimation_30s", |b| {
        b.iter(|| tempo_estimator.estimate(black_box(&samples), 44100));
    });
}

criterion_group!(benches, bench_analyze_audio);
criterion_main!(benches);
