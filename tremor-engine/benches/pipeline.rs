//! Criterion benchmarks for performance-critical hot paths
//!
//! Covers: per-tick recording, session aggregation, log encode/decode,
//! the power sweep and full session analysis.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::Vector3;
use tremor_engine::analysis::frequency::{PowerSweepEstimator, ZeroCrossingEstimator};
use tremor_engine::analysis::SessionAnalyzer;
use tremor_engine::capture::{LoggingGate, SampleRecorder, SessionCapture, SyntheticHand};
use tremor_engine::codec::{decode, encode};
use tremor_engine::session::{SessionAggregator, TaskCounters};

const DT: f64 = 0.02;

fn make_hand() -> SyntheticHand {
    SyntheticHand::new(Vector3::new(0.2, 1.1, 0.35)).with_tremor(5.0, 2.0)
}

fn make_capture(ticks: usize) -> SessionCapture {
    let gate = LoggingGate::new();
    gate.activate();
    let mut recorder = SampleRecorder::new("right", gate);
    let hand = make_hand();
    for i in 0..ticks {
        let (p, o) = hand.pose_at(i as f64 * DT);
        recorder.tick(p, o, DT);
    }
    recorder.take_capture()
}

fn counters() -> TaskCounters {
    TaskCounters {
        apples_picked: 8,
        total_apples: 10,
    }
}

// ---------------------------------------------------------------------------
// Capture benchmarks
// ---------------------------------------------------------------------------

fn bench_recorder_tick(c: &mut Criterion) {
    let hand = make_hand();
    let poses: Vec<_> = (0..1500).map(|i| hand.pose_at(i as f64 * DT)).collect();

    c.bench_function("recorder_tick_session", |b| {
        b.iter(|| {
            let gate = LoggingGate::new();
            gate.activate();
            let mut recorder = SampleRecorder::new("right", gate);
            for (p, o) in &poses {
                black_box(recorder.tick(*p, *o, DT));
            }
        });
    });
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    let aggregator = SessionAggregator::new();

    for ticks in [1_500usize, 15_000] {
        let capture = make_capture(ticks);
        group.bench_with_input(BenchmarkId::from_parameter(ticks), &capture, |b, capture| {
            b.iter(|| black_box(aggregator.finalize(black_box(capture), &counters())));
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Codec benchmarks
// ---------------------------------------------------------------------------

fn bench_codec(c: &mut Criterion) {
    let log = SessionAggregator::new().finalize(&make_capture(1_500), &counters());
    let text = encode(&log);

    c.bench_function("encode_session", |b| {
        b.iter(|| black_box(encode(black_box(&log))));
    });

    c.bench_function("decode_session", |b| {
        b.iter(|| black_box(decode(black_box(&text))));
    });
}

// ---------------------------------------------------------------------------
// Frequency benchmarks
// ---------------------------------------------------------------------------

fn bench_frequency(c: &mut Criterion) {
    let capture = make_capture(1_500);
    let velocities = capture.velocities();
    let angular = capture.angular_velocities();

    let mut group = c.benchmark_group("frequency");
    let crossing = ZeroCrossingEstimator::new();
    group.bench_function("zero_crossing", |b| {
        b.iter(|| black_box(crossing.estimate(black_box(&angular), DT)));
    });

    let sweep = PowerSweepEstimator::new();
    group.bench_function("power_sweep", |b| {
        b.iter(|| black_box(sweep.estimate(black_box(&velocities))));
    });

    group.bench_function("display_spectrum", |b| {
        b.iter(|| black_box(sweep.spectrum(black_box(&velocities), 0.05)));
    });

    group.finish();
}

fn bench_analyze(c: &mut Criterion) {
    let log = SessionAggregator::new().finalize(&make_capture(1_500), &counters());
    let text = encode(&log);
    let analyzer = SessionAnalyzer::default();

    c.bench_function("decode_and_analyze", |b| {
        b.iter(|| black_box(analyzer.analyze(&decode(black_box(&text)))));
    });
}

criterion_group!(
    benches,
    bench_recorder_tick,
    bench_aggregate,
    bench_codec,
    bench_frequency,
    bench_analyze,
);
criterion_main!(benches);
