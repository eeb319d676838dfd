//! Severity scoring tests
//!
//! Bucket edges, band attenuation and the end-to-end scoring of a decoded
//! session log.

use tremor_engine::analysis::frequency::{FrequencyEstimate, PowerSweepEstimator};
use tremor_engine::analysis::stats::{mean, percentile, tremor_intensity};
use tremor_engine::analysis::{SessionAnalyzer, SeverityScorer, SeverityThresholds};
use tremor_engine::codec::{decode, encode};
use tremor_engine::session::SessionLog;

#[test]
fn test_documented_bucket_edges() {
    let scorer = SeverityScorer::default();
    assert_eq!(scorer.intensity_bucket(0.5), 1);
    assert_eq!(scorer.power_bucket(1000.0), 4);
    assert_eq!(scorer.success_bucket(0.9), 1);
}

#[test]
fn test_bucket_tables() {
    let scorer = SeverityScorer::default();
    let intensity = [(0.0, 0), (0.4999, 0), (0.5, 1), (0.9999, 1), (1.0, 2), (2.0, 3), (3.0, 4), (9.0, 4)];
    for (value, bucket) in intensity {
        assert_eq!(scorer.intensity_bucket(value), bucket, "intensity {}", value);
    }

    let power = [(0.0, 0), (100.0, 1), (299.9, 1), (300.0, 2), (600.0, 3), (1000.0, 4)];
    for (value, bucket) in power {
        assert_eq!(scorer.power_bucket(value), bucket, "power {}", value);
    }

    let success = [(1.0, 0), (0.91, 0), (0.9, 1), (0.71, 1), (0.7, 2), (0.5, 3), (0.3, 4), (0.0, 4)];
    for (value, bucket) in success {
        assert_eq!(scorer.success_bucket(value), bucket, "success {}", value);
    }
}

#[test]
fn test_in_band_scores_higher_than_out_of_band() {
    let scorer = SeverityScorer::default();
    for (intensity, power, success) in [(1.5, 400.0, 0.6), (2.5, 800.0, 0.4), (5.0, 2000.0, 0.0)] {
        let in_band = scorer.score(intensity, power, success, 5.0);
        let out_of_band = scorer.score(intensity, power, success, 10.0);
        assert!(in_band.score > out_of_band.score);
        assert!((out_of_band.raw - in_band.raw * 0.3).abs() < 1e-12);
    }
}

#[test]
fn test_score_never_exceeds_four() {
    let score = SeverityScorer::default().score(f64::MAX, f64::MAX, -1.0, 5.0);
    assert_eq!(score.score, 4);
}

#[test]
fn test_monotonic_in_each_input() {
    let scorer = SeverityScorer::default();
    let base = scorer.score(1.2, 350.0, 0.6, 5.0).score;
    assert!(scorer.score(2.5, 350.0, 0.6, 5.0).score >= base);
    assert!(scorer.score(1.2, 900.0, 0.6, 5.0).score >= base);
    assert!(scorer.score(1.2, 350.0, 0.2, 5.0).score >= base);
    assert!(scorer.score(0.1, 350.0, 0.6, 5.0).score <= base);
}

#[test]
fn test_custom_band() {
    let thresholds = SeverityThresholds {
        band_min_hz: 4.0,
        band_max_hz: 6.0,
        ..Default::default()
    };
    let scorer = SeverityScorer::new(thresholds);
    assert!(!scorer.in_band(3.5));
    assert!(scorer.in_band(4.0));
    assert!(!scorer.in_band(6.5));
}

#[test]
fn test_empty_statistics() {
    assert_eq!(mean(&[]), 0.0);
    assert_eq!(percentile(&[], 0.95), 0.0);
    assert_eq!(tremor_intensity(&[]), 0.0);
    assert_eq!(PowerSweepEstimator::default().estimate(&[]), FrequencyEstimate::default());
}

#[test]
fn test_end_to_end_calm_session() {
    let log = SessionLog {
        logger_name: "right".to_string(),
        avg_velocity: 1.0,
        avg_shake: 0.2,
        points: 4,
        frequency_hz: 5.0,
        apples_picked: 8,
        total_apples: 10,
        velocity_log: vec![1.0, 1.0, 1.0],
        shake_log: vec![0.2, 0.2, 0.2],
        positions: vec![[0.0, 1.0, 0.0]; 4],
    };
    let text = encode(&log);
    assert!(text.contains("AvgVelocity: 1.00"));
    assert!(text.contains("Shaky: 0.20"));

    let decoded = decode(&text);
    assert_eq!(decoded.log.avg_velocity, 1.0);
    assert_eq!(decoded.log.avg_shake, 0.2);

    let scorer = SeverityScorer::default();
    let score = scorer.score(0.0, 0.0, decoded.log.success_rate(), 5.0);
    assert_eq!(score.success_bucket, 1);
    assert_eq!(score.intensity_bucket, 0);
    assert_eq!(score.power_bucket, 0);
    assert_eq!(score.score, 0);
}

#[test]
fn test_analyzer_scores_shaky_session_higher() {
    let calm = decode("VelocityData: [0.01,0.02,0.01,0.02]\nApplesPicked: 9\nTotalApples: 10");

    // Strong 5 Hz oscillation in velocity at the assumed 100 Hz rate
    let shaky_series: Vec<String> = (0..300)
        .map(|i| {
            let v = 3.0 + 3.0 * (std::f64::consts::TAU * 5.0 * i as f64 / 100.0).cos();
            format!("{:.4}", v)
        })
        .collect();
    let shaky = decode(&format!(
        "VelocityData: [{}]\nApplesPicked: 3\nTotalApples: 10",
        shaky_series.join(",")
    ));

    let analyzer = SessionAnalyzer::default();
    let calm_report = analyzer.analyze(&calm);
    let shaky_report = analyzer.analyze(&shaky);

    assert_eq!(calm_report.severity.score, 0);
    assert!(shaky_report.severity.score > calm_report.severity.score);
    assert!(shaky_report.tremor_intensity > 5.0);
}
