//! Log format compatibility tests
//!
//! Logs written by older headset builds carry timestamps, trailing
//! separators and sometimes only a subset of the fields. Every one of them
//! must still decode field by field.

use chrono::NaiveTime;
use tremor_engine::codec::{decode, encode, LogEncoder, LogField};
use tremor_engine::session::SessionLog;

/// Log as written by the headset logger, several sessions appended
const HEADSET_LOG: &str = "\
[14:20:01] ===== Session Started =====
[14:20:31] AvgVelocity: 0.41
[14:20:31] Shaky: 0.00
[14:20:31] Points: 4
[14:20:31] Frequency: 0.0283
[14:20:31] ApplesPicked: 2
[14:20:31] TotalApples: 5
[14:20:31] VelocityData: [0.1000,0.2000,0.3000,]
[14:20:31] ShakeData: [0.0000,0.0000,0.0000,]
[14:20:31] Positions: [(0.100,1.000,0.300);(0.102,1.000,0.300);(0.106,1.000,0.300);(0.112,1.000,0.300);]
[14:20:31] ===== Session Ended =====
[14:22:10] ===== Session Started =====
[14:22:40] AvgVelocity: 0.73
[14:22:40] Shaky: 1.35
[14:22:40] Points: 3
[14:22:40] Frequency: 4.8666
[14:22:40] ApplesPicked: 6
[14:22:40] TotalApples: 9
[14:22:40] VelocityData: [0.7000,0.7600,]
[14:22:40] ShakeData: [1.3000,1.4000,]
[14:22:40] Positions: [(0.200,1.100,0.300);(0.214,1.100,0.300);(0.229,1.100,0.300);]
[14:22:40] ===== Session Ended =====
";

fn sample_log() -> SessionLog {
    SessionLog {
        logger_name: "right".to_string(),
        avg_velocity: 1.0,
        avg_shake: 0.2,
        points: 4,
        frequency_hz: 5.0,
        apples_picked: 8,
        total_apples: 10,
        velocity_log: vec![1.0, 1.0, 1.0],
        shake_log: vec![0.2, 0.2, 0.2],
        positions: vec![
            [0.0, 1.2, 0.4],
            [0.02, 1.2, 0.4],
            [0.04, 1.2, 0.4],
            [0.06, 1.2, 0.4],
        ],
    }
}

#[test]
fn test_round_trip_is_exact() {
    let log = sample_log();
    let decoded = decode(&encode(&log)).with_channel("right");
    assert!(decoded.is_complete());
    assert_eq!(decoded.log, log);
}

#[test]
fn test_round_trip_with_timestamps() {
    let log = sample_log();
    let time = NaiveTime::from_hms_opt(9, 5, 0).unwrap();
    let text = LogEncoder::new().with_timestamp(time).encode(&log);
    assert!(text.starts_with("[09:05:00] AvgVelocity: 1.00"));

    let decoded = decode(&text).with_channel("right");
    assert_eq!(decoded.log, log);
}

#[test]
fn test_appended_headset_log_uses_last_session() {
    let decoded = decode(HEADSET_LOG);
    assert!(decoded.is_complete());

    let log = decoded.log;
    assert_eq!(log.avg_velocity, 0.73);
    assert_eq!(log.avg_shake, 1.35);
    assert_eq!(log.points, 3);
    assert_eq!(log.frequency_hz, 4.8666);
    assert_eq!(log.apples_picked, 6);
    assert_eq!(log.total_apples, 9);
    assert_eq!(log.velocity_log, vec![0.7, 0.76]);
    assert_eq!(log.shake_log, vec![1.3, 1.4]);
    assert_eq!(log.positions.len(), 3);
    assert_eq!(log.positions[2], [0.229, 1.1, 0.3]);
}

#[test]
fn test_missing_positions_block() {
    let text: String = encode(&sample_log())
        .lines()
        .filter(|line| !line.starts_with("Positions:"))
        .map(|line| format!("{}\n", line))
        .collect();

    let decoded = decode(&text);
    assert_eq!(decoded.missing, vec![LogField::Positions]);
    assert!(decoded.log.positions.is_empty());

    let expected = SessionLog {
        logger_name: String::new(),
        positions: Vec::new(),
        ..sample_log()
    };
    assert_eq!(decoded.log, expected);
}

#[test]
fn test_missing_frequency_block() {
    let text = "AvgVelocity: 0.50\nShaky: 0.10\nPoints: 2\nVelocityData: [0.5000]\nShakeData: [0.1000]\n";
    let decoded = decode(text);
    assert_eq!(decoded.log.frequency_hz, 0.0);
    assert!(!decoded.has(LogField::Frequency));
    assert!(!decoded.has(LogField::ApplesPicked));
    assert_eq!(decoded.log.velocity_log, vec![0.5]);
}

#[test]
fn test_velocity_and_shake_only() {
    let text = "VelocityData: [0.2,0.4]\nShakeData: [1.5,2.5]";
    let decoded = decode(text);
    assert_eq!(decoded.log.velocity_log, vec![0.2, 0.4]);
    assert_eq!(decoded.log.shake_log, vec![1.5, 2.5]);
    assert_eq!(decoded.missing.len(), LogField::ALL.len() - 2);
}

#[test]
fn test_arrays_split_across_whitespace() {
    let text = "VelocityData: [ 0.1 , 0.2 ,\n 0.3 ]\nPositions: [ (1, 2, 3) ; (4, 5, 6) ]";
    let decoded = decode(text);
    assert_eq!(decoded.log.velocity_log, vec![0.1, 0.2, 0.3]);
    assert_eq!(decoded.log.positions, vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
}

#[test]
fn test_garbage_text_never_fails() {
    for text in ["", "\n\n", "random words", "Points:", "VelocityData: [", "Positions: [(((]"] {
        let decoded = decode(text);
        assert_eq!(decoded.log.points, 0);
        assert!(decoded.log.positions.is_empty());
    }
}

#[test]
fn test_encoded_field_order() {
    let text = encode(&sample_log());
    let labels: Vec<&str> = text
        .lines()
        .filter_map(|line| line.split_once(':').map(|(label, _)| label))
        .collect();
    let expected: Vec<&str> = LogField::ALL.iter().map(|f| f.label()).collect();
    assert_eq!(labels, expected);
}
