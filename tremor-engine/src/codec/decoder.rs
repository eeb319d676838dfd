//! Tolerant Session Log Decoding
//!
//! Each recognized label maps to a typed extractor that runs on its own.
//! A missing or garbled field only costs that field: it keeps its default
//! value and is reported in [`DecodedLog::missing`].

use super::format::{FieldKind, LogField};
use crate::session::log::SessionLog;
use regex::Regex;
use std::sync::OnceLock;

/// Writes a parsed raw value into the log, returning false if it did not parse
type Extractor = fn(&str, &mut SessionLog) -> bool;

/// One label and how to read it
struct FieldRule {
    field: LogField,
    pattern: Regex,
    extract: Extractor,
}

/// Globally cached field rules compiled once on first use.
fn field_rules() -> &'static [FieldRule] {
    static RULES: OnceLock<Vec<FieldRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        LogField::ALL
            .iter()
            .map(|&field| FieldRule {
                field,
                pattern: pattern_for(field),
                extract: extractor_for(field),
            })
            .collect()
    })
}

fn tuple_pattern() -> &'static Regex {
    static TUPLE: OnceLock<Regex> = OnceLock::new();
    TUPLE.get_or_init(|| Regex::new(r"\(([^()]*)\)").expect("valid regex"))
}

/// Pattern capturing the raw value text after a label
fn pattern_for(field: LogField) -> Regex {
    let label = regex::escape(field.label());
    let pattern = match field.kind() {
        FieldKind::ScalarFloat | FieldKind::ScalarInt => format!(r"\b{}:[ \t]*([^\s,;\]]*)", label),
        FieldKind::FloatArray | FieldKind::TupleArray => format!(r"\b{}:\s*\[([^\]]*)\]", label),
    };
    Regex::new(&pattern).expect("valid regex")
}

fn extractor_for(field: LogField) -> Extractor {
    match field {
        LogField::AvgVelocity => |raw, log| parse_float(raw).map(|v| log.avg_velocity = v).is_some(),
        LogField::Shaky => |raw, log| parse_float(raw).map(|v| log.avg_shake = v).is_some(),
        LogField::Frequency => |raw, log| parse_float(raw).map(|v| log.frequency_hz = v).is_some(),
        LogField::Points => |raw, log| parse_count(raw).map(|v| log.points = v).is_some(),
        LogField::ApplesPicked => |raw, log| {
            parse_count(raw)
                .and_then(|v| u32::try_from(v).ok())
                .map(|v| log.apples_picked = v)
                .is_some()
        },
        LogField::TotalApples => |raw, log| {
            parse_count(raw)
                .and_then(|v| u32::try_from(v).ok())
                .map(|v| log.total_apples = v)
                .is_some()
        },
        LogField::VelocityData => |raw, log| {
            log.velocity_log = parse_series(raw);
            true
        },
        LogField::ShakeData => |raw, log| {
            log.shake_log = parse_series(raw);
            true
        },
        LogField::Positions => |raw, log| {
            log.positions = parse_tuples(raw);
            true
        },
    }
}

fn parse_float(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Integers are also accepted when written as whole floats ("8.0")
fn parse_count(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    raw.parse::<u64>().ok().or_else(|| {
        parse_float(raw)
            .filter(|v| *v >= 0.0 && v.fract() == 0.0 && *v <= u32::MAX as f64)
            .map(|v| v as u64)
    })
}

/// Comma-separated floats; empty entries (trailing commas) and garbage are skipped
fn parse_series(raw: &str) -> Vec<f64> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(parse_float)
        .collect()
}

/// `(x,y,z)` tuples separated by anything; malformed tuples are skipped
fn parse_tuples(raw: &str) -> Vec<[f64; 3]> {
    tuple_pattern()
        .captures_iter(raw)
        .filter_map(|caps| {
            let values: Vec<f64> = caps[1].split(',').filter_map(parse_float).collect();
            match values.as_slice() {
                [x, y, z] => Some([*x, *y, *z]),
                _ => None,
            }
        })
        .collect()
}

/// Result of decoding a log text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedLog {
    /// Decoded values, defaults where a field was absent
    pub log: SessionLog,
    /// Fields that were absent or could not be parsed
    pub missing: Vec<LogField>,
}

impl DecodedLog {
    /// Whether `field` was found and parsed
    pub fn has(&self, field: LogField) -> bool {
        !self.missing.contains(&field)
    }

    /// Whether every field was present
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Attach a channel name (the text itself does not carry one)
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.log.logger_name = channel.into();
        self
    }
}

/// Decode a session log text.
///
/// Fields are matched by label anywhere in the text. When a label occurs
/// more than once (several sessions appended to one file) the last
/// occurrence wins. Never fails.
pub fn decode(text: &str) -> DecodedLog {
    let mut decoded = DecodedLog::default();

    for rule in field_rules() {
        let raw = rule
            .pattern
            .captures_iter(text)
            .last()
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str());

        let parsed = match raw {
            Some(raw) => (rule.extract)(raw, &mut decoded.log),
            None => false,
        };

        if !parsed {
            tracing::debug!(field = %rule.field, present = raw.is_some(), "Log field missing or unparseable");
            decoded.missing.push(rule.field);
        }
    }

    decoded
}
