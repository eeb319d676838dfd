//! Session Log Text Encoding

use super::format::{LogField, POSITION_DECIMALS, SERIES_DECIMALS, SUMMARY_DECIMALS};
use crate::session::log::SessionLog;
use chrono::NaiveTime;
use std::fmt::Write;

/// Text encoder for session logs
pub struct LogEncoder {
    /// Buffer for building the log text
    buffer: String,
    /// Optional `[HH:MM:SS]` stamp written before every line
    timestamp: Option<NaiveTime>,
}

impl LogEncoder {
    /// Create an encoder without line timestamps
    pub fn new() -> Self {
        Self {
            buffer: String::with_capacity(4096),
            timestamp: None,
        }
    }

    /// Stamp every line with `time`, the way the headset logger does
    pub fn with_timestamp(mut self, time: NaiveTime) -> Self {
        self.timestamp = Some(time);
        self
    }

    /// Encode every field of `log`, one line per field
    pub fn encode(&mut self, log: &SessionLog) -> String {
        self.buffer.clear();

        // Writing to a String is infallible, so these cannot fail
        for field in LogField::ALL {
            self.write_field(field, log).expect("write to String");
        }

        std::mem::take(&mut self.buffer)
    }

    /// Encode a single field as one line (without trailing newline)
    pub fn encode_field(&mut self, field: LogField, log: &SessionLog) -> String {
        self.buffer.clear();
        self.write_field(field, log).expect("write to String");
        let mut line = std::mem::take(&mut self.buffer);
        line.truncate(line.trim_end().len());
        line
    }

    fn write_field(&mut self, field: LogField, log: &SessionLog) -> std::fmt::Result {
        if let Some(time) = self.timestamp {
            write!(self.buffer, "[{}] ", time.format("%H:%M:%S"))?;
        }
        write!(self.buffer, "{}: ", field.label())?;

        let decimals = SUMMARY_DECIMALS as usize;
        match field {
            LogField::AvgVelocity => write!(self.buffer, "{:.*}", decimals, log.avg_velocity)?,
            LogField::Shaky => write!(self.buffer, "{:.*}", decimals, log.avg_shake)?,
            LogField::Points => write!(self.buffer, "{}", log.points)?,
            LogField::Frequency => write!(self.buffer, "{}", log.frequency_hz)?,
            LogField::ApplesPicked => write!(self.buffer, "{}", log.apples_picked)?,
            LogField::TotalApples => write!(self.buffer, "{}", log.total_apples)?,
            LogField::VelocityData => self.write_series(&log.velocity_log)?,
            LogField::ShakeData => self.write_series(&log.shake_log)?,
            LogField::Positions => self.write_positions(&log.positions)?,
        }

        writeln!(self.buffer)
    }

    fn write_series(&mut self, values: &[f64]) -> std::fmt::Result {
        let decimals = SERIES_DECIMALS as usize;
        self.buffer.push('[');
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                self.buffer.push(',');
            }
            write!(self.buffer, "{:.*}", decimals, value)?;
        }
        self.buffer.push(']');
        Ok(())
    }

    fn write_positions(&mut self, positions: &[[f64; 3]]) -> std::fmt::Result {
        let d = POSITION_DECIMALS as usize;
        self.buffer.push('[');
        for (i, [x, y, z]) in positions.iter().enumerate() {
            if i > 0 {
                self.buffer.push(';');
            }
            write!(self.buffer, "({:.*},{:.*},{:.*})", d, x, d, y, d, z)?;
        }
        self.buffer.push(']');
        Ok(())
    }
}

impl Default for LogEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode a session log without timestamps
pub fn encode(log: &SessionLog) -> String {
    LogEncoder::new().encode(log)
}
