//! Session log field catalogue and numeric formatting rules

use serde::{Deserialize, Serialize};

/// Decimals kept for the summary averages
pub const SUMMARY_DECIMALS: u32 = 2;

/// Decimals kept for velocity and shake series
pub const SERIES_DECIMALS: u32 = 4;

/// Decimals kept for position coordinates
pub const POSITION_DECIMALS: u32 = 3;

/// Round `value` to `decimals` places.
///
/// Non-finite input becomes 0 so it can never reach the text format.
pub fn quantize(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let scale = 10f64.powi(decimals as i32);
    let scaled = (value * scale).round();
    // Avoid "-0.0000" in the text output
    if scaled == 0.0 {
        0.0
    } else {
        scaled / scale
    }
}

/// How a field's value is written and read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Single decimal number
    ScalarFloat,
    /// Single non-negative integer
    ScalarInt,
    /// `[v1,v2,...]`
    FloatArray,
    /// `[(x,y,z);(x,y,z);...]`
    TupleArray,
}

/// Named records of a session log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogField {
    AvgVelocity,
    Shaky,
    Points,
    Frequency,
    ApplesPicked,
    TotalApples,
    VelocityData,
    ShakeData,
    Positions,
}

impl LogField {
    /// Every field in canonical output order
    pub const ALL: [LogField; 9] = [
        LogField::AvgVelocity,
        LogField::Shaky,
        LogField::Points,
        LogField::Frequency,
        LogField::ApplesPicked,
        LogField::TotalApples,
        LogField::VelocityData,
        LogField::ShakeData,
        LogField::Positions,
    ];

    /// Label text preceding the colon
    pub fn label(&self) -> &'static str {
        match self {
            LogField::AvgVelocity => "AvgVelocity",
            LogField::Shaky => "Shaky",
            LogField::Points => "Points",
            LogField::Frequency => "Frequency",
            LogField::ApplesPicked => "ApplesPicked",
            LogField::TotalApples => "TotalApples",
            LogField::VelocityData => "VelocityData",
            LogField::ShakeData => "ShakeData",
            LogField::Positions => "Positions",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            LogField::AvgVelocity | LogField::Shaky | LogField::Frequency => FieldKind::ScalarFloat,
            LogField::Points | LogField::ApplesPicked | LogField::TotalApples => FieldKind::ScalarInt,
            LogField::VelocityData | LogField::ShakeData => FieldKind::FloatArray,
            LogField::Positions => FieldKind::TupleArray,
        }
    }

    /// Look a field up by its label
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.label() == label)
    }
}

impl std::fmt::Display for LogField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
