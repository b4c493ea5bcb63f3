#![warn(missing_docs)]

//! Unit-aware numeric input parsing and formatting.
//!
//! Typed overrides in the drafting HUD accept a small dimension
//! grammar: an optional leading `=` marks a formula, a dimension term
//! follows in either metric form (`NUMBER` with an optional
//! `mm|cm|dm|m` suffix) or imperial form (`feet'-inches"`, inches
//! optionally fractional as `a/b`), and an optional trailing
//! arithmetic adjustment (`+ - * /` and a plain number) applies after
//! the dimension resolves to SI units. Angle fields are plain degree
//! numbers in either system; area fields are plain numbers in the
//! system's area unit.
//!
//! Parsing never produces a partial value: malformed input is an
//! error and the caller keeps the field's previous value.
//!
//! Internally everything is SI: meters, degrees, square meters.

mod format;
mod parse;

pub use format::format_value;
pub use parse::parse_value;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Meters per inch.
pub const METERS_PER_INCH: f64 = 0.0254;

/// Meters per foot.
pub const METERS_PER_FOOT: f64 = 0.3048;

/// Square meters per square foot.
pub const SQUARE_METERS_PER_SQUARE_FOOT: f64 = METERS_PER_FOOT * METERS_PER_FOOT;

/// Measurement system for display and input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Metric: meters with mm/cm/dm/m input suffixes.
    #[default]
    Metric,
    /// Imperial: feet and (fractional) inches.
    Imperial,
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "metric"),
            Self::Imperial => write!(f, "imperial"),
        }
    }
}

impl FromStr for UnitSystem {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "metric" | "m" | "mm" => Ok(Self::Metric),
            "imperial" | "ft" | "in" => Ok(Self::Imperial),
            other => Err(UnitError::UnknownSystem(other.to_string())),
        }
    }
}

/// Which drafting HUD field a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Segment length from the previous point.
    Distance,
    /// Segment angle from the previous direction, degrees.
    Angle,
    /// Absolute X coordinate.
    CoordX,
    /// Absolute Y coordinate.
    CoordY,
    /// Absolute Z coordinate.
    CoordZ,
    /// Enclosed area of a closed polyline.
    Area,
}

impl FieldKind {
    /// Fields that carry a length and use the dimension grammar.
    pub fn is_length(&self) -> bool {
        matches!(
            self,
            FieldKind::Distance | FieldKind::CoordX | FieldKind::CoordY | FieldKind::CoordZ
        )
    }
}

/// Errors from numeric input parsing.
///
/// Any of these rejects the edit; the field keeps its previous value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    /// The input was empty or whitespace only.
    #[error("empty input")]
    Empty,

    /// A number could not be read where one was expected.
    #[error("invalid number: {0:?}")]
    InvalidNumber(String),

    /// A fraction was malformed.
    #[error("invalid fraction: {0:?}")]
    InvalidFraction(String),

    /// A fraction or adjustment divided by zero.
    #[error("division by zero")]
    ZeroDenominator,

    /// Unconsumed input after a complete value.
    #[error("unexpected trailing input: {0:?}")]
    Trailing(String),

    /// Unknown measurement system name.
    #[error("unknown measurement system: {0:?}")]
    UnknownSystem(String),
}
