//! Aspect ratio classification.
//!
//! A ratio matches a target when its percent error `|r - t| / |t| * 100` is at most
//! [`TOLERANCE_PERCENT`]. Portrait is checked before landscape.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

pub const PORTRAIT_RATIO: f64 = 9.0 / 16.0;
pub const LANDSCAPE_RATIO: f64 = 16.0 / 9.0;
pub const TOLERANCE_PERCENT: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectClass {
    Portrait,
    Landscape,
    Other,
}

impl AspectClass {
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        if width == 0 || height == 0 {
            return AspectClass::Other;
        }
        Self::from_ratio(f64::from(width) / f64::from(height))
    }

    pub fn from_ratio(ratio: f64) -> Self {
        if within_tolerance(percent_error(ratio, PORTRAIT_RATIO)) {
            AspectClass::Portrait
        } else if within_tolerance(percent_error(ratio, LANDSCAPE_RATIO)) {
            AspectClass::Landscape
        } else {
            AspectClass::Other
        }
    }

    /// Storage key prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectClass::Portrait => "portrait",
            AspectClass::Landscape => "landscape",
            AspectClass::Other => "other",
        }
    }
}

impl Display for AspectClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

pub fn percent_error(actual: f64, expected: f64) -> f64 {
    (actual - expected).abs() / expected.abs() * 100.0
}

/// Inclusive: an error of exactly the tolerance still matches.
pub fn within_tolerance(error_percent: f64) -> bool {
    error_percent <= TOLERANCE_PERCENT
}
