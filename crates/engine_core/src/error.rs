//! Configuration errors surfaced once at startup.

use thiserror::Error;

/// A configuration constant that would make a tick-time computation ill-defined.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must be in (0, 1] (got {value})")]
    RateOutOfRange { field: &'static str, value: f64 },

    #[error("{field}: min ({min}) must not exceed max ({max})")]
    InvertedRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("{field} must be in [0, 1) (got {value})")]
    FractionOutOfRange { field: &'static str, value: f64 },

    #[error("{field} must be within [{min}, {max}] (got {value})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field}: unknown name {value:?}")]
    UnknownName { field: &'static str, value: String },
}

impl ConfigError {
    /// Check that a value is strictly positive.
    pub fn require_positive(field: &'static str, value: f64) -> Result<(), Self> {
        if value > 0.0 {
            Ok(())
        } else {
            Err(Self::NotPositive { field, value })
        }
    }

    /// Check that a smoothing rate lies in (0, 1].
    pub fn require_rate(field: &'static str, value: f64) -> Result<(), Self> {
        if value > 0.0 && value <= 1.0 {
            Ok(())
        } else {
            Err(Self::RateOutOfRange { field, value })
        }
    }

    /// Check that `min <= max`.
    pub fn require_ordered(field: &'static str, min: f64, max: f64) -> Result<(), Self> {
        if min <= max {
            Ok(())
        } else {
            Err(Self::InvertedRange { field, min, max })
        }
    }

    /// Check that `min <= value <= max`.
    pub fn require_within(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), Self> {
        if (min..=max).contains(&value) {
            Ok(())
        } else {
            Err(Self::OutOfRange {
                field,
                value,
                min,
                max,
            })
        }
    }

    /// Check that a fraction lies in [0, 1).
    pub fn require_fraction(field: &'static str, value: f64) -> Result<(), Self> {
        if (0.0..1.0).contains(&value) {
            Ok(())
        } else {
            Err(Self::FractionOutOfRange { field, value })
        }
    }
}
