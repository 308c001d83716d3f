//! Error types of the estimators.
//!
//! Numerical failures are never masked: a singular matrix or a shape
//! mismatch is reported as a `LinalgError`, bad inputs to the scalar
//! estimators as an `EstimationError`, and rejected configurations as
//! a `ConfigError`. All three convert into `anyhow::Error` with `?`
//! and can be recovered with `downcast_ref`.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum LinalgError {
    /// Inversion or factorization of a named matrix failed.
    Singular { what: &'static str },

    /// A matrix does not have the shape the formula needs.
    Shape {
        what: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum EstimationError {
    /// No observations were given.
    EmptyData,

    /// `β1 = 0`: the observation carries no information on the state.
    ZeroSlope,

    /// The hypothesis grid has no points.
    EmptyGrid,

    /// Every combined log value on the grid is `-inf` or NaN.
    NoFinitePosterior,

    /// A variance or step size that must be positive is not.
    NonPositive { what: &'static str, value: f64 },

    /// A row of observations that must have zero mean does not.
    NotCentred { row: usize, mean: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The name is known but has no implementation.
    Unsupported(String),

    /// A field value is outside its domain.
    Invalid { field: &'static str, reason: String },
}

impl fmt::Display for LinalgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinalgError::Singular { what } => write!(f, "{} is singular", what),
            LinalgError::Shape {
                what,
                expected,
                found,
            } => write!(
                f,
                "{} should be {} x {}, found {} x {}",
                what, expected.0, expected.1, found.0, found.1
            ),
        }
    }
}

impl fmt::Display for EstimationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimationError::EmptyData => write!(f, "no observations"),
            EstimationError::ZeroSlope => write!(f, "beta_1 is zero"),
            EstimationError::EmptyGrid => write!(f, "empty hypothesis grid"),
            EstimationError::NoFinitePosterior => {
                write!(f, "no finite log posterior value on the grid")
            }
            EstimationError::NonPositive { what, value } => {
                write!(f, "{} must be positive, found {}", what, value)
            }
            EstimationError::NotCentred { row, mean } => write!(
                f,
                "row {} has mean {}; centre or z-score the rows first",
                row, mean
            ),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Unsupported(name) => write!(f, "{} is not supported", name),
            ConfigError::Invalid { field, reason } => write!(f, "invalid {}: {}", field, reason),
        }
    }
}

impl std::error::Error for LinalgError {}
impl std::error::Error for EstimationError {}
impl std::error::Error for ConfigError {}

/// Reject a non-positive (or NaN) quantity
pub fn ensure_positive(what: &'static str, value: f64) -> Result<f64, EstimationError> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(EstimationError::NonPositive { what, value })
    }
}
