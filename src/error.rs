//! Error types for boundary validation and strategy loading
//!
//! The engine itself never fails: domain edges (zero duration, total loss, zero base)
//! are sentinel return values. These errors only guard the way in.

use thiserror::Error;

/// A strategy or allocation that must not reach the engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("amount must be a non-negative finite number, got {0}")]
    InvalidAmount(f64),

    #[error("duration must be a non-negative finite number of years, got {0}")]
    InvalidDuration(f64),

    #[error("duration of {years} years exceeds the {max} year limit")]
    DurationTooLong { years: f64, max: f64 },

    #[error("inflation rate must be finite and greater than -100%, got {0}")]
    InvalidInflation(f64),

    #[error("withdrawal amount must be a non-negative finite number, got {0}")]
    InvalidWithdrawalAmount(f64),

    #[error("allocation '{category}': percent must be within 0-100, got {percent}")]
    PercentOutOfRange { category: String, percent: f64 },

    #[error(
        "allocation '{category}': expected annual return must be finite and at least -100%, \
         got {rate}"
    )]
    InvalidReturn { category: String, rate: f64 },

    #[error("unknown contribution mode: {0}")]
    UnknownMode(String),

    #[error("unknown compounding convention: {0}")]
    UnknownCompounding(String),
}

/// Failure while reading strategies from JSON or CSV
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("strategy '{id}' is invalid: {source}")]
    Invalid {
        id: String,
        #[source]
        source: ValidationError,
    },

    #[error("allocation references unknown strategy '{0}'")]
    UnknownStrategy(String),

    #[error("strategy '{0}' appears more than once")]
    DuplicateStrategy(String),
}
