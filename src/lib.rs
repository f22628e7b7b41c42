//! Strategy Engine - Growth and rate-conversion engine for investment strategies
//!
//! This library provides:
//! - Conversions between CAGR, nominal, real and effective annual rates
//! - Doubling time and time-to-multiplier horizons
//! - Future-value projections for lumpsum, SIP, goal and withdrawal plans
//! - Inflation normalization and blended multi-allocation aggregates
//! - Batch and sensitivity runs over many strategies

pub mod error;
pub mod projection;
pub mod rates;
pub mod scenario;
pub mod strategy;

// Re-export commonly used types
pub use error::{LoadError, ValidationError};
pub use projection::{EngineConfig, Projection, ProjectionSummary, StrategyAggregator};
pub use scenario::ScenarioRunner;
pub use strategy::{Allocation, Compounding, ContributionMode, Strategy};
