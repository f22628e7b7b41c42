//! Projection engine for single allocations and whole strategies

mod aggregator;
mod allocation;
mod config;
mod inflation;
mod schedule;
mod snapshot;

pub use aggregator::{normalize_percentages, StrategyAggregator};
pub use allocation::{AllocationProjection, AllocationProjector};
pub use config::{EngineConfig, DEFAULT_NORMALIZATION_TOLERANCE};
pub use inflation::{to_nominal, to_real};
pub use schedule::ScheduleRow;
pub use snapshot::{Projection, ProjectionSummary, StrategySnapshot};
