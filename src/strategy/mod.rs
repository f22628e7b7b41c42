//! Strategy data structures and loading

mod data;
pub mod loader;

pub use data::{Allocation, Compounding, ContributionMode, Strategy, MAX_DURATION_YEARS};
pub use loader::{
    load_strategies, load_strategies_from_readers, load_strategies_json_from_reader,
    load_strategy_json, load_strategy_json_from_reader,
};
