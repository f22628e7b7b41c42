//! Scenario runner for batch and sensitivity projections
//!
//! Holds one engine configuration and reuses it across many strategies or many
//! variations of the same strategy.

use rayon::prelude::*;

use crate::projection::{EngineConfig, Projection, StrategyAggregator};
use crate::Strategy;

/// Runs strategies, batches and what-if variations under a shared configuration
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
///
/// // What if every allocation returns 2% less or 2% more?
/// let results = runner.run_return_shifts(&strategy, &[-0.02, 0.0, 0.02]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    aggregator: StrategyAggregator,
}

impl ScenarioRunner {
    /// Create runner with the default engine configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            aggregator: StrategyAggregator::new(config),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        self.aggregator.config()
    }

    /// Run a single strategy
    pub fn run(&self, strategy: &Strategy) -> Projection {
        self.aggregator.aggregate(strategy)
    }

    /// Run many strategies in parallel; results keep input order
    pub fn run_batch(&self, strategies: &[Strategy]) -> Vec<Projection> {
        strategies
            .par_iter()
            .map(|strategy| self.aggregator.aggregate(strategy))
            .collect()
    }

    /// Run `strategy` once per shift, with every allocation's expected return moved by it
    pub fn run_return_shifts(&self, strategy: &Strategy, shifts: &[f64]) -> Vec<Projection> {
        shifts
            .par_iter()
            .map(|&shift| {
                let mut shifted = strategy.clone();
                for allocation in &mut shifted.allocations {
                    allocation.expected_annual_return += shift;
                }
                self.aggregator.aggregate(&shifted)
            })
            .collect()
    }

    /// Run `strategy` in real terms under each inflation rate
    pub fn run_inflation_scenarios(
        &self,
        strategy: &Strategy,
        inflation_rates: &[f64],
    ) -> Vec<Projection> {
        inflation_rates
            .par_iter()
            .map(|&inflation| {
                let adjusted = strategy.clone().with_inflation(inflation, true);
                self.aggregator.aggregate(&adjusted)
            })
            .collect()
    }
}
