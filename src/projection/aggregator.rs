//! Strategy aggregation: normalize shares, project every allocation, fold into totals

use chrono::{DateTime, Utc};
use log::{info, warn};
use rayon::prelude::*;

use super::allocation::{AllocationProjection, AllocationProjector};
use super::config::EngineConfig;
use super::inflation::to_real;
use super::snapshot::{Projection, StrategySnapshot};
use crate::rates::cagr;
use crate::strategy::{Allocation, Strategy};

/// Rescale `percents` so they sum to 100.
///
/// Sums already within `tolerance` of 100 are returned untouched. An all-zero set is
/// split evenly; an empty set stays empty.
pub fn normalize_percentages(percents: &[f64], tolerance: f64) -> Vec<f64> {
    if percents.is_empty() {
        return Vec::new();
    }

    let total: f64 = percents.iter().sum();
    if (total - 100.0).abs() <= tolerance {
        return percents.to_vec();
    }
    if total <= 0.0 {
        warn!("allocation percentages are all zero; splitting evenly");
        let even = 100.0 / percents.len() as f64;
        return vec![even; percents.len()];
    }

    percents.iter().map(|p| p * 100.0 / total).collect()
}

/// Combines per-allocation projections into one strategy projection
#[derive(Debug, Clone, Default)]
pub struct StrategyAggregator {
    config: EngineConfig,
}

impl StrategyAggregator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Normalized percent for each allocation, in input order
    pub fn normalize(&self, allocations: &[Allocation]) -> Vec<f64> {
        let percents: Vec<f64> = allocations.iter().map(|a| a.percent).collect();
        normalize_percentages(&percents, self.config.normalization_tolerance)
    }

    /// Project `strategy`, timestamped now
    pub fn aggregate(&self, strategy: &Strategy) -> Projection {
        self.aggregate_at(strategy, Utc::now())
    }

    /// Project `strategy` with a caller-supplied generation timestamp
    pub fn aggregate_at(&self, strategy: &Strategy, generated_at: DateTime<Utc>) -> Projection {
        let normalized = self.normalize(&strategy.allocations);
        let allocations = self.project_allocations(strategy, &normalized);

        let (aggregate_fv, aggregate_cagr) = if allocations.is_empty() {
            warn!("strategy '{}' has no allocations; aggregate is null", strategy.id);
            (None, None)
        } else {
            let total_fv: f64 = allocations.iter().map(|a| a.future_value).sum();
            let total_principal: f64 = allocations.iter().map(|a| a.principal).sum();
            (
                Some(total_fv),
                Some(cagr(total_principal, total_fv, strategy.duration_years)),
            )
        };

        info!(
            "strategy '{}': {} allocations, {} over {} years, aggregate fv={:?} cagr={:?}",
            strategy.id,
            allocations.len(),
            strategy.mode,
            strategy.duration_years,
            aggregate_fv,
            aggregate_cagr
        );

        Projection {
            strategy_id: strategy.id.clone(),
            snapshot: StrategySnapshot {
                mode: strategy.mode,
                amount: strategy.amount,
                duration_years: strategy.duration_years,
                compounding: strategy.compounding,
                inflation_rate: strategy.inflation_rate,
                currency: strategy.currency.clone(),
                allocations,
            },
            aggregate_fv,
            aggregate_cagr,
            generated_at,
            real_valued: strategy.normalize_mode,
        }
    }

    /// One projection per allocation; independent of each other, so fanned out when
    /// parallel. `collect` keeps input order either way.
    fn project_allocations(
        &self,
        strategy: &Strategy,
        normalized: &[f64],
    ) -> Vec<AllocationProjection> {
        let projector = AllocationProjector::new(strategy, self.config.detailed_output);
        let project_one = |(allocation, percent): (&Allocation, &f64)| {
            let projection = projector.project(allocation, *percent);
            if strategy.normalize_mode {
                to_real(&projection, strategy.inflation_rate)
            } else {
                projection
            }
        };

        if self.config.parallel {
            strategy
                .allocations
                .par_iter()
                .zip(normalized.par_iter())
                .map(project_one)
                .collect()
        } else {
            strategy
                .allocations
                .iter()
                .zip(normalized.iter())
                .map(project_one)
                .collect()
        }
    }
}
