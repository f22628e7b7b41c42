//! Strategy-level projection output

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::allocation::AllocationProjection;
use crate::rates::years_to_double;
use crate::strategy::{Compounding, ContributionMode};

/// Per-allocation breakdown together with the terms it was computed under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategySnapshot {
    pub mode: ContributionMode,
    pub amount: f64,
    pub duration_years: f64,
    pub compounding: Compounding,
    pub inflation_rate: f64,
    pub currency: String,
    pub allocations: Vec<AllocationProjection>,
}

/// Point-in-time projection of a strategy
///
/// Never updated in place: recomputing a strategy produces a new `Projection`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub strategy_id: String,
    pub snapshot: StrategySnapshot,

    /// Sum of allocation future values; None when the strategy has no allocations
    pub aggregate_fv: Option<f64>,

    /// Blended rate from total principal to `aggregate_fv`
    pub aggregate_cagr: Option<f64>,

    pub generated_at: DateTime<Utc>,

    /// Whether monetary figures are inflation-adjusted
    pub real_valued: bool,
}

impl Projection {
    pub fn is_empty(&self) -> bool {
        self.snapshot.allocations.is_empty()
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let allocations = &self.snapshot.allocations;
        let total_principal: f64 = allocations.iter().map(|a| a.principal).sum();
        let total_contributed: f64 = allocations.iter().map(|a| a.total_contributed).sum();
        let total_withdrawn: f64 = allocations.iter().map(|a| a.total_withdrawn).sum();

        ProjectionSummary {
            allocation_count: allocations.len(),
            total_principal,
            total_contributed,
            total_withdrawn,
            aggregate_fv: self.aggregate_fv,
            total_gain: self
                .aggregate_fv
                .map(|fv| fv + total_withdrawn - total_principal),
            aggregate_cagr: self.aggregate_cagr,
            years_to_double: self.aggregate_cagr.map(years_to_double),
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub allocation_count: usize,
    pub total_principal: f64,
    pub total_contributed: f64,
    pub total_withdrawn: f64,
    pub aggregate_fv: Option<f64>,
    pub total_gain: Option<f64>,
    pub aggregate_cagr: Option<f64>,
    /// Years to double at the blended rate
    pub years_to_double: Option<f64>,
}
