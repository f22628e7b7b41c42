//! Re-express allocation projections in real (inflation-adjusted) terms
//!
//! A projected balance at time `t` is divided by the deflator `(1 + inflation)^t`; the
//! realized rate moves through the Fisher relation. Deposits, withdrawals and principal
//! are amounts the investor pays or receives and stay nominal.
//!
//! Not idempotent: adjusting twice discounts twice. The `real_valued` flag on the
//! projection records whether the adjustment has already been made.

use log::warn;

use super::allocation::AllocationProjection;
use crate::rates::{nominal_rate, real_rate};

fn deflator(inflation: f64, years: f64) -> f64 {
    if inflation == 0.0 || years == 0.0 {
        return 1.0;
    }
    (1.0 + inflation).powf(years)
}

/// Nominal projection to real terms under `inflation`
pub fn to_real(projection: &AllocationProjection, inflation: f64) -> AllocationProjection {
    if projection.real_valued {
        warn!(
            "allocation '{}' is already real-valued; inflation will be applied twice",
            projection.category
        );
    }

    let mut adjusted = projection.clone();
    adjusted.future_value /= deflator(inflation, projection.duration_years);
    for row in &mut adjusted.schedule {
        row.balance /= deflator(inflation, row.year);
    }
    adjusted.realized_cagr = projection.realized_cagr.map(|rate| real_rate(rate, inflation));
    adjusted.real_valued = true;
    adjusted
}

/// Real projection back to nominal terms; inverse of [`to_real`]
pub fn to_nominal(projection: &AllocationProjection, inflation: f64) -> AllocationProjection {
    if !projection.real_valued {
        warn!(
            "allocation '{}' is already nominal; inflation will be added twice",
            projection.category
        );
    }

    let mut adjusted = projection.clone();
    adjusted.future_value *= deflator(inflation, projection.duration_years);
    for row in &mut adjusted.schedule {
        row.balance *= deflator(inflation, row.year);
    }
    adjusted.realized_cagr = projection.realized_cagr.map(|rate| nominal_rate(rate, inflation));
    adjusted.real_valued = false;
    adjusted
}
