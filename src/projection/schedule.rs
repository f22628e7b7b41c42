//! Year-end summary rows of an allocation projection

use serde::{Deserialize, Serialize};

use crate::strategy::MAX_DURATION_YEARS;

/// Balance of one allocation at the end of a projection year
///
/// The last row of a fractional duration sits at the fractional year, not the next
/// whole one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRow {
    /// Elapsed time in years
    pub year: f64,

    /// Elapsed compounding periods (may be fractional)
    pub periods: f64,

    /// Cumulative capital paid in (initial deposit or periodic deposits)
    pub contributed: f64,

    /// Cumulative withdrawals taken out of the pool
    pub withdrawn: f64,

    /// Balance at this point, never negative
    pub balance: f64,
}

/// Number of schedule rows for `duration_years`, or None past [`MAX_DURATION_YEARS`]
pub(crate) fn schedule_len(duration_years: f64) -> Option<u32> {
    let whole_years = duration_years.ceil();
    if !(0.0..=MAX_DURATION_YEARS).contains(&whole_years) {
        return None;
    }
    Some(whole_years as u32)
}

/// Time points (in years) at which schedule rows are produced for `duration_years`
///
/// Empty when the duration is out of range for a schedule.
pub(crate) fn schedule_years(duration_years: f64) -> impl Iterator<Item = f64> {
    let whole_years = schedule_len(duration_years).unwrap_or(0);
    (1..=whole_years).map(move |year| (year as f64).min(duration_years))
}
