//! Future value of a single allocation under the strategy's contribution mode
//!
//! Every mode is a closed form over the periodic rate `i = r / p` and the period count
//! `n = p * years`:
//! - lumpsum: `P (1+i)^n`
//! - sip: `d s(n)` with `s(n) = ((1+i)^n - 1) / i`
//! - goal: required deposit `c = T / s(n)`
//! - withdrawal: `max(0, P (1+i)^n - w s(n))`

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::schedule::{schedule_len, schedule_years, ScheduleRow};
use crate::rates::{annuity_factor, cagr, effective_annual_rate, growth_factor, periodic_rate};
use crate::strategy::{Allocation, Compounding, ContributionMode, Strategy};

/// Slack (in periods) when comparing elapsed periods against the depletion point
const DEPLETION_EPSILON: f64 = 1e-9;

/// Projected outcome for one allocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationProjection {
    pub category: String,

    /// Raw percent as supplied
    pub percent: f64,

    /// Percent after normalization across the strategy
    pub percent_normalized: f64,

    pub expected_annual_return: f64,
    pub duration_years: f64,

    /// Rate applied per compounding period
    pub periodic_rate: f64,

    /// Number of compounding periods over the duration
    pub periods: f64,

    /// Effective annual rate implied by the compounding convention
    pub effective_annual_rate: f64,

    /// Capital the realized rate is measured against (deposit, total deposits or pool)
    pub principal: f64,

    /// Deposit (sip), required deposit (goal) or withdrawal (withdrawal) per period
    pub contribution_per_period: Option<f64>,

    pub total_contributed: f64,
    pub total_withdrawn: f64,
    pub future_value: f64,

    /// Realized CAGR of `principal` to `future_value`; None when there is no principal
    pub realized_cagr: Option<f64>,

    /// When the withdrawal pool runs dry within the duration
    pub depletion_years: Option<f64>,

    pub schedule: Vec<ScheduleRow>,

    /// True once the figures are expressed in inflation-adjusted terms
    pub real_valued: bool,
}

impl AllocationProjection {
    /// Value created over the duration, counting withdrawals already taken out
    pub fn gain(&self) -> f64 {
        self.future_value + self.total_withdrawn - self.principal
    }
}

/// Mode-specific figures before they are wrapped into an [`AllocationProjection`]
struct ModeOutcome {
    principal: f64,
    contribution_per_period: Option<f64>,
    total_contributed: f64,
    total_withdrawn: f64,
    future_value: f64,
    depletion_periods: Option<f64>,
    schedule: Vec<ScheduleRow>,
}

/// Projects allocations under one strategy's shared terms
#[derive(Debug, Clone)]
pub struct AllocationProjector {
    mode: ContributionMode,
    amount: f64,
    duration_years: f64,
    compounding: Compounding,
    withdrawal_amount: Option<f64>,
    detailed_output: bool,
}

impl AllocationProjector {
    /// Create a projector for the terms shared by all allocations of `strategy`
    pub fn new(strategy: &Strategy, detailed_output: bool) -> Self {
        Self {
            mode: strategy.mode,
            amount: strategy.amount,
            duration_years: strategy.duration_years,
            compounding: strategy.compounding,
            withdrawal_amount: strategy.withdrawal_amount,
            detailed_output,
        }
    }

    /// Project one allocation holding `percent_normalized` percent of the strategy amount
    pub fn project(
        &self,
        allocation: &Allocation,
        percent_normalized: f64,
    ) -> AllocationProjection {
        let share = percent_normalized / 100.0;
        let base = self.amount * share;
        let periods_per_year = self.compounding.periods_per_year();
        let rate = periodic_rate(allocation.expected_annual_return, periods_per_year);
        let periods = self.duration_years * periods_per_year as f64;
        let withdrawal = self.withdrawal_amount.map(|w| w * share);

        let outcome = if self.duration_years == 0.0 {
            self.hold(base, withdrawal)
        } else {
            match self.mode {
                ContributionMode::Lumpsum => self.lumpsum(base, rate, periods),
                ContributionMode::Sip => self.sip(base, rate, periods),
                ContributionMode::Goal => self.goal(base, rate, periods),
                ContributionMode::Withdrawal => self.withdrawal(base, withdrawal, rate, periods),
            }
        };

        let realized_cagr = if self.duration_years == 0.0 {
            Some(0.0)
        } else if outcome.principal > 0.0 {
            Some(cagr(outcome.principal, outcome.future_value, self.duration_years))
        } else {
            None
        };

        let depletion_years = outcome
            .depletion_periods
            .filter(|k| *k <= periods + DEPLETION_EPSILON)
            .map(|k| k / periods_per_year as f64);

        debug!(
            "projected {} ({}, {:.4}%): fv={:.2} cagr={:?}",
            allocation.category, self.mode, percent_normalized, outcome.future_value, realized_cagr
        );

        AllocationProjection {
            category: allocation.category.clone(),
            percent: allocation.percent,
            percent_normalized,
            expected_annual_return: allocation.expected_annual_return,
            duration_years: self.duration_years,
            periodic_rate: rate,
            periods,
            effective_annual_rate: effective_annual_rate(
                allocation.expected_annual_return,
                periods_per_year,
            ),
            principal: outcome.principal,
            contribution_per_period: outcome.contribution_per_period,
            total_contributed: outcome.total_contributed,
            total_withdrawn: outcome.total_withdrawn,
            future_value: outcome.future_value,
            realized_cagr,
            depletion_years,
            schedule: outcome.schedule,
            real_valued: false,
        }
    }

    /// Zero duration: the amount is returned unchanged
    fn hold(&self, base: f64, withdrawal: Option<f64>) -> ModeOutcome {
        let contribution_per_period = match self.mode {
            ContributionMode::Lumpsum => None,
            ContributionMode::Sip | ContributionMode::Goal => Some(base),
            ContributionMode::Withdrawal => Some(withdrawal.unwrap_or(0.0)),
        };

        ModeOutcome {
            principal: base,
            contribution_per_period,
            total_contributed: base,
            total_withdrawn: 0.0,
            future_value: base,
            depletion_periods: None,
            schedule: Vec::new(),
        }
    }

    fn lumpsum(&self, deposit: f64, rate: f64, periods: f64) -> ModeOutcome {
        let schedule = self.schedule(|k| (deposit, 0.0, deposit * growth_factor(rate, k)));

        ModeOutcome {
            principal: deposit,
            contribution_per_period: None,
            total_contributed: deposit,
            total_withdrawn: 0.0,
            future_value: deposit * growth_factor(rate, periods),
            depletion_periods: None,
            schedule,
        }
    }

    /// Ordinary annuity: `deposit` paid at the end of every period
    fn sip(&self, deposit: f64, rate: f64, periods: f64) -> ModeOutcome {
        let schedule = self.schedule(|k| (deposit * k, 0.0, deposit * annuity_factor(rate, k)));

        ModeOutcome {
            principal: deposit * periods,
            contribution_per_period: Some(deposit),
            total_contributed: deposit * periods,
            total_withdrawn: 0.0,
            future_value: deposit * annuity_factor(rate, periods),
            depletion_periods: None,
            schedule,
        }
    }

    /// Deposit per period that grows to `target` by the final period
    fn goal(&self, target: f64, rate: f64, periods: f64) -> ModeOutcome {
        let factor = annuity_factor(rate, periods);
        let deposit = if factor > 0.0 { target / factor } else { target };
        let schedule = self.schedule(|k| (deposit * k, 0.0, deposit * annuity_factor(rate, k)));

        ModeOutcome {
            principal: deposit * periods,
            contribution_per_period: Some(deposit),
            total_contributed: deposit * periods,
            total_withdrawn: 0.0,
            future_value: target,
            depletion_periods: None,
            schedule,
        }
    }

    /// Equal withdrawals from `pool`; the balance is clamped at zero once depleted
    fn withdrawal(
        &self,
        pool: f64,
        withdrawal: Option<f64>,
        rate: f64,
        periods: f64,
    ) -> ModeOutcome {
        let (payment, depletion) = match withdrawal {
            Some(payment) => (payment, depletion_periods(pool, payment, rate)),
            None => {
                // The level payment runs out exactly at the final period
                let payment = level_payment(pool, rate, periods);
                if payment > 0.0 {
                    (payment, Some(periods))
                } else {
                    (payment, depletion_periods(pool, payment, rate))
                }
            }
        };

        let balance_at = |k: f64| match depletion {
            Some(end) if k >= end - DEPLETION_EPSILON => 0.0,
            _ => (pool * growth_factor(rate, k) - payment * annuity_factor(rate, k)).max(0.0),
        };
        let withdrawn_at = |k: f64| payment * depletion.map_or(k, |end| k.min(end));

        let schedule = self.schedule(|k| (pool, withdrawn_at(k), balance_at(k)));

        ModeOutcome {
            principal: pool,
            contribution_per_period: Some(payment),
            total_contributed: pool,
            total_withdrawn: withdrawn_at(periods),
            future_value: balance_at(periods),
            depletion_periods: depletion,
            schedule,
        }
    }

    /// Year-end rows; `at` maps elapsed periods to (contributed, withdrawn, balance)
    fn schedule<F>(&self, at: F) -> Vec<ScheduleRow>
    where
        F: Fn(f64) -> (f64, f64, f64),
    {
        if !self.detailed_output {
            return Vec::new();
        }
        if schedule_len(self.duration_years).is_none() {
            warn!(
                "no schedule for a {} year duration, summary figures only",
                self.duration_years
            );
            return Vec::new();
        }

        let periods_per_year = self.compounding.periods_per_year() as f64;
        schedule_years(self.duration_years)
            .map(|year| {
                let periods = year * periods_per_year;
                let (contributed, withdrawn, balance) = at(periods);
                ScheduleRow {
                    year,
                    periods,
                    contributed,
                    withdrawn,
                    balance,
                }
            })
            .collect()
    }
}

/// Level withdrawal that takes `pool` to exactly zero after `periods`
fn level_payment(pool: f64, rate: f64, periods: f64) -> f64 {
    if periods <= 0.0 {
        return 0.0;
    }
    let factor = annuity_factor(rate, periods);
    if factor <= 0.0 {
        return 0.0;
    }
    pool * growth_factor(rate, periods) / factor
}

/// Periods until `payment` per period exhausts `pool`, or None if it never does
fn depletion_periods(pool: f64, payment: f64, rate: f64) -> Option<f64> {
    if pool <= 0.0 {
        return Some(0.0);
    }
    if payment <= 0.0 {
        return None;
    }
    if rate == 0.0 {
        return Some(pool / payment);
    }
    if 1.0 + rate <= 0.0 {
        // Whole pool lost in the first period
        return Some(0.0);
    }

    // k* = ln(w / (w - P i)) / ln(1 + i), written with ln_1p for small rates
    let interest_share = pool * rate / payment;
    if interest_share >= 1.0 {
        // Interest alone covers the withdrawals
        return None;
    }
    Some(-(-interest_share).ln_1p() / rate.ln_1p())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn single(
        mode: ContributionMode,
        amount: f64,
        years: f64,
        compounding: Compounding,
        rate: f64,
    ) -> (Strategy, Allocation) {
        let allocation = Allocation::new("equity", 100.0, rate);
        let strategy = Strategy::new("t", mode, amount, years, compounding)
            .with_allocation(allocation.clone());
        (strategy, allocation)
    }

    fn project(strategy: &Strategy, allocation: &Allocation) -> AllocationProjection {
        AllocationProjector::new(strategy, true).project(allocation, 100.0)
    }

    #[test]
    fn test_lumpsum_annual() {
        let (strategy, allocation) =
            single(ContributionMode::Lumpsum, 10_000.0, 10.0, Compounding::Annually, 0.10);
        let result = project(&strategy, &allocation);

        assert_abs_diff_eq!(result.future_value, 25_937.42, epsilon = 0.01);
        assert_abs_diff_eq!(result.realized_cagr.unwrap(), 0.10, epsilon = 1e-9);
        assert_eq!(result.contribution_per_period, None);
        assert_eq!(result.schedule.len(), 10);
        assert_abs_diff_eq!(result.schedule[9].balance, result.future_value, epsilon = 1e-6);
    }

    #[test]
    fn test_lumpsum_monthly_matches_ear() {
        let (strategy, allocation) =
            single(ContributionMode::Lumpsum, 10_000.0, 1.0, Compounding::Monthly, 0.12);
        let result = project(&strategy, &allocation);

        assert_abs_diff_eq!(result.future_value, 11_268.25, epsilon = 0.01);
        assert_abs_diff_eq!(
            result.realized_cagr.unwrap(),
            result.effective_annual_rate,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(result.periodic_rate, 0.01, epsilon = 1e-12);
        assert_eq!(result.periods, 12.0);
    }

    #[test]
    fn test_sip_monthly() {
        let (strategy, allocation) =
            single(ContributionMode::Sip, 100.0, 1.0, Compounding::Monthly, 0.12);
        let result = project(&strategy, &allocation);

        assert_abs_diff_eq!(result.future_value, 1_268.25, epsilon = 0.01);
        assert_abs_diff_eq!(result.total_contributed, 1_200.0, epsilon = 1e-9);
        assert_eq!(result.contribution_per_period, Some(100.0));
        assert!(result.realized_cagr.unwrap() > 0.0);
    }

    #[test]
    fn test_sip_zero_rate_is_flat() {
        let (strategy, allocation) =
            single(ContributionMode::Sip, 250.0, 2.0, Compounding::Quarterly, 0.0);
        let result = project(&strategy, &allocation);

        assert_abs_diff_eq!(result.future_value, 2_000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.realized_cagr.unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_goal_is_inverse_of_sip() {
        let (strategy, allocation) =
            single(ContributionMode::Goal, 1_000_000.0, 10.0, Compounding::Monthly, 0.12);
        let goal = project(&strategy, &allocation);
        let deposit = goal.contribution_per_period.unwrap();
        assert_abs_diff_eq!(deposit, 4_347.09, epsilon = 0.01);
        assert_eq!(goal.future_value, 1_000_000.0);

        let (strategy, allocation) =
            single(ContributionMode::Sip, deposit, 10.0, Compounding::Monthly, 0.12);
        let sip = project(&strategy, &allocation);
        assert_abs_diff_eq!(sip.future_value, 1_000_000.0, epsilon = 1e-4);
        assert_abs_diff_eq!(
            goal.schedule.last().unwrap().balance,
            1_000_000.0,
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_withdrawal_level_payment_exhausts_pool_at_end() {
        let (strategy, allocation) =
            single(ContributionMode::Withdrawal, 100_000.0, 10.0, Compounding::Monthly, 0.06);
        let result = project(&strategy, &allocation);

        assert_eq!(result.future_value, 0.0);
        assert_abs_diff_eq!(result.depletion_years.unwrap(), 10.0, epsilon = 1e-6);
        // Standard 10y/6% amortization: ~1110.21 per month
        assert_abs_diff_eq!(result.contribution_per_period.unwrap(), 1_110.21, epsilon = 0.01);
        assert_eq!(result.realized_cagr, Some(-1.0));
        assert!(result.schedule.iter().all(|row| row.balance >= 0.0));
    }

    #[test]
    fn test_level_payment_drains_pool_at_any_rate() {
        let rates = [1e-9, 1e-8, 1e-6, 1e-4, 0.01, 0.05, 0.3, -1e-8, -0.05];
        for compounding in [
            Compounding::Daily,
            Compounding::Monthly,
            Compounding::Quarterly,
            Compounding::Annually,
        ] {
            for years in [1.0, 5.0, 10.0, 40.0, 60.0] {
                for rate in rates {
                    let (strategy, allocation) =
                        single(ContributionMode::Withdrawal, 250_000.0, years, compounding, rate);
                    let result =
                        AllocationProjector::new(&strategy, false).project(&allocation, 100.0);

                    let case = format!("{} y={} r={}", compounding, years, rate);
                    assert_eq!(result.future_value, 0.0, "{}", case);
                    assert_eq!(result.realized_cagr, Some(-1.0), "{}", case);
                    assert_abs_diff_eq!(result.depletion_years.unwrap(), years, epsilon = 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_depletion_point_tiny_rate() {
        // 1e-10 per period barely moves the flat-rate answer of pool / payment
        let periods = depletion_periods(100_000.0, 1_000.0, 1e-10).unwrap();
        assert_abs_diff_eq!(periods, 100.0, epsilon = 1e-6);
        assert_eq!(depletion_periods(100_000.0, 500.0, 0.01), None);
        assert_eq!(depletion_periods(0.0, 500.0, 0.01), Some(0.0));
    }

    #[test]
    fn test_goal_deposits_reach_target_at_tiny_rate() {
        let (strategy, allocation) =
            single(ContributionMode::Goal, 1_000_000.0, 20.0, Compounding::Daily, 1e-9);
        let result = AllocationProjector::new(&strategy, false).project(&allocation, 100.0);

        assert!(result.total_contributed <= 1_000_000.0);
        assert_abs_diff_eq!(result.total_contributed, 1_000_000.0, epsilon = 0.1);
    }

    #[test]
    fn test_withdrawal_depletes_early_and_clamps() {
        let (strategy, allocation) =
            single(ContributionMode::Withdrawal, 100_000.0, 10.0, Compounding::Monthly, 0.0);
        let strategy = strategy.with_withdrawal_amount(1_000.0);
        let result = project(&strategy, &allocation);

        assert_eq!(result.future_value, 0.0);
        assert_abs_diff_eq!(result.depletion_years.unwrap(), 100.0 / 12.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.total_withdrawn, 100_000.0, epsilon = 1e-6);
        assert_eq!(result.schedule[9].balance, 0.0);
        assert_abs_diff_eq!(result.schedule[7].balance, 4_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_withdrawal_covered_by_interest_never_depletes() {
        let (strategy, allocation) =
            single(ContributionMode::Withdrawal, 100_000.0, 5.0, Compounding::Monthly, 0.12);
        let strategy = strategy.with_withdrawal_amount(500.0);
        let result = project(&strategy, &allocation);

        assert!(result.future_value > 100_000.0);
        assert_eq!(result.depletion_years, None);
        assert_abs_diff_eq!(result.total_withdrawn, 30_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_withdrawal_negative_rate_depletes_sooner() {
        let (strategy, allocation) =
            single(ContributionMode::Withdrawal, 10_000.0, 10.0, Compounding::Annually, -0.10);
        let strategy = strategy.with_withdrawal_amount(1_000.0);
        let result = project(&strategy, &allocation);

        let years = result.depletion_years.unwrap();
        assert!(years < 10.0, "Expected depletion before 10y, got {}", years);
        assert_eq!(result.future_value, 0.0);
    }

    #[test]
    fn test_zero_duration_returns_amount() {
        for mode in [
            ContributionMode::Lumpsum,
            ContributionMode::Sip,
            ContributionMode::Goal,
            ContributionMode::Withdrawal,
        ] {
            let (strategy, allocation) = single(mode, 5_000.0, 0.0, Compounding::Daily, 0.08);
            let result = project(&strategy, &allocation);
            assert_eq!(result.future_value, 5_000.0);
            assert_eq!(result.realized_cagr, Some(0.0));
            assert!(result.schedule.is_empty());
        }
    }

    #[test]
    fn test_negative_rate_declines() {
        let (strategy, allocation) =
            single(ContributionMode::Lumpsum, 10_000.0, 5.0, Compounding::Annually, -0.05);
        let result = project(&strategy, &allocation);

        assert!(result.future_value < 10_000.0);
        assert_abs_diff_eq!(result.realized_cagr.unwrap(), -0.05, epsilon = 1e-9);
    }

    #[test]
    fn test_share_of_amount_and_fractional_schedule() {
        let allocation = Allocation::new("debt", 25.0, 0.08);
        let strategy =
            Strategy::new("t", ContributionMode::Lumpsum, 10_000.0, 2.5, Compounding::Quarterly)
                .with_allocation(allocation.clone());
        let result = AllocationProjector::new(&strategy, true).project(&allocation, 25.0);

        assert_eq!(result.principal, 2_500.0);
        assert_eq!(result.schedule.len(), 3);
        assert_eq!(result.schedule[2].year, 2.5);
        assert_eq!(result.schedule[2].periods, 10.0);
    }

    #[test]
    fn test_summary_only_skips_schedule() {
        let (strategy, allocation) =
            single(ContributionMode::Sip, 100.0, 30.0, Compounding::Daily, 0.07);
        let result = AllocationProjector::new(&strategy, false).project(&allocation, 100.0);
        assert!(result.schedule.is_empty());
        assert!(result.future_value > 0.0);
    }

    #[test]
    fn test_overlong_duration_skips_schedule() {
        let (strategy, allocation) =
            single(ContributionMode::Lumpsum, 1_000.0, 5e9, Compounding::Annually, 0.0);
        let result = project(&strategy, &allocation);
        assert!(result.schedule.is_empty());
        assert_eq!(result.future_value, 1_000.0);
    }

    #[test]
    fn test_zero_share_has_no_realized_rate() {
        let (strategy, allocation) =
            single(ContributionMode::Lumpsum, 10_000.0, 5.0, Compounding::Annually, 0.05);
        let result = AllocationProjector::new(&strategy, false).project(&allocation, 0.0);
        assert_eq!(result.future_value, 0.0);
        assert_eq!(result.realized_cagr, None);
    }
}
