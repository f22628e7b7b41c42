//! Strategy and allocation records as handed over by the persistence layer

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Longest accepted strategy duration, in years
pub const MAX_DURATION_YEARS: f64 = 1_000.0;

/// How capital enters (or leaves) the strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContributionMode {
    /// Single deposit compounded for the full duration
    Lumpsum,
    /// Equal deposit at the end of every period
    Sip,
    /// Solve for the periodic deposit that reaches a target amount
    Goal,
    /// Equal withdrawals from an existing pool
    Withdrawal,
}

impl ContributionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContributionMode::Lumpsum => "lumpsum",
            ContributionMode::Sip => "sip",
            ContributionMode::Goal => "goal",
            ContributionMode::Withdrawal => "withdrawal",
        }
    }
}

impl FromStr for ContributionMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lumpsum" => Ok(ContributionMode::Lumpsum),
            "sip" => Ok(ContributionMode::Sip),
            "goal" => Ok(ContributionMode::Goal),
            "withdrawal" => Ok(ContributionMode::Withdrawal),
            _ => Err(ValidationError::UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for ContributionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compounding convention for the expected annual return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compounding {
    Daily,
    Monthly,
    Quarterly,
    Annually,
}

impl Compounding {
    /// Number of compounding periods in one year
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Compounding::Daily => 365,
            Compounding::Monthly => 12,
            Compounding::Quarterly => 4,
            Compounding::Annually => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Compounding::Daily => "daily",
            Compounding::Monthly => "monthly",
            Compounding::Quarterly => "quarterly",
            Compounding::Annually => "annually",
        }
    }
}

impl FromStr for Compounding {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Compounding::Daily),
            "monthly" => Ok(Compounding::Monthly),
            "quarterly" => Ok(Compounding::Quarterly),
            "annually" => Ok(Compounding::Annually),
            _ => Err(ValidationError::UnknownCompounding(s.to_string())),
        }
    }
}

impl fmt::Display for Compounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One capital bucket within a strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    /// Free-form label (e.g. "equity", "debt")
    pub category: String,

    /// Raw share of the strategy's capital, 0-100, before normalization
    pub percent: f64,

    /// Expected annual return as a decimal (may be negative)
    pub expected_annual_return: f64,
}

impl Allocation {
    pub fn new(category: impl Into<String>, percent: f64, expected_annual_return: f64) -> Self {
        Self {
            category: category.into(),
            percent,
            expected_annual_return,
        }
    }
}

/// A named investment plan and the allocations it owns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Strategy {
    /// Opaque identifier assigned by the persistence layer
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    pub mode: ContributionMode,

    /// Deposit, per-period contribution, target or pool depending on `mode`
    pub amount: f64,

    pub duration_years: f64,

    pub compounding: Compounding,

    /// Express results in inflation-adjusted (real) terms
    #[serde(default)]
    pub normalize_mode: bool,

    #[serde(default)]
    pub inflation_rate: f64,

    /// ISO currency code, never interpreted
    #[serde(default)]
    pub currency: String,

    /// Per-period withdrawal from the whole pool (withdrawal mode only).
    /// When absent the pool is drawn down to exactly zero at the final period.
    #[serde(default)]
    pub withdrawal_amount: Option<f64>,

    #[serde(default)]
    pub allocations: Vec<Allocation>,
}

impl Strategy {
    /// Create a strategy with no allocations, no inflation normalization
    pub fn new(
        id: impl Into<String>,
        mode: ContributionMode,
        amount: f64,
        duration_years: f64,
        compounding: Compounding,
    ) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            mode,
            amount,
            duration_years,
            compounding,
            normalize_mode: false,
            inflation_rate: 0.0,
            currency: String::new(),
            withdrawal_amount: None,
            allocations: Vec::new(),
        }
    }

    /// Builder: attach an allocation
    pub fn with_allocation(mut self, allocation: Allocation) -> Self {
        self.allocations.push(allocation);
        self
    }

    /// Builder: express results in real terms under `inflation_rate`
    pub fn with_inflation(mut self, inflation_rate: f64, normalize: bool) -> Self {
        self.inflation_rate = inflation_rate;
        self.normalize_mode = normalize;
        self
    }

    /// Builder: fixed per-period withdrawal for withdrawal mode
    pub fn with_withdrawal_amount(mut self, amount: f64) -> Self {
        self.withdrawal_amount = Some(amount);
        self
    }

    /// Sum of raw allocation percentages
    pub fn total_percent(&self) -> f64 {
        self.allocations.iter().map(|a| a.percent).sum()
    }

    /// Check ranges before the strategy reaches the engine.
    /// The engine itself assumes these hold.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(ValidationError::InvalidAmount(self.amount));
        }
        if !self.duration_years.is_finite() || self.duration_years < 0.0 {
            return Err(ValidationError::InvalidDuration(self.duration_years));
        }
        if self.duration_years > MAX_DURATION_YEARS {
            return Err(ValidationError::DurationTooLong {
                years: self.duration_years,
                max: MAX_DURATION_YEARS,
            });
        }
        if !self.inflation_rate.is_finite() || self.inflation_rate <= -1.0 {
            return Err(ValidationError::InvalidInflation(self.inflation_rate));
        }
        if let Some(w) = self.withdrawal_amount {
            if !w.is_finite() || w < 0.0 {
                return Err(ValidationError::InvalidWithdrawalAmount(w));
            }
        }

        for allocation in &self.allocations {
            if !allocation.percent.is_finite() || !(0.0..=100.0).contains(&allocation.percent) {
                return Err(ValidationError::PercentOutOfRange {
                    category: allocation.category.clone(),
                    percent: allocation.percent,
                });
            }
            let rate = allocation.expected_annual_return;
            if !rate.is_finite() || rate < -1.0 {
                return Err(ValidationError::InvalidReturn {
                    category: allocation.category.clone(),
                    rate,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_strategy() -> Strategy {
        Strategy::new("s1", ContributionMode::Lumpsum, 10_000.0, 10.0, Compounding::Annually)
            .with_allocation(Allocation::new("equity", 60.0, 0.12))
            .with_allocation(Allocation::new("debt", 40.0, 0.07))
    }

    #[test]
    fn test_periods_per_year() {
        assert_eq!(Compounding::Daily.periods_per_year(), 365);
        assert_eq!(Compounding::Monthly.periods_per_year(), 12);
        assert_eq!(Compounding::Quarterly.periods_per_year(), 4);
        assert_eq!(Compounding::Annually.periods_per_year(), 1);
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("SIP".parse::<ContributionMode>(), Ok(ContributionMode::Sip));
        assert_eq!(" monthly ".parse::<Compounding>(), Ok(Compounding::Monthly));
        assert_eq!(
            "weekly".parse::<Compounding>(),
            Err(ValidationError::UnknownCompounding("weekly".to_string()))
        );
        assert!("annuity".parse::<ContributionMode>().is_err());
    }

    #[test]
    fn test_validate_accepts_valid_strategy() {
        assert!(test_strategy().validate().is_ok());
        // Deflation and negative returns are valid inputs
        let strategy = test_strategy()
            .with_inflation(-0.02, true)
            .with_allocation(Allocation::new("crypto", 0.0, -0.5));
        assert!(strategy.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_ranges() {
        let mut strategy = test_strategy();
        strategy.amount = -1.0;
        assert_eq!(strategy.validate(), Err(ValidationError::InvalidAmount(-1.0)));

        let mut strategy = test_strategy();
        strategy.duration_years = -3.0;
        assert_eq!(strategy.validate(), Err(ValidationError::InvalidDuration(-3.0)));

        let strategy = test_strategy().with_allocation(Allocation::new("gold", 101.0, 0.05));
        assert!(matches!(
            strategy.validate(),
            Err(ValidationError::PercentOutOfRange { .. })
        ));

        let mut strategy = test_strategy();
        strategy.duration_years = 5e9;
        assert_eq!(
            strategy.validate(),
            Err(ValidationError::DurationTooLong {
                years: 5e9,
                max: MAX_DURATION_YEARS
            })
        );

        let mut strategy = test_strategy();
        strategy.duration_years = MAX_DURATION_YEARS;
        assert!(strategy.validate().is_ok());

        let strategy = test_strategy().with_inflation(-1.0, true);
        assert!(matches!(strategy.validate(), Err(ValidationError::InvalidInflation(_))));
    }

    #[test]
    fn test_json_shape() {
        let json = r#"{
            "id": "abc",
            "name": "Retirement",
            "mode": "sip",
            "amount": 500,
            "durationYears": 20,
            "compounding": "monthly",
            "normalizeMode": true,
            "inflationRate": 0.04,
            "currency": "INR",
            "allocations": [
                { "category": "equity", "percent": 70, "expectedAnnualReturn": 0.12 }
            ]
        }"#;
        let strategy: Strategy = serde_json::from_str(json).unwrap();
        assert_eq!(strategy.mode, ContributionMode::Sip);
        assert_eq!(strategy.compounding, Compounding::Monthly);
        assert!(strategy.normalize_mode);
        assert_eq!(strategy.allocations.len(), 1);
        assert_eq!(strategy.withdrawal_amount, None);
        assert!((strategy.total_percent() - 70.0).abs() < 1e-12);
    }

    #[test]
    fn test_json_rejects_unknown_mode() {
        let json =
            r#"{"mode": "annuity", "amount": 1, "durationYears": 1, "compounding": "daily"}"#;
        assert!(serde_json::from_str::<Strategy>(json).is_err());
    }
}
