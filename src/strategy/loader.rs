//! Load strategies from JSON documents or from a strategies/allocations CSV pair
//!
//! Every loaded strategy is validated here, so nothing out of range reaches the engine.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::Reader;
use log::debug;

use super::{Allocation, Compounding, ContributionMode, Strategy};
use crate::error::{LoadError, ValidationError};

/// Raw CSV row of strategies.csv
#[derive(Debug, serde::Deserialize)]
struct StrategyRow {
    #[serde(rename = "StrategyID")]
    strategy_id: String,
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "Mode")]
    mode: String,
    #[serde(rename = "Amount")]
    amount: f64,
    #[serde(rename = "DurationYears")]
    duration_years: f64,
    #[serde(rename = "Compounding")]
    compounding: String,
    #[serde(rename = "NormalizeMode", default)]
    normalize_mode: bool,
    #[serde(rename = "InflationRate", default)]
    inflation_rate: f64,
    #[serde(rename = "Currency", default)]
    currency: String,
    #[serde(rename = "WithdrawalAmount", default)]
    withdrawal_amount: Option<f64>,
}

impl StrategyRow {
    fn into_strategy(self) -> Result<Strategy, LoadError> {
        let invalid = |source: ValidationError| LoadError::Invalid {
            id: self.strategy_id.clone(),
            source,
        };
        let mode: ContributionMode = self.mode.parse().map_err(invalid)?;
        let compounding: Compounding = self.compounding.parse().map_err(invalid)?;

        Ok(Strategy {
            id: self.strategy_id,
            name: self.name,
            mode,
            amount: self.amount,
            duration_years: self.duration_years,
            compounding,
            normalize_mode: self.normalize_mode,
            inflation_rate: self.inflation_rate,
            currency: self.currency,
            withdrawal_amount: self.withdrawal_amount,
            allocations: Vec::new(),
        })
    }
}

/// Raw CSV row of allocations.csv
#[derive(Debug, serde::Deserialize)]
struct AllocationRow {
    #[serde(rename = "StrategyID")]
    strategy_id: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Percent")]
    percent: f64,
    #[serde(rename = "ExpectedAnnualReturn")]
    expected_annual_return: f64,
}

fn validated(strategy: Strategy) -> Result<Strategy, LoadError> {
    strategy.validate().map_err(|source| LoadError::Invalid {
        id: strategy.id.clone(),
        source,
    })?;
    Ok(strategy)
}

/// Load a single strategy (with nested allocations) from a JSON file
pub fn load_strategy_json<P: AsRef<Path>>(path: P) -> Result<Strategy, LoadError> {
    let file = File::open(path)?;
    load_strategy_json_from_reader(BufReader::new(file))
}

/// Load a single strategy from any JSON reader
pub fn load_strategy_json_from_reader<R: Read>(reader: R) -> Result<Strategy, LoadError> {
    let strategy: Strategy = serde_json::from_reader(reader)?;
    validated(strategy)
}

/// Load a JSON array of strategies
pub fn load_strategies_json_from_reader<R: Read>(reader: R) -> Result<Vec<Strategy>, LoadError> {
    let strategies: Vec<Strategy> = serde_json::from_reader(reader)?;
    strategies.into_iter().map(validated).collect()
}

/// Load strategies and their allocations from a pair of CSV files
pub fn load_strategies<P: AsRef<Path>, Q: AsRef<Path>>(
    strategies_path: P,
    allocations_path: Q,
) -> Result<Vec<Strategy>, LoadError> {
    let strategies = File::open(strategies_path)?;
    let allocations = File::open(allocations_path)?;
    load_strategies_from_readers(strategies, allocations)
}

/// Load strategies from any pair of CSV readers (e.g., string buffers)
///
/// Strategies keep file order; allocations keep file order within their strategy.
/// Each StrategyID may appear only once in the strategies file.
pub fn load_strategies_from_readers<R1: Read, R2: Read>(
    strategies: R1,
    allocations: R2,
) -> Result<Vec<Strategy>, LoadError> {
    let mut strategy_reader = Reader::from_reader(strategies);
    let mut loaded = Vec::new();
    let mut index = HashMap::new();

    for result in strategy_reader.deserialize() {
        let row: StrategyRow = result?;
        let strategy = row.into_strategy()?;
        match index.entry(strategy.id.clone()) {
            Entry::Occupied(_) => return Err(LoadError::DuplicateStrategy(strategy.id)),
            Entry::Vacant(slot) => {
                slot.insert(loaded.len());
            }
        }
        loaded.push(strategy);
    }

    let mut allocation_reader = Reader::from_reader(allocations);
    for result in allocation_reader.deserialize() {
        let row: AllocationRow = result?;
        let slot = index
            .get(&row.strategy_id)
            .copied()
            .ok_or_else(|| LoadError::UnknownStrategy(row.strategy_id.clone()))?;
        loaded[slot].allocations.push(Allocation {
            category: row.category,
            percent: row.percent,
            expected_annual_return: row.expected_annual_return,
        });
    }

    debug!("loaded {} strategies from csv", loaded.len());
    loaded.into_iter().map(validated).collect()
}
