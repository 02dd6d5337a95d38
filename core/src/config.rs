//! Run configuration and fail-fast validation.
//!
//! RULE: every configuration defect is caught here, before the first
//! month executes. Nothing inside a tick parses a tag or discovers a
//! zero-population county.

use crate::error::{SimError, SimResult};
use crate::sorter::SortStrategy;
use crate::types::{CountyId, Month};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Suspicion level above which an evaluator hands a case to its reviewer.
fn default_escalation_threshold() -> f64 {
    0.8
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountyConfig {
    pub id: CountyId,
    /// Total county population. Drives evaluator and reviewer capacity.
    pub population: u64,
    #[serde(default = "default_escalation_threshold")]
    pub escalation_threshold: f64,
    /// Per-county override of the run-level sorter strategy.
    #[serde(default)]
    pub ai_strategy: Option<SortStrategy>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SorterConfig {
    pub strategy: SortStrategy,
    pub random_seed: u64,
}

/// Toggles for the theoretical mechanisms, for ablation experiments.
/// The full model is the default; switching one off removes that
/// mechanism's contribution without disturbing the others' RNG streams.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MechanismConfig {
    /// Investigations spend seeker navigation points; depletion is
    /// classified as fraud. Off: purely stochastic detection, no spend.
    pub bureaucracy_points: bool,
    /// Seekers update approval beliefs from outcomes and gain navigation
    /// points from completed steps.
    pub learning: bool,
    /// Three detected frauds bar a seeker from further applications.
    pub fraud_history: bool,
}

impl MechanismConfig {
    pub fn full_model() -> Self {
        Self { bureaucracy_points: true, learning: true, fraud_history: true }
    }

    /// All mechanisms off — isolates the pure queueing/capacity effect.
    pub fn baseline() -> Self {
        Self { bureaucracy_points: false, learning: false, fraud_history: false }
    }
}

impl Default for MechanismConfig {
    fn default() -> Self {
        Self::full_model()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub counties: Vec<CountyConfig>,
    pub n_months: Month,
    /// Months executed before statistics collection begins.
    #[serde(default)]
    pub warmup_months: Month,
    /// Run-level sorter; counties may override the strategy.
    #[serde(default)]
    pub ai_sorter: Option<SorterConfig>,
    pub random_seed: u64,
    #[serde(default)]
    pub mechanisms: MechanismConfig,
}

impl RunConfig {
    /// Minimal config used by tests and the headless runner.
    pub fn default_test(counties: &[(&str, u64)], n_months: Month, random_seed: u64) -> Self {
        Self {
            counties: counties
                .iter()
                .map(|(id, population)| CountyConfig {
                    id: (*id).to_string(),
                    population: *population,
                    escalation_threshold: default_escalation_threshold(),
                    ai_strategy: None,
                })
                .collect(),
            n_months,
            warmup_months: 0,
            ai_sorter: None,
            random_seed,
            mechanisms: MechanismConfig::full_model(),
        }
    }

    pub fn county_ids(&self) -> Vec<CountyId> {
        self.counties.iter().map(|c| c.id.clone()).collect()
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.n_months == 0 {
            return Err(SimError::Configuration("n_months must be positive".into()));
        }
        if self.counties.is_empty() {
            return Err(SimError::Configuration("at least one county is required".into()));
        }

        let mut seen = BTreeSet::new();
        for county in &self.counties {
            if county.id.trim().is_empty() {
                return Err(SimError::Configuration("county id must be non-empty".into()));
            }
            if !seen.insert(county.id.clone()) {
                return Err(SimError::Configuration(format!(
                    "duplicate county '{}'",
                    county.id
                )));
            }
            if county.population == 0 {
                return Err(SimError::Configuration(format!(
                    "county '{}' has zero population",
                    county.id
                )));
            }
            if !(0.0..=1.0).contains(&county.escalation_threshold)
                || county.escalation_threshold == 0.0
            {
                return Err(SimError::Configuration(format!(
                    "county '{}': escalation threshold {} outside (0, 1]",
                    county.id, county.escalation_threshold
                )));
            }
        }
        Ok(())
    }
}
