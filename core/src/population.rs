//! Population input — the boundary with the external data loader.
//!
//! RULE: the core never samples Census microdata itself. It consumes a
//! precomputed map of county → seeker-construction records, already
//! stratified to the target county margins, and fail-fast validates it.
//! The synthetic generator at the bottom exists for tools and tests only.

use crate::error::{SimError, SimResult};
use crate::rng::RngBank;
use crate::types::CountyId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Race {
    White,
    Black,
    Hispanic,
    Asian,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationTier {
    LessThanHs,
    HighSchool,
    SomeCollege,
    Bachelors,
    Graduate,
}

/// Fixed demographic state for one seeker. Immutable for the whole run —
/// the simulation models administration, not life-course change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Demographics {
    pub race: Race,
    pub age: u32,
    pub education: EducationTier,
    pub employed: bool,
    /// Annual income in dollars.
    pub income: f64,
    pub has_disability: bool,
    pub has_children: bool,
    pub num_children: u8,
    pub household_size: u8,
}

impl Demographics {
    pub fn monthly_income(&self) -> f64 {
        self.income / 12.0
    }
}

/// One loader-supplied record: everything needed to construct a Seeker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeekerRecord {
    pub demographics: Demographics,
}

/// County → construction records, as delivered by the loader.
pub type PopulationInput = BTreeMap<CountyId, Vec<SeekerRecord>>;

/// Fail-fast validation of loader output against the configured counties.
/// Runs at initialization; a run never starts on bad data.
pub fn validate(population: &PopulationInput, counties: &[CountyId]) -> SimResult<()> {
    for county in counties {
        let records = population.get(county).ok_or_else(|| {
            SimError::DataIntegrity(format!("county '{county}' missing from population input"))
        })?;
        if records.is_empty() {
            return Err(SimError::DataIntegrity(format!(
                "county '{county}' has an empty seeker list"
            )));
        }
        for (i, record) in records.iter().enumerate() {
            let demo = &record.demographics;
            if !demo.income.is_finite() || demo.income < 0.0 {
                return Err(SimError::DataIntegrity(format!(
                    "county '{county}' record {i}: income {} is not a valid dollar amount",
                    demo.income
                )));
            }
            if demo.age < 16 || demo.age > 110 {
                return Err(SimError::DataIntegrity(format!(
                    "county '{county}' record {i}: age {} outside supported range",
                    demo.age
                )));
            }
            if demo.household_size == 0 {
                return Err(SimError::DataIntegrity(format!(
                    "county '{county}' record {i}: household size must be at least 1"
                )));
            }
            if demo.num_children as u16 >= demo.household_size as u16 {
                return Err(SimError::DataIntegrity(format!(
                    "county '{county}' record {i}: {} children cannot fit a household of {}",
                    demo.num_children, demo.household_size
                )));
            }
        }
    }
    Ok(())
}

const SYNTH_RACES: [Race; 4] = [Race::White, Race::Black, Race::Hispanic, Race::Asian];

/// Build a synthetic population without any external data: lognormal
/// income clipped to $10k–$80k, 40% with children, 15% with a disability,
/// race and county assigned round-robin. Deterministic for a given bank.
pub fn synthetic(n_seekers: usize, counties: &[CountyId], bank: &RngBank) -> PopulationInput {
    let mut stream = bank.for_population();
    let mut population: PopulationInput =
        counties.iter().map(|c| (c.clone(), Vec::new())).collect();

    for i in 0..n_seekers {
        let income = stream
            .lognormal((40_000.0f64).ln(), 0.6)
            .clamp(10_000.0, 80_000.0);
        let has_children = stream.chance(0.40);
        let num_children = if has_children {
            1 + stream.next_u64_below(3) as u8
        } else {
            0
        };
        let has_disability = stream.chance(0.15);
        let age = 18 + stream.next_u64_below(60) as u32;
        let education = match stream.next_u64_below(5) {
            0 => EducationTier::LessThanHs,
            1 => EducationTier::HighSchool,
            2 => EducationTier::SomeCollege,
            3 => EducationTier::Bachelors,
            _ => EducationTier::Graduate,
        };
        let employed = stream.chance(0.55);

        let record = SeekerRecord {
            demographics: Demographics {
                race: SYNTH_RACES[i % SYNTH_RACES.len()],
                age,
                education,
                employed,
                income,
                has_disability,
                has_children,
                num_children,
                household_size: 2 + num_children,
            },
        };

        let county = &counties[i % counties.len()];
        population
            .get_mut(county)
            .expect("county inserted above")
            .push(record);
    }

    population
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(income: f64) -> SeekerRecord {
        SeekerRecord {
            demographics: Demographics {
                race: Race::White,
                age: 40,
                education: EducationTier::HighSchool,
                employed: true,
                income,
                has_disability: false,
                has_children: false,
                num_children: 0,
                household_size: 2,
            },
        }
    }

    #[test]
    fn missing_county_fails_fast() {
        let population: PopulationInput =
            [("County_A".to_string(), vec![record(20_000.0)])].into();
        let err = validate(&population, &["County_B".to_string()]).unwrap_err();
        assert!(matches!(err, SimError::DataIntegrity(_)));
    }

    #[test]
    fn nan_income_fails_fast() {
        let population: PopulationInput =
            [("County_A".to_string(), vec![record(f64::NAN)])].into();
        assert!(validate(&population, &["County_A".to_string()]).is_err());
    }

    #[test]
    fn synthetic_population_covers_all_counties() {
        let counties: Vec<CountyId> = vec!["A".into(), "B".into(), "C".into()];
        let bank = RngBank::new(42);
        let population = synthetic(30, &counties, &bank);
        assert_eq!(population.len(), 3);
        assert_eq!(population.values().map(Vec::len).sum::<usize>(), 30);
        assert!(validate(&population, &counties).is_ok());
    }
}
