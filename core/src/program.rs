//! The closed set of benefit programs the simulation administers.
//!
//! Program-level constants — base complexity, recertification interval,
//! eligibility thresholds — live here so no other module hardcodes them.

use crate::error::SimError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Monthly income ceiling a seeker uses to self-screen for SNAP.
const SNAP_SELF_SCREEN_MONTHLY: f64 = 2_500.0;
/// Monthly income ceiling a seeker uses to self-screen for TANF.
const TANF_SELF_SCREEN_MONTHLY: f64 = 1_000.0;
/// Monthly income ceiling for SSI, shared by self-screen and strict check.
const SSI_INCOME_MONTHLY: f64 = 1_913.0;

/// Per-household-member monthly thresholds for the strict eligibility
/// check evaluators run against *reported* values.
const SNAP_STRICT_PER_MEMBER: f64 = 1_250.0;
const TANF_STRICT_PER_MEMBER: f64 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Program {
    Snap,
    Tanf,
    Ssi,
}

/// Fixed processing order wherever "all programs" are iterated.
pub const ALL_PROGRAMS: [Program; 3] = [Program::Snap, Program::Tanf, Program::Ssi];

impl Program {
    /// Base complexity contribution: SNAP is the simplest (income and
    /// household only), SSI the most complex (disability verification).
    pub fn base_complexity(&self) -> f64 {
        match self {
            Program::Snap => 0.30,
            Program::Tanf => 0.50,
            Program::Ssi => 0.70,
        }
    }

    /// Months between mandatory recertifications while enrolled.
    pub fn recert_interval(&self) -> u32 {
        match self {
            Program::Snap => 6,
            Program::Tanf => 12,
            Program::Ssi => 36,
        }
    }

    /// Seeker-side screening: would this person bother applying?
    /// Coarser than the strict check — applicants do not know the
    /// per-member thresholds caseworkers apply.
    pub fn self_screen(&self, monthly_income: f64, has_children: bool, has_disability: bool) -> bool {
        match self {
            Program::Snap => monthly_income < SNAP_SELF_SCREEN_MONTHLY,
            Program::Tanf => monthly_income < TANF_SELF_SCREEN_MONTHLY && has_children,
            Program::Ssi => monthly_income < SSI_INCOME_MONTHLY && has_disability,
        }
    }

    /// Strict eligibility against *reported* values. This is the check an
    /// evaluator finalizes on; fraudulently underreported income passes it.
    pub fn strict_eligibility(
        &self,
        reported_monthly_income: f64,
        reported_household_size: u8,
        reported_has_disability: bool,
    ) -> bool {
        match self {
            Program::Snap => {
                reported_monthly_income < SNAP_STRICT_PER_MEMBER * reported_household_size as f64
            }
            Program::Tanf => {
                reported_monthly_income < TANF_STRICT_PER_MEMBER * reported_household_size as f64
            }
            Program::Ssi => reported_has_disability && reported_monthly_income < SSI_INCOME_MONTHLY,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Program::Snap => "SNAP",
            Program::Tanf => "TANF",
            Program::Ssi => "SSI",
        }
    }

    /// Stable index used for RNG stream derivation. Append-only.
    pub fn stream_index(&self) -> u64 {
        match self {
            Program::Snap => 0,
            Program::Tanf => 1,
            Program::Ssi => 2,
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Program {
    type Err = SimError;

    /// Unknown tags are rejected here, at construction time — never at
    /// first use inside a tick.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SNAP" => Ok(Program::Snap),
            "TANF" => Ok(Program::Tanf),
            "SSI" => Ok(Program::Ssi),
            other => Err(SimError::Configuration(format!(
                "unknown program type '{other}' (expected SNAP, TANF, or SSI)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_program_is_rejected() {
        assert!("WIC".parse::<Program>().is_err());
        assert_eq!("SNAP".parse::<Program>().unwrap(), Program::Snap);
    }

    #[test]
    fn ssi_requires_disability() {
        assert!(!Program::Ssi.self_screen(500.0, false, false));
        assert!(Program::Ssi.self_screen(500.0, false, true));
        assert!(!Program::Ssi.strict_eligibility(500.0, 1, false));
    }
}
