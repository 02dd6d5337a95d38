//! Application — one benefit request for one program in one month.
//!
//! Carries both what the seeker reported and the ground truth, which only
//! the simulation sees. Exactly one terminal outcome per application:
//! approved XOR denied XOR abandoned, enforced by the `resolve()` choke
//! point — a second resolution is a `StateInvariant` failure, never a
//! silent overwrite.

use crate::error::{SimError, SimResult};
use crate::program::Program;
use crate::types::{ApplicationId, CountyId, Month, SeekerId};
use serde::{Deserialize, Serialize};

/// Complexity is clipped to this closed range; one unit of complexity
/// consumes one capacity unit of evaluator/reviewer throughput.
pub const COMPLEXITY_MIN: f64 = 0.30;
pub const COMPLEXITY_MAX: f64 = 1.00;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    IncomeTooHigh,
    FraudDetected,
    FailedVerification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbandonReason {
    /// The seeker could not complete the filing step (depleted BNP).
    FilingStepFailed,
    /// Carried forward past the pending-age limit; the applicant gave up.
    AgedOut,
    /// Still queued when the run ended.
    RunEnded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Approved,
    Denied { reason: DenialReason },
    Abandoned { reason: AbandonReason },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub seeker_id: SeekerId,
    pub county: CountyId,
    pub program: Program,
    pub month_submitted: Month,
    pub is_recertification: bool,

    // What the seeker claims.
    pub reported_income: f64,
    pub reported_household_size: u8,
    pub reported_has_disability: bool,

    // Ground truth, invisible to evaluators and reviewers.
    pub true_income: f64,
    pub true_household_size: u8,
    pub true_has_disability: bool,

    /// Intentional misreporting. Drawn once at creation.
    pub is_fraud: bool,
    /// Honest mistake. Mutually exclusive with fraud; fraud wins the draw.
    pub is_error: bool,

    /// Difficulty score in [COMPLEXITY_MIN, COMPLEXITY_MAX].
    pub complexity: f64,

    /// Run-global intake counter; the stable tie-break for every sorter.
    pub arrival_seq: u64,

    // Processing results, written by the evaluator/reviewer pipeline.
    pub suspicion_score: Option<f64>,
    pub escalated: bool,
    pub investigated: bool,
    /// Whole months this application has sat in a queue without being
    /// processed. Drives carry-forward aging.
    pub months_pending: u32,

    outcome: Option<Outcome>,
    pub month_resolved: Option<Month>,
}

impl Application {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ApplicationId,
        seeker_id: SeekerId,
        county: CountyId,
        program: Program,
        month: Month,
        is_recertification: bool,
        reported_income: f64,
        reported_household_size: u8,
        reported_has_disability: bool,
        true_income: f64,
        true_household_size: u8,
        true_has_disability: bool,
        is_fraud: bool,
        is_error: bool,
        complexity: f64,
        arrival_seq: u64,
    ) -> Self {
        Self {
            id,
            seeker_id,
            county,
            program,
            month_submitted: month,
            is_recertification,
            reported_income,
            reported_household_size,
            reported_has_disability,
            true_income,
            true_household_size,
            true_has_disability,
            is_fraud,
            is_error,
            complexity: complexity.clamp(COMPLEXITY_MIN, COMPLEXITY_MAX),
            arrival_seq,
            suspicion_score: None,
            escalated: false,
            investigated: false,
            months_pending: 0,
            outcome: None,
            month_resolved: None,
        }
    }

    pub fn reported_monthly_income(&self) -> f64 {
        self.reported_income / 12.0
    }

    /// Dollar gap between truth and claim; positive when underreporting.
    pub fn income_discrepancy(&self) -> f64 {
        self.true_income - self.reported_income
    }

    /// The single write point for terminal outcomes.
    pub fn resolve(&mut self, outcome: Outcome, month: Month) -> SimResult<()> {
        if let Some(existing) = self.outcome {
            return Err(SimError::StateInvariant {
                month,
                detail: format!(
                    "application {} already resolved as {existing:?}, second resolution {outcome:?}",
                    self.id
                ),
            });
        }
        self.outcome = Some(outcome);
        self.month_resolved = Some(month);
        Ok(())
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_resolved(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn approved(&self) -> bool {
        matches!(self.outcome, Some(Outcome::Approved))
    }

    pub fn denied(&self) -> bool {
        matches!(self.outcome, Some(Outcome::Denied { .. }))
    }

    pub fn abandoned(&self) -> bool {
        matches!(self.outcome, Some(Outcome::Abandoned { .. }))
    }
}
