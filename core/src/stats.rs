//! Aggregate statistics — the per-month snapshot and the run summary.
//!
//! These are the determinism-bearing outputs: two runs with identical
//! configuration and seed must produce equal `monthly_stats` and
//! `summary`. Wall-clock metadata therefore lives on `RunResult`, never
//! inside these records.

use crate::application::{Application, DenialReason, Outcome};
use crate::evaluator::Evaluator;
use crate::reviewer::Reviewer;
use crate::seeker::Seeker;
use crate::types::{Month, RunId, TeamKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyStats {
    pub month: Month,
    pub applications_submitted: u32,
    /// Terminal outcomes recorded this month, including applications
    /// submitted in earlier months and resolved now.
    pub applications_approved: u32,
    pub applications_denied: u32,
    pub applications_abandoned: u32,
    pub applications_escalated: u32,
    pub applications_investigated: u32,
    /// Still queued across all teams at month end.
    pub applications_carried_over: u32,
    pub fraud_attempted: u32,
    pub errors_made: u32,
    pub honest_applications: u32,
    pub fraud_detected: u32,
    /// Honest applications denied as fraud after BNP depletion.
    pub false_positive_fraud_flags: u32,
}

impl MonthlyStats {
    pub fn new(month: Month) -> Self {
        Self {
            month,
            applications_submitted: 0,
            applications_approved: 0,
            applications_denied: 0,
            applications_abandoned: 0,
            applications_escalated: 0,
            applications_investigated: 0,
            applications_carried_over: 0,
            fraud_attempted: 0,
            errors_made: 0,
            honest_applications: 0,
            fraud_detected: 0,
            false_positive_fraud_flags: 0,
        }
    }

    pub fn count_submission(&mut self, app: &Application) {
        self.applications_submitted += 1;
        if app.is_fraud {
            self.fraud_attempted += 1;
        } else if app.is_error {
            self.errors_made += 1;
        } else {
            self.honest_applications += 1;
        }
    }

    pub fn record_resolution(&mut self, app: &Application) {
        match app.outcome() {
            Some(Outcome::Approved) => self.applications_approved += 1,
            Some(Outcome::Denied { reason }) => {
                self.applications_denied += 1;
                if reason == DenialReason::FraudDetected {
                    self.fraud_detected += 1;
                    if !app.is_fraud {
                        self.false_positive_fraud_flags += 1;
                    }
                }
            }
            Some(Outcome::Abandoned { .. }) => self.applications_abandoned += 1,
            None => {}
        }
        if app.investigated {
            self.applications_investigated += 1;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_seekers: usize,
    pub total_months: Month,
    pub total_counties: usize,
    pub total_applications: u32,
    pub total_approvals: u32,
    pub total_denials: u32,
    pub total_abandonments: u32,
    pub total_investigations: u32,
    pub approval_rate: f64,
    pub investigation_rate: f64,
    pub false_positive_fraud_flags: u32,
}

impl Summary {
    /// Aggregate over the collected (post-warm-up) months.
    pub fn from_monthly(
        monthly: &[MonthlyStats],
        total_seekers: usize,
        total_months: Month,
        total_counties: usize,
    ) -> Self {
        let total_applications: u32 = monthly.iter().map(|m| m.applications_submitted).sum();
        let total_approvals: u32 = monthly.iter().map(|m| m.applications_approved).sum();
        let total_denials: u32 = monthly.iter().map(|m| m.applications_denied).sum();
        let total_abandonments: u32 = monthly.iter().map(|m| m.applications_abandoned).sum();
        let total_investigations: u32 = monthly.iter().map(|m| m.applications_investigated).sum();
        let false_positive_fraud_flags: u32 =
            monthly.iter().map(|m| m.false_positive_fraud_flags).sum();

        let (approval_rate, investigation_rate) = if total_applications > 0 {
            (
                total_approvals as f64 / total_applications as f64,
                total_investigations as f64 / total_applications as f64,
            )
        } else {
            (0.0, 0.0)
        };

        Self {
            total_seekers,
            total_months,
            total_counties,
            total_applications,
            total_approvals,
            total_denials,
            total_abandonments,
            total_investigations,
            approval_rate,
            investigation_rate,
            false_positive_fraud_flags,
        }
    }
}

/// Everything a finished run hands to reporting and analysis.
pub struct RunResult {
    pub run_id: RunId,
    /// Wall-clock metadata only — never part of deterministic output.
    pub started_at: DateTime<Utc>,
    pub seekers: Vec<Seeker>,
    pub evaluators: BTreeMap<TeamKey, Evaluator>,
    pub reviewers: BTreeMap<TeamKey, Reviewer>,
    pub monthly_stats: Vec<MonthlyStats>,
    pub summary: Summary,
}
