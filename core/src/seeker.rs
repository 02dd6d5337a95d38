//! Seeker agent — one simulated applicant.
//!
//! Owns its demographics (fixed for the run), behavioral propensities
//! (drawn once from its private RNG stream), a mutable navigation-point
//! balance, per-program enrollment and belief state, and the history of
//! its resolved applications.
//!
//! RULES:
//!   - A seeker's BNP is written in exactly two places: its own learning
//!     step (here) and the reviewer's investigation step. Never elsewhere.
//!   - All of a seeker's randomness comes from its own stream; processing
//!     order cannot change another seeker's draws.

use crate::application::Application;
use crate::bnp;
use crate::config::MechanismConfig;
use crate::population::{Demographics, SeekerRecord};
use crate::program::Program;
use crate::rng::{RngBank, SimStream};
use crate::sorter::SeekerSnapshot;
use crate::types::{ApplicationId, CountyId, Month, SeekerId};
use std::collections::BTreeMap;

/// Seekers start optimistic about their chances.
const INITIAL_BELIEF: f64 = 0.70;
/// Exponential belief-update rate.
const BELIEF_LEARNING_RATE: f64 = 0.30;
/// Perceived approval probability below which a seeker stops applying —
/// the discouraged-worker gate.
const APPLICATION_THRESHOLD: f64 = 0.25;
/// Detected frauds before a seeker is barred from applying.
const FRAUD_BAN_STRIKES: u32 = 3;

/// Whether an application renews an enrollment or opens a new case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyKind {
    New,
    Recertification,
}

#[derive(Debug)]
pub struct Seeker {
    pub id: SeekerId,
    pub county: CountyId,
    pub demographics: Demographics,

    /// Uniform [0, 2). Above 1.0 reads as high fraud risk.
    pub fraud_propensity: f64,
    /// Uniform [0, 2). Above 1.0 reads as high error risk.
    pub error_propensity: f64,
    /// Fraction of income hidden when committing fraud, uniform [0, 1).
    pub lie_magnitude: f64,
    /// Fractional misstatement on an honest error, uniform [0, 0.20).
    pub error_magnitude: f64,
    /// Chance an eligible, willing seeker actually files, uniform [0.70, 1).
    pub apply_propensity: f64,

    pub bureaucracy_navigation_points: f64,

    /// program → month of last approval.
    enrolled: BTreeMap<Program, Month>,
    /// program → perceived approval probability.
    beliefs: BTreeMap<Program, f64>,

    pub num_applications: u32,
    pub num_approvals: u32,
    pub num_denials: u32,
    pub num_abandonments: u32,
    pub num_investigations: u32,
    pub num_fraud_detections: u32,

    /// Resolved applications, retained for reporting.
    pub history: Vec<Application>,

    rng: SimStream,
}

impl Seeker {
    /// Construct from a loader record. Draw order is fixed — reordering
    /// it changes every downstream decision for this seeker.
    pub fn from_record(id: SeekerId, county: CountyId, record: &SeekerRecord, bank: &RngBank) -> Self {
        let mut rng = bank.for_seeker(id);
        let fraud_propensity = rng.uniform(0.0, 2.0);
        let lie_magnitude = rng.uniform(0.0, 1.0);
        let error_propensity = rng.uniform(0.0, 2.0);
        let error_magnitude = rng.uniform(0.0, 0.20);
        let apply_propensity = rng.uniform(0.70, 1.0);
        let points = bnp::initial_points(&record.demographics, fraud_propensity, &mut rng);

        let beliefs = crate::program::ALL_PROGRAMS
            .iter()
            .map(|p| (*p, INITIAL_BELIEF))
            .collect();

        Self {
            id,
            county,
            demographics: record.demographics.clone(),
            fraud_propensity,
            error_propensity,
            lie_magnitude,
            error_magnitude,
            apply_propensity,
            bureaucracy_navigation_points: points,
            enrolled: BTreeMap::new(),
            beliefs,
            num_applications: 0,
            num_approvals: 0,
            num_denials: 0,
            num_abandonments: 0,
            num_investigations: 0,
            num_fraud_detections: 0,
            history: Vec::new(),
            rng,
        }
    }

    pub fn is_enrolled(&self, program: Program) -> bool {
        self.enrolled.contains_key(&program)
    }

    pub fn perceived_approval(&self, program: Program) -> f64 {
        self.beliefs.get(&program).copied().unwrap_or(INITIAL_BELIEF)
    }

    pub fn is_banned(&self, mechanisms: &MechanismConfig) -> bool {
        mechanisms.fraud_history && self.num_fraud_detections >= FRAUD_BAN_STRIKES
    }

    /// Decide whether to file for `program` this month.
    ///
    /// Gates, in order: fraud ban, current enrollment (with recert-due
    /// expiry), income self-screen, discouragement, and the per-seeker
    /// propensity roll. Deterministic given the seeker's stream.
    pub fn decide_to_apply(
        &mut self,
        program: Program,
        month: Month,
        mechanisms: &MechanismConfig,
    ) -> Option<ApplyKind> {
        if self.is_banned(mechanisms) {
            return None;
        }

        let mut kind = ApplyKind::New;
        if let Some(&approved_month) = self.enrolled.get(&program) {
            if month.saturating_sub(approved_month) >= program.recert_interval() {
                // Certification expired — must reapply to stay enrolled.
                self.enrolled.remove(&program);
                kind = ApplyKind::Recertification;
            } else {
                return None;
            }
        }

        let demo = &self.demographics;
        if !program.self_screen(demo.monthly_income(), demo.has_children, demo.has_disability) {
            return None;
        }

        if mechanisms.learning && self.perceived_approval(program) < APPLICATION_THRESHOLD {
            return None;
        }

        if !self.rng.chance(self.apply_propensity) {
            return None;
        }

        Some(kind)
    }

    /// Build the application: draw fraud/error, derive reported values,
    /// score complexity. Increments the application counter.
    pub fn create_application(
        &mut self,
        program: Program,
        month: Month,
        kind: ApplyKind,
        id: ApplicationId,
        arrival_seq: u64,
    ) -> Application {
        let is_fraud = self.rng.chance(self.fraud_propensity / 4.0);
        // Fraud takes precedence — a deliberate lie is not also a mistake.
        let is_error = !is_fraud && self.rng.chance(self.error_propensity * 0.075);

        let true_income = self.demographics.income;
        let reported_income = if is_fraud {
            true_income * (1.0 - self.lie_magnitude)
        } else if is_error {
            // Honest errors cut both ways.
            if self.rng.chance(0.5) {
                true_income * (1.0 - self.error_magnitude)
            } else {
                true_income * (1.0 + self.error_magnitude)
            }
        } else {
            true_income
        };

        let complexity = self.complexity_for(program, kind);
        self.num_applications += 1;

        Application::new(
            id,
            self.id,
            self.county.clone(),
            program,
            month,
            kind == ApplyKind::Recertification,
            reported_income,
            self.demographics.household_size,
            self.demographics.has_disability,
            true_income,
            self.demographics.household_size,
            self.demographics.has_disability,
            is_fraud,
            is_error,
            complexity,
            arrival_seq,
        )
    }

    /// Difficulty of processing this application, before range clipping.
    fn complexity_for(&self, program: Program, kind: ApplyKind) -> f64 {
        let demo = &self.demographics;
        let mut complexity = program.base_complexity();

        // Every extra household member is more verification, capped.
        complexity += ((demo.household_size.saturating_sub(1)) as f64 * 0.05).min(0.15);
        // Each child needs documentation, capped.
        complexity += (demo.num_children as f64 * 0.03).min(0.10);
        // Medical documentation.
        if demo.has_disability {
            complexity += 0.20;
        }
        // A fresh case means full paperwork; recertifications reuse records.
        if kind == ApplyKind::New {
            complexity += 0.15;
        }
        // Elderly applicants trigger additional program rules.
        if demo.age >= 65 {
            complexity += 0.10;
        }

        complexity
    }

    /// Roll the filing step. A depleted seeker (BNP ≤ 0) never succeeds;
    /// with bureaucracy points disabled the step always succeeds.
    pub fn attempt_filing_step(&mut self, mechanisms: &MechanismConfig) -> bool {
        if !mechanisms.bureaucracy_points {
            return true;
        }
        let p = bnp::step_success_probability(self.bureaucracy_navigation_points);
        self.rng.chance(p)
    }

    /// The seeker's own learning step — the only BNP write outside the
    /// reviewer. Called by the runner for seekers who completed steps.
    pub fn apply_step_learning(&mut self) {
        self.bureaucracy_navigation_points =
            bnp::learning_gain(self.bureaucracy_navigation_points, bnp::LEARNING_GAIN);
    }

    /// Consume a resolved application: update counters, enrollment, and
    /// beliefs, then retain the application in history.
    pub fn record_outcome(&mut self, app: Application, month: Month, mechanisms: &MechanismConfig) {
        use crate::application::{DenialReason, Outcome};

        match app.outcome() {
            Some(Outcome::Approved) => {
                self.num_approvals += 1;
                self.enrolled.insert(app.program, month);
                if mechanisms.learning {
                    self.update_belief(app.program, 1.0);
                }
            }
            Some(Outcome::Denied { reason }) => {
                self.num_denials += 1;
                if reason == DenialReason::FraudDetected {
                    self.num_fraud_detections += 1;
                }
                if mechanisms.learning {
                    self.update_belief(app.program, 0.0);
                }
            }
            Some(Outcome::Abandoned { .. }) => {
                // No administrative decision was experienced; beliefs hold.
                self.num_abandonments += 1;
            }
            None => unreachable!("record_outcome requires a resolved application"),
        }

        if app.investigated {
            self.num_investigations += 1;
        }

        self.history.push(app);
    }

    fn update_belief(&mut self, program: Program, signal: f64) {
        let belief = self.beliefs.entry(program).or_insert(INITIAL_BELIEF);
        *belief += BELIEF_LEARNING_RATE * (signal - *belief);
    }

    /// Read-only view for sorter strategies.
    pub fn snapshot(&self) -> SeekerSnapshot {
        SeekerSnapshot {
            income: self.demographics.income,
            bnp: self.bureaucracy_navigation_points,
            employed: self.demographics.employed,
        }
    }
}
