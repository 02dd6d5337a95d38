//! Reviewer — the escalation processor for one (county, program) team.
//!
//! Runs bounded investigation actions against the seeker's navigation
//! points. This is the single choke point for investigation-driven BNP
//! mutation, and the home of the structural false-positive mechanic: a
//! seeker whose balance goes negative under scrutiny is classified as
//! fraud regardless of ground truth.

use crate::application::{AbandonReason, Application, DenialReason, Outcome};
use crate::bnp;
use crate::config::MechanismConfig;
use crate::error::{SimError, SimResult};
use crate::evaluator::MAX_PENDING_MONTHS;
use crate::program::Program;
use crate::rng::SimStream;
use crate::seeker::Seeker;
use crate::types::{CountyId, Month};

/// Complexity units one reviewer clears per month — fewer than an
/// evaluator's 25; investigation is specialist work.
pub const UNITS_PER_STAFF: f64 = 15.0;

/// Probability an investigation that survives the points check still
/// catches real fraud.
pub const DETECTION_ACCURACY: f64 = 0.85;

const CAPACITY_EPSILON: f64 = 1e-9;

/// Monthly reviewer capacity for a county of the given population.
/// Same staffing ratio as evaluators, lower unit throughput.
pub fn monthly_capacity(population: u64) -> f64 {
    let staff = (population as f64 * crate::evaluator::STAFF_PER_CAPITA)
        .max(crate::evaluator::MIN_STAFF);
    staff * UNITS_PER_STAFF
}

/// The investigation action catalog. Costs are in navigation points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvestigationAction {
    BasicIncomeCheck,
    RequestPayStubs,
    BankStatements,
    EmployerVerification,
    Interview,
    MedicalVerification,
    HouseholdVerification,
    HomeVisit,
}

impl InvestigationAction {
    pub fn base_cost(&self) -> f64 {
        match self {
            InvestigationAction::BasicIncomeCheck => 2.0,
            InvestigationAction::RequestPayStubs => 3.0,
            InvestigationAction::BankStatements => 4.0,
            InvestigationAction::EmployerVerification => 3.0,
            InvestigationAction::Interview => 4.0,
            InvestigationAction::MedicalVerification => 6.0,
            InvestigationAction::HouseholdVerification => 3.0,
            InvestigationAction::HomeVisit => 5.0,
        }
    }
}

/// What one month of reviewer processing produced.
pub struct ReviewerPass {
    pub finalized: Vec<Application>,
    pub aged_out: Vec<Application>,
}

#[derive(Debug)]
pub struct Reviewer {
    pub county: CountyId,
    pub program: Program,
    pub capacity_budget: f64,
    pub capacity_used: f64,
    pub current_month: Month,
    queue: Vec<Application>,

    pub applications_reviewed: u32,
    pub applications_approved: u32,
    pub applications_denied: u32,
    pub fraud_detected: u32,
    /// Honest applications denied as fraud — the disparity engine.
    pub false_positives: u32,

    rng: SimStream,
}

impl Reviewer {
    pub fn new(
        county: CountyId,
        program: Program,
        capacity_budget: f64,
        rng: SimStream,
    ) -> SimResult<Self> {
        if capacity_budget <= 0.0 {
            return Err(SimError::Configuration(format!(
                "reviewer {county}/{program}: non-positive capacity {capacity_budget}"
            )));
        }
        Ok(Self {
            county,
            program,
            capacity_budget,
            capacity_used: 0.0,
            current_month: 0,
            queue: Vec::new(),
            applications_reviewed: 0,
            applications_approved: 0,
            applications_denied: 0,
            fraud_detected: 0,
            false_positives: 0,
            rng,
        })
    }

    pub fn reset_monthly_capacity(&mut self, month: Month) {
        self.current_month = month;
        self.capacity_used = 0.0;
    }

    pub fn intake(&mut self, app: Application) {
        self.queue.push(app);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// One month of escalated-case processing. Same carry-forward and
    /// aging discipline as the evaluator queue.
    pub fn process(
        &mut self,
        month: Month,
        seekers: &mut [Seeker],
        mechanisms: &MechanismConfig,
    ) -> SimResult<ReviewerPass> {
        let mut pass = ReviewerPass { finalized: Vec::new(), aged_out: Vec::new() };

        let mut kept = Vec::with_capacity(self.queue.len());
        for mut app in self.queue.drain(..) {
            if app.months_pending >= MAX_PENDING_MONTHS {
                app.resolve(Outcome::Abandoned { reason: AbandonReason::AgedOut }, month)?;
                pass.aged_out.push(app);
            } else {
                kept.push(app);
            }
        }
        self.queue = kept;

        while let Some(front) = self.queue.first() {
            let complexity = front.complexity;
            if self.capacity_used + complexity > self.capacity_budget {
                break;
            }
            let mut app = self.queue.remove(0);
            self.capacity_used += complexity;

            let seeker = seekers
                .get_mut(app.seeker_id as usize)
                .ok_or_else(|| SimError::StateInvariant {
                    month,
                    detail: format!("application {} references unknown seeker {}", app.id, app.seeker_id),
                })?;

            self.investigate(&mut app, seeker, month, mechanisms)?;
            pass.finalized.push(app);
        }

        for app in &mut self.queue {
            app.months_pending += 1;
        }

        if self.capacity_used > self.capacity_budget + CAPACITY_EPSILON {
            return Err(SimError::StateInvariant {
                month,
                detail: format!(
                    "reviewer {}/{} used {:.3} of {:.3} capacity units",
                    self.county, self.program, self.capacity_used, self.capacity_budget
                ),
            });
        }

        Ok(pass)
    }

    /// Investigate one escalated application to a terminal outcome.
    pub fn investigate(
        &mut self,
        app: &mut Application,
        seeker: &mut Seeker,
        month: Month,
        mechanisms: &MechanismConfig,
    ) -> SimResult<()> {
        self.applications_reviewed += 1;
        app.investigated = true;

        let actions = self.select_actions(app);

        if mechanisms.bureaucracy_points && self.conduct_points_investigation(app, seeker, &actions)
        {
            // Points exhausted mid-investigation. At decision time an
            // honest seeker who ran out of capacity is indistinguishable
            // from a fraudster who could not sustain the lie.
            app.resolve(Outcome::Denied { reason: DenialReason::FraudDetected }, month)?;
            self.applications_denied += 1;
            self.fraud_detected += 1;
            if !app.is_fraud {
                self.false_positives += 1;
                log::debug!(
                    "month={month} reviewer {}/{}: false positive on seeker {} (bnp depleted)",
                    self.county,
                    self.program,
                    seeker.id
                );
            }
            return Ok(());
        }

        // Survived scrutiny (or the points mechanic is ablated): real
        // fraud is still caught stochastically.
        if app.is_fraud && self.rng.chance(DETECTION_ACCURACY) {
            app.resolve(Outcome::Denied { reason: DenialReason::FraudDetected }, month)?;
            self.applications_denied += 1;
            self.fraud_detected += 1;
            return Ok(());
        }

        if app.program.strict_eligibility(
            app.reported_monthly_income(),
            app.reported_household_size,
            app.reported_has_disability,
        ) {
            app.resolve(Outcome::Approved, month)?;
            self.applications_approved += 1;
        } else {
            app.resolve(Outcome::Denied { reason: DenialReason::IncomeTooHigh }, month)?;
            self.applications_denied += 1;
        }
        Ok(())
    }

    /// Deduct each action's cost from the seeker's balance. Returns true
    /// if the balance went negative — investigation over, remaining
    /// actions skipped, balance restored to the zero floor.
    pub fn conduct_points_investigation(
        &mut self,
        app: &Application,
        seeker: &mut Seeker,
        actions: &[InvestigationAction],
    ) -> bool {
        for action in actions {
            seeker.bureaucracy_navigation_points = bnp::investigation_cost(
                seeker.bureaucracy_navigation_points,
                action.base_cost(),
                app.is_fraud,
            );
            if seeker.bureaucracy_navigation_points < 0.0 {
                seeker.bureaucracy_navigation_points = 0.0;
                return true;
            }
        }
        false
    }

    /// Choose investigation actions from suspicion tier, program, and
    /// complexity. Order matters — costs are deducted in this sequence —
    /// and duplicates are removed keeping first occurrence.
    pub fn select_actions(&self, app: &Application) -> Vec<InvestigationAction> {
        use InvestigationAction::*;

        let suspicion = app.suspicion_score.unwrap_or(0.0);
        let mut actions = vec![BasicIncomeCheck];

        if suspicion > 0.5 {
            actions.push(RequestPayStubs);
            actions.push(HouseholdVerification);
        }
        if suspicion > 0.7 {
            actions.push(BankStatements);
            actions.push(Interview);
        }
        if suspicion > 0.85 {
            actions.push(EmployerVerification);
        }

        if app.program == Program::Ssi && app.reported_has_disability {
            actions.push(MedicalVerification);
        }
        if app.program == Program::Tanf {
            actions.push(HouseholdVerification);
        }
        if app.complexity > 0.8 {
            actions.push(HomeVisit);
        }

        let mut unique = Vec::with_capacity(actions.len());
        for action in actions {
            if !unique.contains(&action) {
                unique.push(action);
            }
        }
        unique
    }

    /// Resolve every still-queued escalation as run-end abandoned.
    pub fn drain_unresolved(&mut self, month: Month) -> SimResult<Vec<Application>> {
        let mut flushed = Vec::with_capacity(self.queue.len());
        for mut app in self.queue.drain(..) {
            app.resolve(Outcome::Abandoned { reason: AbandonReason::RunEnded }, month)?;
            flushed.push(app);
        }
        Ok(flushed)
    }

    pub fn false_positive_rate(&self) -> f64 {
        if self.applications_reviewed == 0 {
            return 0.0;
        }
        self.false_positives as f64 / self.applications_reviewed as f64
    }
}
