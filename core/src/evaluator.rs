//! Evaluator — the front-line processor for one (county, program) team.
//!
//! Consumes its pending queue each month up to a complexity-unit budget
//! derived from county population. For each application it either denies
//! on strict eligibility, escalates on suspicion, or approves. Capacity
//! counters are the only mutable state besides the queue, and they are
//! written only inside `process()`.

use crate::application::{AbandonReason, Application, DenialReason, Outcome};
use crate::error::{SimError, SimResult};
use crate::program::Program;
use crate::rng::SimStream;
use crate::sorter::{ApplicationSorter, SeekerSnapshot};
use crate::types::{CountyId, Month, SeekerId};
use std::collections::BTreeMap;

/// Complexity units one staff member clears per month. Calibrated so a
/// 50,000-resident county yields 25 units.
pub const UNITS_PER_STAFF: f64 = 25.0;
/// One staff member per 50,000 residents.
pub const STAFF_PER_CAPITA: f64 = 1.0 / 50_000.0;
/// Very small counties still get a part-time worker.
pub const MIN_STAFF: f64 = 0.5;

/// Months an application may sit unprocessed before the applicant gives up.
pub const MAX_PENDING_MONTHS: u32 = 3;

/// Tolerance for floating-point capacity accounting.
const CAPACITY_EPSILON: f64 = 1e-9;

/// Monthly evaluator capacity for a county of the given population.
pub fn monthly_capacity(population: u64) -> f64 {
    let staff = (population as f64 * STAFF_PER_CAPITA).max(MIN_STAFF);
    staff * UNITS_PER_STAFF
}

/// What one month of evaluator processing produced.
pub struct EvaluatorPass {
    /// Resolved directly: approved or denied.
    pub finalized: Vec<Application>,
    /// Handed to the reviewer, still unresolved.
    pub escalated: Vec<Application>,
    /// Resolved abandoned after aging past the pending limit.
    pub aged_out: Vec<Application>,
}

#[derive(Debug)]
pub struct Evaluator {
    pub county: CountyId,
    pub program: Program,
    /// Suspicion above this hands the case to the reviewer.
    pub escalation_threshold: f64,
    pub capacity_budget: f64,
    pub capacity_used: f64,
    pub current_month: Month,
    queue: Vec<Application>,

    pub applications_processed: u32,
    pub applications_approved: u32,
    pub applications_denied: u32,
    pub applications_escalated: u32,

    rng: SimStream,
}

impl Evaluator {
    pub fn new(
        county: CountyId,
        program: Program,
        escalation_threshold: f64,
        capacity_budget: f64,
        rng: SimStream,
    ) -> SimResult<Self> {
        if capacity_budget <= 0.0 {
            return Err(SimError::Configuration(format!(
                "evaluator {county}/{program}: non-positive capacity {capacity_budget}"
            )));
        }
        Ok(Self {
            county,
            program,
            escalation_threshold,
            capacity_budget,
            capacity_used: 0.0,
            current_month: 0,
            queue: Vec::new(),
            applications_processed: 0,
            applications_approved: 0,
            applications_denied: 0,
            applications_escalated: 0,
            rng,
        })
    }

    pub fn reset_monthly_capacity(&mut self, month: Month) {
        self.current_month = month;
        self.capacity_used = 0.0;
    }

    /// Queue an application for this team. Arrival order is preserved
    /// until a sorter reorders it.
    pub fn intake(&mut self, app: Application) {
        self.queue.push(app);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Let the configured AI sorter reorder the pending queue.
    pub fn reorder(
        &mut self,
        sorter: &mut ApplicationSorter,
        snapshots: &BTreeMap<SeekerId, SeekerSnapshot>,
    ) {
        sorter.sort(&mut self.queue, snapshots);
    }

    /// One month of processing. Pulls queued applications in order while
    /// they fit the remaining budget; the first one that does not fit
    /// stops the pass, and everything behind it carries to next month.
    pub fn process(&mut self, month: Month) -> SimResult<EvaluatorPass> {
        let mut pass = EvaluatorPass {
            finalized: Vec::new(),
            escalated: Vec::new(),
            aged_out: Vec::new(),
        };

        // Applicants whose case sat too long give up before this month's
        // pass begins.
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
            self.applications_processed += 1;

            if !self.program.strict_eligibility(
                app.reported_monthly_income(),
                app.reported_household_size,
                app.reported_has_disability,
            ) {
                app.resolve(Outcome::Denied { reason: DenialReason::IncomeTooHigh }, month)?;
                self.applications_denied += 1;
                pass.finalized.push(app);
                continue;
            }

            let suspicion = self.suspicion_score(&app);
            app.suspicion_score = Some(suspicion);

            if self.should_escalate(&app, suspicion) {
                app.escalated = true;
                self.applications_escalated += 1;
                pass.escalated.push(app);
            } else {
                app.resolve(Outcome::Approved, month)?;
                self.applications_approved += 1;
                pass.finalized.push(app);
            }
        }

        // Everything still queued waited out a whole month.
        for app in &mut self.queue {
            app.months_pending += 1;
        }

        if self.capacity_used > self.capacity_budget + CAPACITY_EPSILON {
            return Err(SimError::StateInvariant {
                month,
                detail: format!(
                    "evaluator {}/{} used {:.3} of {:.3} capacity units",
                    self.county, self.program, self.capacity_used, self.capacity_budget
                ),
            });
        }

        log::debug!(
            "month={month} evaluator {}/{}: processed={} escalated={} carried={}",
            self.county,
            self.program,
            pass.finalized.len() + pass.escalated.len(),
            pass.escalated.len(),
            self.queue.len()
        );

        Ok(pass)
    }

    /// Red-flag heuristics over reported values plus judgment noise.
    /// The model sees only what was reported; true values never enter.
    fn suspicion_score(&mut self, app: &Application) -> f64 {
        let mut score = 0.0;
        let monthly = app.reported_monthly_income();

        // Very low reported income reads as possible underreporting.
        if monthly < 1_000.0 {
            score += 0.3;
        } else if monthly < 2_000.0 {
            score += 0.1;
        }

        // Large households are harder to verify.
        if app.reported_household_size >= 5 {
            score += 0.2;
        }

        // Disability claims carry standing documentation doubts.
        if app.program == Program::Ssi {
            score += 0.3;
        }

        // Complex cases leave more surface for inconsistency.
        score += 0.15 * app.complexity;

        // Evaluator judgment varies; this is the baseline false
        // positive/negative channel.
        score += self.rng.normal(0.0, 0.1);

        score.clamp(0.0, 1.0)
    }

    fn should_escalate(&self, app: &Application, suspicion: f64) -> bool {
        // SSI always needs specialist disability verification.
        suspicion > self.escalation_threshold || app.program == Program::Ssi
    }

    /// Resolve every still-queued application as run-end abandoned.
    /// Called once by the runner after the final month.
    pub fn drain_unresolved(&mut self, month: Month) -> SimResult<Vec<Application>> {
        let mut flushed = Vec::with_capacity(self.queue.len());
        for mut app in self.queue.drain(..) {
            app.resolve(Outcome::Abandoned { reason: AbandonReason::RunEnded }, month)?;
            flushed.push(app);
        }
        Ok(flushed)
    }

    pub fn approval_rate(&self) -> f64 {
        if self.applications_processed == 0 {
            return 0.0;
        }
        self.applications_approved as f64 / self.applications_processed as f64
    }
}
