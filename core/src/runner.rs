//! The simulation runner — the heart of caseload.
//!
//! TICK ORDER (fixed, documented, never reordered):
//!   1. Seeker application generation, in seeded-random seeker order
//!   2. BNP learning for seekers who completed filing steps
//!   3. AI sort of each county-program queue, where a sorter is configured
//!   4. Evaluator pass per team, respecting capacity
//!   5. Reviewer pass per team for escalated applications
//!   6. Outcome write-back onto seekers (inline with phases 4–5)
//!   7. Statistics snapshot (skipped during warm-up)
//!
//! RULES:
//!   - Single-threaded, no overlap between ticks, no suspension within one.
//!   - All randomness flows through the RngBank's derived streams.
//!   - Maps are BTreeMaps; every iteration order is deterministic.
//!   - Capacity counters are written only inside the owning team's phase;
//!     seeker BNP only by the reviewer step and the seeker's learning step.

use crate::application::{AbandonReason, Outcome};
use crate::clock::SimClock;
use crate::config::RunConfig;
use crate::error::{SimError, SimResult};
use crate::evaluator::{self, Evaluator};
use crate::population::{self, PopulationInput};
use crate::program::ALL_PROGRAMS;
use crate::reviewer::{self, Reviewer};
use crate::rng::{RngBank, SimStream};
use crate::seeker::Seeker;
use crate::sorter::{ApplicationSorter, SeekerSnapshot};
use crate::stats::{MonthlyStats, RunResult, Summary};
use crate::types::{CountyId, RunId, SeekerId, TeamKey};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

#[derive(Debug)]
pub struct SimulationRunner {
    run_id: RunId,
    config: RunConfig,
    clock: SimClock,
    scheduling: SimStream,
    seekers: Vec<Seeker>,
    evaluators: BTreeMap<TeamKey, Evaluator>,
    reviewers: BTreeMap<TeamKey, Reviewer>,
    sorters: BTreeMap<CountyId, ApplicationSorter>,
    next_application_id: u64,
    arrival_counter: u64,
    monthly_stats: Vec<MonthlyStats>,
    started_at: DateTime<Utc>,
}

impl SimulationRunner {
    /// Validate configuration and population, build the roster and the
    /// per-team processors. Every failure here happens before month 0.
    pub fn new(run_id: RunId, config: RunConfig, population: PopulationInput) -> SimResult<Self> {
        config.validate()?;
        let county_ids = config.county_ids();
        population::validate(&population, &county_ids)?;

        let bank = RngBank::new(config.random_seed);

        // Roster in county-config order, then record order. A seeker's id
        // is its roster index — the reviewer relies on this to look
        // mutable seekers up by id.
        let mut seekers = Vec::new();
        for county in &county_ids {
            let records = population.get(county).expect("validated above");
            for record in records {
                let id = seekers.len() as SeekerId;
                seekers.push(Seeker::from_record(id, county.clone(), record, &bank));
            }
        }

        let mut evaluators = BTreeMap::new();
        let mut reviewers = BTreeMap::new();
        let mut sorters = BTreeMap::new();
        let sorter_seed = config
            .ai_sorter
            .map(|s| s.random_seed)
            .unwrap_or(config.random_seed);

        for county in &config.counties {
            for program in ALL_PROGRAMS {
                let key: TeamKey = (county.id.clone(), program);
                evaluators.insert(
                    key.clone(),
                    Evaluator::new(
                        county.id.clone(),
                        program,
                        county.escalation_threshold,
                        evaluator::monthly_capacity(county.population),
                        bank.for_team(&county.id, program.stream_index() * 2),
                    )?,
                );
                reviewers.insert(
                    key,
                    Reviewer::new(
                        county.id.clone(),
                        program,
                        reviewer::monthly_capacity(county.population),
                        bank.for_team(&county.id, program.stream_index() * 2 + 1),
                    )?,
                );
            }

            let strategy = county
                .ai_strategy
                .or(config.ai_sorter.map(|s| s.strategy));
            if let Some(strategy) = strategy {
                sorters.insert(county.id.clone(), ApplicationSorter::new(strategy, sorter_seed));
            }
        }

        log::info!(
            "run {run_id}: {} seekers, {} counties, {} warm-up + {} months, seed {}",
            seekers.len(),
            config.counties.len(),
            config.warmup_months,
            config.n_months,
            config.random_seed
        );

        Ok(Self {
            run_id,
            clock: SimClock::new(config.warmup_months, config.n_months),
            scheduling: bank.for_scheduling(),
            seekers,
            evaluators,
            reviewers,
            sorters,
            next_application_id: 0,
            arrival_counter: 0,
            monthly_stats: Vec::new(),
            started_at: Utc::now(),
            config,
        })
    }

    /// Execute every configured month and yield the full run result.
    /// A tick either completes deterministically or the run aborts —
    /// there is no retry.
    pub fn run(mut self) -> SimResult<RunResult> {
        let total = self.clock.total_months();
        for _ in 0..total {
            self.tick()?;
        }
        self.clock.finish();

        let summary = Summary::from_monthly(
            &self.monthly_stats,
            self.seekers.len(),
            self.config.n_months,
            self.config.counties.len(),
        );

        Ok(RunResult {
            run_id: self.run_id,
            started_at: self.started_at,
            seekers: self.seekers,
            evaluators: self.evaluators,
            reviewers: self.reviewers,
            monthly_stats: self.monthly_stats,
            summary,
        })
    }

    /// One simulated month.
    fn tick(&mut self) -> SimResult<()> {
        let month = self.clock.advance();
        let mechanisms = self.config.mechanisms;

        for evaluator in self.evaluators.values_mut() {
            evaluator.reset_monthly_capacity(month);
        }
        for reviewer in self.reviewers.values_mut() {
            reviewer.reset_monthly_capacity(month);
        }

        let mut stats = MonthlyStats::new(month);

        // Phase 1: application generation. The iteration order is drawn
        // from the scheduling stream — within a tick, earlier seekers
        // consume capacity later ones cannot.
        let mut order: Vec<usize> = (0..self.seekers.len()).collect();
        self.scheduling.shuffle(&mut order);

        let mut completed_steps: Vec<usize> = Vec::new();
        for idx in order {
            for program in ALL_PROGRAMS {
                let seeker = &mut self.seekers[idx];
                let Some(kind) = seeker.decide_to_apply(program, month, &mechanisms) else {
                    continue;
                };

                let id = self.next_application_id;
                self.next_application_id += 1;
                let seq = self.arrival_counter;
                self.arrival_counter += 1;

                let mut app = seeker.create_application(program, month, kind, id, seq);
                stats.count_submission(&app);

                if seeker.attempt_filing_step(&mechanisms) {
                    completed_steps.push(idx);
                    let key: TeamKey = (seeker.county.clone(), program);
                    let evaluator =
                        self.evaluators.get_mut(&key).ok_or_else(|| SimError::StateInvariant {
                            month,
                            detail: format!("no evaluator for {}/{program}", key.0),
                        })?;
                    evaluator.intake(app);
                } else {
                    // Depleted capacity: the paperwork never gets filed.
                    app.resolve(
                        Outcome::Abandoned { reason: AbandonReason::FilingStepFailed },
                        month,
                    )?;
                    stats.record_resolution(&app);
                    self.seekers[idx].record_outcome(app, month, &mechanisms);
                }
            }
        }

        // Phase 2: learning gains for every completed step.
        if mechanisms.learning {
            for idx in &completed_steps {
                self.seekers[*idx].apply_step_learning();
            }
        }

        // Phase 3: AI reordering, one sorter per configured county.
        let snapshots: BTreeMap<SeekerId, SeekerSnapshot> =
            self.seekers.iter().map(|s| (s.id, s.snapshot())).collect();
        for ((county, _), evaluator) in self.evaluators.iter_mut() {
            if let Some(sorter) = self.sorters.get_mut(county) {
                evaluator.reorder(sorter, &snapshots);
            }
        }

        // Phase 4: evaluator pass, teams in key order.
        for (key, evaluator) in self.evaluators.iter_mut() {
            let pass = evaluator.process(month)?;
            for app in pass.finalized.into_iter().chain(pass.aged_out) {
                stats.record_resolution(&app);
                self.seekers[app.seeker_id as usize].record_outcome(app, month, &mechanisms);
            }
            for app in pass.escalated {
                stats.applications_escalated += 1;
                let reviewer =
                    self.reviewers.get_mut(key).ok_or_else(|| SimError::StateInvariant {
                        month,
                        detail: format!("no reviewer for {}/{}", key.0, key.1),
                    })?;
                reviewer.intake(app);
            }
        }

        // Phase 5: reviewer pass. All investigation-driven BNP mutation
        // happens inside these calls.
        for reviewer in self.reviewers.values_mut() {
            let pass = reviewer.process(month, &mut self.seekers, &mechanisms)?;
            for app in pass.finalized.into_iter().chain(pass.aged_out) {
                stats.record_resolution(&app);
                self.seekers[app.seeker_id as usize].record_outcome(app, month, &mechanisms);
            }
        }

        // Final month: flush every still-queued application so the run
        // ends with no unresolved state.
        if month + 1 == self.clock.total_months() {
            for evaluator in self.evaluators.values_mut() {
                for app in evaluator.drain_unresolved(month)? {
                    stats.record_resolution(&app);
                    self.seekers[app.seeker_id as usize].record_outcome(app, month, &mechanisms);
                }
            }
            for reviewer in self.reviewers.values_mut() {
                for app in reviewer.drain_unresolved(month)? {
                    stats.record_resolution(&app);
                    self.seekers[app.seeker_id as usize].record_outcome(app, month, &mechanisms);
                }
            }
        }

        stats.applications_carried_over = (self
            .evaluators
            .values()
            .map(|e| e.pending())
            .sum::<usize>()
            + self.reviewers.values().map(|r| r.pending()).sum::<usize>())
            as u32;

        // Phase 7: snapshot. Warm-up months execute everything above but
        // are excluded from collection.
        if self.clock.collecting() {
            self.monthly_stats.push(stats);
        }

        Ok(())
    }
}
