//! Evaluator capacity: population-derived budgets, the monthly
//! consumption invariant, resets, and carry-forward with aging.

use caseload_core::{
    application::Application,
    evaluator::{self, Evaluator},
    program::Program,
    reviewer,
    rng::RngBank,
};

fn team_rng(seed: u64) -> caseload_core::rng::SimStream {
    RngBank::new(seed).for_team("County_A", 0)
}

fn snap_app(id: u64, complexity: f64) -> Application {
    // Reported monthly income $2,000 against a $2,500 SNAP threshold for
    // a household of two: eligible, and below every suspicion red flag.
    Application::new(
        id,
        0,
        "County_A".into(),
        Program::Snap,
        0,
        false,
        24_000.0,
        2,
        false,
        24_000.0,
        2,
        false,
        false,
        false,
        complexity,
        id,
    )
}

fn evaluator_with_budget(budget: f64) -> Evaluator {
    Evaluator::new("County_A".into(), Program::Snap, 0.8, budget, team_rng(42)).unwrap()
}

#[test]
fn capacity_scales_with_county_population() {
    // 50,000 residents → 1 staff → 25 units/month.
    assert_eq!(evaluator::monthly_capacity(50_000), 25.0);
    // 500,000 residents → 10 staff → 250 units/month.
    assert_eq!(evaluator::monthly_capacity(500_000), 250.0);
    // Tiny counties keep a part-time worker.
    assert_eq!(evaluator::monthly_capacity(1_000), 0.5 * 25.0);
    // Reviewers: specialists clear fewer units at the same staffing ratio.
    assert_eq!(reviewer::monthly_capacity(50_000), 15.0);
}

#[test]
fn thirty_simple_snap_applications_fit_one_month_with_room_to_spare() {
    let mut evaluator = evaluator_with_budget(evaluator::monthly_capacity(50_000));
    for i in 0..30 {
        evaluator.intake(snap_app(i, 0.30));
    }
    evaluator.reset_monthly_capacity(0);
    let pass = evaluator.process(0).unwrap();

    assert_eq!(pass.finalized.len() + pass.escalated.len(), 30);
    assert_eq!(evaluator.pending(), 0);
    // 30 × 0.30 = 9.0 of 25.0 units used; 16 to spare.
    assert!((evaluator.capacity_used - 9.0).abs() < 1e-9);
    assert!((evaluator.capacity_budget - evaluator.capacity_used - 16.0).abs() < 1e-9);
}

#[test]
fn consumption_never_exceeds_the_budget() {
    let mut evaluator = evaluator_with_budget(5.0);
    for i in 0..40 {
        evaluator.intake(snap_app(i, 0.45));
    }
    evaluator.reset_monthly_capacity(0);
    evaluator.process(0).unwrap();
    assert!(evaluator.capacity_used <= evaluator.capacity_budget + 1e-9);
}

#[test]
fn capacity_resets_at_the_start_of_the_next_month() {
    let mut evaluator = evaluator_with_budget(25.0);
    for i in 0..10 {
        evaluator.intake(snap_app(i, 0.50));
    }
    evaluator.reset_monthly_capacity(0);
    evaluator.process(0).unwrap();
    assert!(evaluator.capacity_used > 0.0);

    evaluator.reset_monthly_capacity(1);
    assert_eq!(evaluator.capacity_used, 0.0);
}

#[test]
fn overflow_carries_to_the_next_month_not_dropped() {
    let mut evaluator = evaluator_with_budget(2.0);
    for i in 0..5 {
        evaluator.intake(snap_app(i, 1.0));
    }

    evaluator.reset_monthly_capacity(0);
    let first = evaluator.process(0).unwrap();
    assert_eq!(first.finalized.len() + first.escalated.len(), 2);
    assert_eq!(evaluator.pending(), 3);

    evaluator.reset_monthly_capacity(1);
    let second = evaluator.process(1).unwrap();
    assert_eq!(second.finalized.len() + second.escalated.len(), 2);
    assert_eq!(evaluator.pending(), 1);
}

#[test]
fn applications_pending_too_long_age_out_as_abandoned() {
    let mut evaluator = evaluator_with_budget(0.5);
    // One unit of capacity, every case costs 1.0: nothing ever processes.
    for i in 0..2 {
        evaluator.intake(snap_app(i, 1.0));
    }

    for month in 0..evaluator::MAX_PENDING_MONTHS {
        evaluator.reset_monthly_capacity(month);
        let pass = evaluator.process(month).unwrap();
        assert!(pass.aged_out.is_empty(), "aged out too early at month {month}");
    }

    let month = evaluator::MAX_PENDING_MONTHS;
    evaluator.reset_monthly_capacity(month);
    let pass = evaluator.process(month).unwrap();
    assert_eq!(pass.aged_out.len(), 2);
    assert!(pass.aged_out.iter().all(|app| app.abandoned()));
    assert_eq!(evaluator.pending(), 0);
}

#[test]
fn non_positive_capacity_is_a_configuration_error() {
    let result = Evaluator::new("County_A".into(), Program::Snap, 0.8, 0.0, team_rng(1));
    assert!(result.is_err());
}
