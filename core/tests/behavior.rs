//! Seeker behavior: eligibility screening, recertification scheduling,
//! filing-step abandonment, and outcome bookkeeping.

use caseload_core::{
    application::{AbandonReason, Outcome},
    config::MechanismConfig,
    population::{Demographics, EducationTier, Race, SeekerRecord},
    program::Program,
    rng::RngBank,
    seeker::{ApplyKind, Seeker},
};

fn record(income: f64, has_children: bool, has_disability: bool) -> SeekerRecord {
    SeekerRecord {
        demographics: Demographics {
            race: Race::White,
            age: 40,
            education: EducationTier::SomeCollege,
            employed: true,
            income,
            has_disability,
            has_children,
            num_children: if has_children { 1 } else { 0 },
            household_size: if has_children { 3 } else { 2 },
        },
    }
}

fn seeker_from(income: f64, has_children: bool, has_disability: bool, seed: u64) -> Seeker {
    Seeker::from_record(
        0,
        "County_A".into(),
        &record(income, has_children, has_disability),
        &RngBank::new(seed),
    )
}

#[test]
fn tanf_needs_children_and_ssi_needs_a_disability() {
    let mechanisms = MechanismConfig::full_model();
    let mut childless = seeker_from(9_000.0, false, false, 42);
    assert_eq!(childless.decide_to_apply(Program::Tanf, 0, &mechanisms), None);
    assert_eq!(childless.decide_to_apply(Program::Ssi, 0, &mechanisms), None);

    // Low-income with children and disability: eligible everywhere. Only
    // the propensity roll can say no, and it cannot say no forever.
    let mut qualified = seeker_from(9_000.0, true, true, 42);
    let applied =
        (0..20).any(|_| qualified.decide_to_apply(Program::Snap, 0, &mechanisms).is_some());
    assert!(applied);
}

#[test]
fn approval_enrolls_and_suppresses_reapplication_until_recert() {
    let mechanisms = MechanismConfig::full_model();
    let mut seeker = seeker_from(18_000.0, false, false, 7);

    let kind = loop {
        match seeker.decide_to_apply(Program::Snap, 0, &mechanisms) {
            Some(kind) => break kind,
            None => continue,
        }
    };
    assert_eq!(kind, ApplyKind::New);

    let mut app = seeker.create_application(Program::Snap, 0, kind, 1, 1);
    app.resolve(Outcome::Approved, 0).unwrap();
    seeker.record_outcome(app, 0, &mechanisms);
    assert!(seeker.is_enrolled(Program::Snap));

    // Enrolled seekers sit out the months before recertification is due.
    for month in 1..Program::Snap.recert_interval() {
        assert_eq!(seeker.decide_to_apply(Program::Snap, month, &mechanisms), None);
    }

    // At the interval boundary the enrollment expires; when the seeker
    // does apply again it is a recertification.
    let month = Program::Snap.recert_interval();
    let kind = seeker.decide_to_apply(Program::Snap, month, &mechanisms);
    assert!(!seeker.is_enrolled(Program::Snap));
    if let Some(kind) = kind {
        assert_eq!(kind, ApplyKind::Recertification);
    }
}

#[test]
fn depleted_seeker_abandons_at_the_filing_step() {
    let mechanisms = MechanismConfig::full_model();
    let mut seeker = seeker_from(18_000.0, false, false, 11);
    seeker.bureaucracy_navigation_points = 0.0;

    // Success probability is clamped to zero; no roll ever succeeds.
    for _ in 0..20 {
        assert!(!seeker.attempt_filing_step(&mechanisms));
    }

    // The runner records the abandonment on the seeker.
    let mut app = seeker.create_application(Program::Snap, 0, ApplyKind::New, 1, 1);
    app.resolve(Outcome::Abandoned { reason: AbandonReason::FilingStepFailed }, 0).unwrap();
    seeker.record_outcome(app, 0, &mechanisms);

    assert_eq!(seeker.num_abandonments, 1);
    assert_eq!(seeker.num_applications, 1);
    assert_eq!(seeker.num_approvals, 0);
}

#[test]
fn completed_steps_grow_navigation_capacity() {
    let mut seeker = seeker_from(18_000.0, false, false, 13);
    let before = seeker.bureaucracy_navigation_points;
    seeker.apply_step_learning();
    assert!(seeker.bureaucracy_navigation_points > before);
}

#[test]
fn fraud_denials_accumulate_toward_a_ban() {
    let mechanisms = MechanismConfig::full_model();
    let mut seeker = seeker_from(18_000.0, false, false, 17);

    for i in 0..3u64 {
        let mut app = seeker.create_application(Program::Snap, i as u32, ApplyKind::New, i, i);
        app.resolve(
            Outcome::Denied { reason: caseload_core::application::DenialReason::FraudDetected },
            i as u32,
        )
        .unwrap();
        seeker.record_outcome(app, i as u32, &mechanisms);
    }

    assert_eq!(seeker.num_fraud_detections, 3);
    assert!(seeker.is_banned(&mechanisms));
    assert_eq!(seeker.decide_to_apply(Program::Snap, 10, &mechanisms), None);
}

#[test]
fn history_retains_every_resolved_application() {
    let mechanisms = MechanismConfig::full_model();
    let mut seeker = seeker_from(18_000.0, false, false, 19);
    for i in 0..5u64 {
        let mut app = seeker.create_application(Program::Snap, i as u32, ApplyKind::New, i, i);
        app.resolve(Outcome::Approved, i as u32).unwrap();
        seeker.record_outcome(app, i as u32, &mechanisms);
    }
    assert_eq!(seeker.history.len(), 5);
    assert!(seeker.history.iter().all(|app| app.is_resolved()));
}
