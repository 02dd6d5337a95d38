//! Application complexity scoring: program bases, demographic terms,
//! recertification discount, and range clipping.

use caseload_core::{
    application::{COMPLEXITY_MAX, COMPLEXITY_MIN},
    population::{Demographics, EducationTier, Race, SeekerRecord},
    program::Program,
    rng::RngBank,
    seeker::{ApplyKind, Seeker},
};

fn record(demo: Demographics) -> SeekerRecord {
    SeekerRecord { demographics: demo }
}

fn simple_demo() -> Demographics {
    Demographics {
        race: Race::Hispanic,
        age: 30,
        education: EducationTier::HighSchool,
        employed: true,
        income: 20_000.0,
        has_disability: false,
        has_children: false,
        num_children: 0,
        household_size: 1,
    }
}

fn seeker_with(demo: Demographics) -> Seeker {
    Seeker::from_record(0, "County_A".into(), &record(demo), &RngBank::new(42))
}

#[test]
fn snap_single_adult_new_case_scores_program_base_plus_paperwork() {
    let mut seeker = seeker_with(simple_demo());
    let app = seeker.create_application(Program::Snap, 0, ApplyKind::New, 1, 1);
    // 0.30 base + 0.15 new-application term, nothing else applies.
    assert!((app.complexity - 0.45).abs() < 1e-12);
}

#[test]
fn recertification_is_simpler_than_a_new_case() {
    let mut a = seeker_with(simple_demo());
    let mut b = seeker_with(simple_demo());
    let new_case = a.create_application(Program::Snap, 0, ApplyKind::New, 1, 1);
    let recert = b.create_application(Program::Snap, 6, ApplyKind::Recertification, 2, 2);
    assert!((new_case.complexity - recert.complexity - 0.15).abs() < 1e-12);
}

#[test]
fn disability_and_age_terms_stack() {
    let mut demo = simple_demo();
    demo.has_disability = true;
    demo.age = 70;
    let mut seeker = seeker_with(demo);
    let app = seeker.create_application(Program::Ssi, 0, ApplyKind::New, 1, 1);
    // 0.70 base + 0.20 disability + 0.15 new + 0.10 senior = 1.15, clipped.
    assert_eq!(app.complexity, COMPLEXITY_MAX);
}

#[test]
fn household_and_children_terms_are_capped() {
    let mut demo = simple_demo();
    demo.household_size = 9;
    demo.num_children = 7;
    demo.has_children = true;
    let mut seeker = seeker_with(demo);
    let app = seeker.create_application(Program::Snap, 0, ApplyKind::New, 1, 1);
    // 0.30 base + 0.15 household cap + 0.10 children cap + 0.15 new.
    assert!((app.complexity - 0.70).abs() < 1e-12);
}

#[test]
fn complexity_always_lands_in_the_documented_range() {
    let bank = RngBank::new(99);
    let counties = vec!["County_A".to_string()];
    let population = caseload_core::population::synthetic(200, &counties, &bank);

    let mut id = 0u64;
    for record in &population["County_A"] {
        let mut seeker = Seeker::from_record(id, "County_A".into(), record, &bank);
        for program in caseload_core::program::ALL_PROGRAMS {
            let app = seeker.create_application(program, 0, ApplyKind::New, id, id);
            assert!(
                (COMPLEXITY_MIN..=COMPLEXITY_MAX).contains(&app.complexity),
                "complexity {} out of range for program {program}",
                app.complexity
            );
        }
        id += 1;
    }
}
