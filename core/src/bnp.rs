//! Bureaucracy navigation points — the seeker's depletable capacity to
//! withstand administrative scrutiny.
//!
//! RULES:
//!   - Every function here is pure: no side effects beyond the return
//!     value. Callers own all state mutation.
//!   - The initial score is computed once at population build time and
//!     then only ever adjusted incrementally (learning gains, investigation
//!     costs) during the run.
//!   - A post-deduction balance below zero is the structural
//!     false-positive mechanic: the reviewer must classify that
//!     investigation as fraud-detected regardless of ground truth.

use crate::population::{Demographics, EducationTier};
use crate::rng::SimStream;

/// Starting capacity before any demographic adjustment.
const BASE_POINTS: f64 = 10.0;

/// Fraudsters pay double: sustaining a lie under document requests and
/// interviews costs more than telling the truth.
pub const FRAUD_COST_MULTIPLIER: f64 = 2.0;

/// Points gained each time a seeker successfully completes a filing step.
pub const LEARNING_GAIN: f64 = 0.5;

/// Capacity below this many points puts step completion at risk; at or
/// below zero, completion is impossible.
const STEP_FULL_CONFIDENCE: f64 = 4.0;

/// Weight applied to fraud propensity (0–2): habitual corner-cutters keep
/// sloppier records even before any fraud occurs.
const FRAUD_PROPENSITY_WEIGHT: f64 = 0.75;

/// Initial navigation capacity from fixed demographics, roughly 0–20.
///
/// Structural inequality enters the model here: educated, employed,
/// older applicants withstand more scrutiny even when everyone is honest.
pub fn initial_points(demo: &Demographics, fraud_propensity: f64, stream: &mut SimStream) -> f64 {
    let mut points = BASE_POINTS;

    // Bureaucratic literacy.
    points += match demo.education {
        EducationTier::Bachelors | EducationTier::Graduate => 5.0,
        EducationTier::HighSchool | EducationTier::SomeCollege => 2.0,
        EducationTier::LessThanHs => -3.0,
    };

    // Employment means pay stubs on hand and an employer who answers calls.
    points += if demo.employed { 3.0 } else { -2.0 };

    // Decades of dealing with forms vs. first contact with the system.
    points += if demo.age >= 50 {
        2.0
    } else if demo.age >= 35 {
        1.0
    } else if demo.age < 25 {
        -1.0
    } else {
        0.0
    };

    // Disability can make document gathering and interviews harder.
    if demo.has_disability {
        points -= 2.0;
    }

    points -= fraud_propensity * FRAUD_PROPENSITY_WEIGHT;

    // Life circumstances: organization, stress, support network.
    points += stream.uniform(-2.0, 2.0);

    points.max(0.0)
}

/// Balance after one investigation action. `is_fraud` is ground truth,
/// invisible to the reviewer; the asymmetric cost is how real fraud
/// becomes harder to sustain under scrutiny.
pub fn investigation_cost(bnp: f64, base_cost: f64, is_fraud: bool) -> f64 {
    let multiplier = if is_fraud { FRAUD_COST_MULTIPLIER } else { 1.0 };
    bnp - base_cost * multiplier
}

/// Balance after a successful step completion. Uncapped.
pub fn learning_gain(bnp: f64, rate: f64) -> f64 {
    bnp + rate
}

/// Probability that a seeker completes a filing step this month.
/// Zero at or below zero points (abandonment, not an exception), certain
/// from STEP_FULL_CONFIDENCE points up.
pub fn step_success_probability(bnp: f64) -> f64 {
    (bnp / STEP_FULL_CONFIDENCE).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraud_doubles_the_cost() {
        assert_eq!(investigation_cost(10.0, 4.0, false), 6.0);
        assert_eq!(investigation_cost(10.0, 4.0, true), 2.0);
    }

    #[test]
    fn depleted_seeker_cannot_complete_a_step() {
        assert_eq!(step_success_probability(0.0), 0.0);
        assert_eq!(step_success_probability(-3.0), 0.0);
        assert_eq!(step_success_probability(8.0), 1.0);
        assert!(step_success_probability(2.0) > 0.0 && step_success_probability(2.0) < 1.0);
    }

    #[test]
    fn learning_gain_is_uncapped() {
        assert_eq!(learning_gain(19.9, 0.5), 20.4);
    }
}
