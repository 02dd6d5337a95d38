//! Simulation clock — owns the month counter and the run-phase state machine.
//!
//! Phase transitions are linear and one-way:
//!   Init → (Warmup × k) → (Run × n) → Done
//! Warm-up months execute every engine phase but are excluded from
//! statistics collection.

use crate::types::Month;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Init,
    Warmup,
    Run,
    Done,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimClock {
    pub current_month: Month,
    pub warmup_months: Month,
    pub run_months: Month,
    pub phase: RunPhase,
}

impl SimClock {
    pub fn new(warmup_months: Month, run_months: Month) -> Self {
        Self {
            current_month: 0,
            warmup_months,
            run_months,
            phase: RunPhase::Init,
        }
    }

    /// Advance to the next month and return it. The first call moves
    /// Init → Warmup (or straight to Run when no warm-up is configured).
    /// Panics if called after Done — callers must check `is_done()`.
    pub fn advance(&mut self) -> Month {
        assert!(self.phase != RunPhase::Done, "advance() called on finished clock");

        let month = match self.phase {
            RunPhase::Init => 0,
            _ => self.current_month + 1,
        };
        self.current_month = month;
        self.phase = if month < self.warmup_months {
            RunPhase::Warmup
        } else {
            RunPhase::Run
        };
        month
    }

    /// True while statistics should be collected for the current month.
    pub fn collecting(&self) -> bool {
        self.phase == RunPhase::Run
    }

    pub fn is_done(&self) -> bool {
        self.phase == RunPhase::Done
    }

    /// Total months the run executes, warm-up included.
    pub fn total_months(&self) -> Month {
        self.warmup_months + self.run_months
    }

    /// Mark the run finished. Called by the runner after the final month.
    pub fn finish(&mut self) {
        self.phase = RunPhase::Done;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warmup_months_precede_run_months() {
        let mut clock = SimClock::new(2, 3);
        assert_eq!(clock.phase, RunPhase::Init);

        assert_eq!(clock.advance(), 0);
        assert_eq!(clock.phase, RunPhase::Warmup);
        assert!(!clock.collecting());

        assert_eq!(clock.advance(), 1);
        assert_eq!(clock.phase, RunPhase::Warmup);

        assert_eq!(clock.advance(), 2);
        assert_eq!(clock.phase, RunPhase::Run);
        assert!(clock.collecting());
    }

    #[test]
    fn zero_warmup_starts_collecting_immediately() {
        let mut clock = SimClock::new(0, 1);
        clock.advance();
        assert!(clock.collecting());
    }
}
