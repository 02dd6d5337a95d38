//! caseload-core — a capacity-constrained monthly simulation of
//! means-tested benefit administration across U.S. counties.
//!
//! Seekers generate applications; evaluators and reviewers process them
//! under hard monthly capacity budgets; an optional AI sorter reorders
//! each county-program queue; a depletable navigation-point balance turns
//! administrative scrutiny into structurally unequal outcomes. Everything
//! is deterministic under a fixed seed.

pub mod application;
pub mod bnp;
pub mod clock;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod population;
pub mod program;
pub mod reviewer;
pub mod rng;
pub mod runner;
pub mod seeker;
pub mod sorter;
pub mod stats;
pub mod types;
