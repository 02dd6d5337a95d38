//! sim-runner: headless simulation runner for caseload.
//!
//! Usage:
//!   sim-runner --seed 42 --seekers 500 --months 24 --warmup 3
//!   sim-runner --seed 42 --seekers 500 --months 24 --strategy simple_first
//!   sim-runner ... --json          # emit monthly stats as JSON lines

use anyhow::Result;
use caseload_core::{
    config::{RunConfig, SorterConfig},
    population,
    rng::RngBank,
    runner::SimulationRunner,
    sorter::SortStrategy,
};
use std::env;
use uuid::Uuid;

const DEFAULT_COUNTIES: [(&str, u64); 3] = [
    ("County_A", 50_000),
    ("County_B", 500_000),
    ("County_C", 2_500_000),
];

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let n_seekers = parse_arg(&args, "--seekers", 300usize);
    let n_months = parse_arg(&args, "--months", 24u32);
    let warmup = parse_arg(&args, "--warmup", 0u32);
    let json = args.iter().any(|a| a == "--json");
    let strategy = args
        .windows(2)
        .find(|w| w[0] == "--strategy")
        .map(|w| w[1].parse::<SortStrategy>())
        .transpose()?;

    let mut config = RunConfig::default_test(&DEFAULT_COUNTIES, n_months, seed);
    config.warmup_months = warmup;
    if let Some(strategy) = strategy {
        config.ai_sorter = Some(SorterConfig { strategy, random_seed: seed });
    }

    let run_id = format!("run-{}", Uuid::new_v4());
    println!("caseload — sim-runner");
    println!("  run:      {run_id}");
    println!("  seed:     {seed}");
    println!("  seekers:  {n_seekers}");
    println!("  months:   {n_months} (+{warmup} warm-up)");
    if let Some(sorter) = &config.ai_sorter {
        println!("  sorter:   {}", sorter.strategy);
    }
    println!();

    let counties = config.county_ids();
    let bank = RngBank::new(seed);
    let pop = population::synthetic(n_seekers, &counties, &bank);

    let started = chrono::Utc::now();
    let runner = SimulationRunner::new(run_id, config, pop)?;
    let result = runner.run()?;
    let elapsed = chrono::Utc::now() - started;
    log::debug!("collected {} monthly snapshots", result.monthly_stats.len());

    if json {
        for month in &result.monthly_stats {
            println!("{}", serde_json::to_string(month)?);
        }
        println!("{}", serde_json::to_string(&result.summary)?);
        return Ok(());
    }

    let summary = &result.summary;
    println!("Summary ({} ms):", elapsed.num_milliseconds());
    println!("  applications:   {}", summary.total_applications);
    println!("  approved:       {}", summary.total_approvals);
    println!("  denied:         {}", summary.total_denials);
    println!("  abandoned:      {}", summary.total_abandonments);
    println!("  investigated:   {}", summary.total_investigations);
    println!("  approval rate:  {:.1}%", summary.approval_rate * 100.0);
    println!("  false positives:{}", summary.false_positive_fraud_flags);

    println!();
    println!("Teams:");
    for ((county, program), evaluator) in &result.evaluators {
        let reviewer = &result.reviewers[&(county.clone(), *program)];
        println!(
            "  {county}/{program}: eval {}/{} approved, {} escalated | review {} cases, {} false positives",
            evaluator.applications_approved,
            evaluator.applications_processed,
            evaluator.applications_escalated,
            reviewer.applications_reviewed,
            reviewer.false_positives,
        );
    }

    Ok(())
}

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
