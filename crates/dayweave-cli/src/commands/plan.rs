//! Day planning command: allocate suggestions into gaps.
//!
//! Gaps come from a JSON file, standing in for the calendar collaborator
//! that normally computes them from the day's events.

use std::path::PathBuf;

use clap::Args;
use dayweave_core::Gap;

use super::open_engine;

#[derive(Args)]
pub struct PlanArgs {
    /// JSON file with the day's gaps (array of {id, start, end, location})
    #[arg(long)]
    gaps: PathBuf,
    /// Print raw JSON instead of a summary
    #[arg(long)]
    json: bool,
}

pub fn run(args: PlanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(&args.gaps)?;
    let gaps: Vec<Gap> = serde_json::from_str(&text)?;

    let mut engine = open_engine()?;
    let plan = engine.plan_day(chrono::Utc::now(), &gaps)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    if plan.allocation.placements.is_empty() && plan.allocation.unplaced.is_empty() {
        println!("Nothing to place.");
        return Ok(());
    }

    for p in &plan.allocation.placements {
        let shrunk = if p.shrunk { " (shrunk)" } else { "" };
        println!(
            "{} -> {}  {} min{}, {} min spare",
            p.memo_id, p.gap_id, p.planned_minutes, shrunk, p.spare_minutes
        );
    }
    if !plan.allocation.unplaced.is_empty() {
        println!("\nUnplaced (day overcommitted?):");
        for memo_id in &plan.allocation.unplaced {
            println!("  {memo_id}");
        }
    }
    Ok(())
}
