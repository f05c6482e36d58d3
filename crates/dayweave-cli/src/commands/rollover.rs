//! Day-boundary rollover command.
//!
//! Wired to the external daily scheduler; safe to run repeatedly.

use clap::Args;

use super::open_engine;

#[derive(Args)]
pub struct RolloverArgs {}

pub fn run(_args: RolloverArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = open_engine()?;
    let rolled = engine.on_day_boundary(chrono::Utc::now())?;
    println!("Rolled over {rolled} memo(s).");
    Ok(())
}
