//! Suggestion listing command.

use clap::Args;

use super::open_engine;

#[derive(Args)]
pub struct SuggestArgs {
    /// Print raw JSON instead of a table
    #[arg(long)]
    json: bool,
}

pub fn run(args: SuggestArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = open_engine()?;
    let suggestions = engine.compute_suggestions(chrono::Utc::now())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }

    if suggestions.is_empty() {
        println!("Nothing needs your attention right now.");
        return Ok(());
    }

    println!(
        "{:<36}  {:>5}  {:>4}  {:<9} {}",
        "memo", "need", "min", "kind", ""
    );
    for s in &suggestions {
        let marker = if s.need >= engine.config().mandatory_threshold {
            "(mandatory)"
        } else {
            ""
        };
        println!(
            "{:<36}  {:>5.2}  {:>4}  {:<9} {}",
            s.memo_id,
            s.need,
            s.duration_minutes,
            s.kind.as_str(),
            marker
        );
    }
    Ok(())
}
