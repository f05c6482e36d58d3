//! Reaction commands: accept, reject, complete, undo.

use clap::Subcommand;
use dayweave_core::{AcceptedSlot, Reaction, ReactionOutcome};

use super::open_engine;

#[derive(Subcommand)]
pub enum ReactAction {
    /// Commit to a time slot for a memo today
    Accept {
        /// Memo ID
        id: String,
        /// Slot start time (HH:MM)
        #[arg(long)]
        start: String,
        /// Slot end time (HH:MM)
        #[arg(long)]
        end: String,
        /// Slot day (YYYY-MM-DD), defaults to today
        #[arg(long)]
        day: Option<String>,
    },
    /// Dismiss a memo for the rest of the day
    Reject {
        /// Memo ID
        id: String,
    },
    /// Log a finished session
    Complete {
        /// Memo ID
        id: String,
        /// Actual minutes worked
        #[arg(long)]
        minutes: u32,
    },
    /// Reverse today's most recent accept/complete
    Undo {
        /// Memo ID
        id: String,
    },
}

fn parse_time(value: &str) -> Result<chrono::NaiveTime, Box<dyn std::error::Error>> {
    Ok(chrono::NaiveTime::parse_from_str(value, "%H:%M")?)
}

pub fn run(action: ReactAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = open_engine()?;
    let now = chrono::Utc::now();

    let (id, reaction) = match action {
        ReactAction::Accept { id, start, end, day } => {
            let day = match day {
                Some(d) => d.parse::<chrono::NaiveDate>()?,
                None => now.date_naive(),
            };
            let slot = AcceptedSlot::new(day, parse_time(&start)?, parse_time(&end)?);
            (id, Reaction::Accept { slot })
        }
        ReactAction::Reject { id } => (id, Reaction::Reject),
        ReactAction::Complete { id, minutes } => (id, Reaction::Complete { minutes }),
        ReactAction::Undo { id } => (id, Reaction::Undo),
    };

    match engine.react(&id, reaction, now)? {
        ReactionOutcome::Applied => println!("Applied."),
        ReactionOutcome::Ignored => println!("Memo {id} no longer exists; nothing done."),
    }
    Ok(())
}
