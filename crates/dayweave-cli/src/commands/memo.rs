//! Memo management commands for CLI.

use clap::Subcommand;
use dayweave_core::{
    FallbackEnricher, Importance, LocationPreference, MemoDraft, MemoKind, MemoStore,
    RecurrenceGoal, RecurrencePeriod,
};

use super::open_engine;

#[derive(Subcommand)]
pub enum MemoAction {
    /// Create a new memo
    Add {
        /// Memo title
        title: String,
        /// Memo kind: deadline, backlog or routine
        #[arg(long, default_value = "backlog")]
        kind: String,
        /// Deadline date (YYYY-MM-DD), required for deadline memos
        #[arg(long)]
        deadline: Option<String>,
        /// Routine goal count per period
        #[arg(long)]
        goal: Option<u32>,
        /// Routine goal period: day, week or month
        #[arg(long, default_value = "week")]
        period: String,
        /// Location preference: home, workplace or none
        #[arg(long, default_value = "none")]
        location: String,
        /// Ideal session minutes
        #[arg(long)]
        session: Option<u32>,
        /// Expected total minutes
        #[arg(long)]
        total: Option<u32>,
        /// Importance: low, medium or high
        #[arg(long)]
        importance: Option<String>,
    },
    /// List memos
    List {
        /// Filter by kind
        #[arg(long)]
        kind: Option<String>,
    },
    /// Show one memo as JSON
    Show {
        /// Memo ID
        id: String,
    },
    /// Delete a memo
    Delete {
        /// Memo ID
        id: String,
    },
}

fn parse_kind(value: &str) -> Result<MemoKind, String> {
    match value {
        "deadline" => Ok(MemoKind::Deadline),
        "backlog" => Ok(MemoKind::Backlog),
        "routine" => Ok(MemoKind::Routine),
        other => Err(format!("unknown kind '{other}'")),
    }
}

fn parse_period(value: &str) -> Result<RecurrencePeriod, String> {
    match value {
        "day" => Ok(RecurrencePeriod::Day),
        "week" => Ok(RecurrencePeriod::Week),
        "month" => Ok(RecurrencePeriod::Month),
        other => Err(format!("unknown period '{other}'")),
    }
}

fn parse_importance(value: &str) -> Result<Importance, String> {
    match value {
        "low" => Ok(Importance::Low),
        "medium" => Ok(Importance::Medium),
        "high" => Ok(Importance::High),
        other => Err(format!("unknown importance '{other}'")),
    }
}

fn parse_location(value: &str) -> Result<LocationPreference, String> {
    match value {
        "home" => Ok(LocationPreference::Home),
        "workplace" => Ok(LocationPreference::Workplace),
        "none" => Ok(LocationPreference::None),
        other => Err(format!("unknown location '{other}'")),
    }
}

pub fn run(action: MemoAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = open_engine()?;

    match action {
        MemoAction::Add {
            title,
            kind,
            deadline,
            goal,
            period,
            location,
            session,
            total,
            importance,
        } => {
            let kind = parse_kind(&kind)?;
            let mut draft = MemoDraft::new(title, kind);
            draft.deadline = deadline
                .map(|d| d.parse::<chrono::NaiveDate>())
                .transpose()?;
            if kind == MemoKind::Deadline && draft.deadline.is_none() {
                return Err("deadline memos require --deadline".into());
            }
            if kind == MemoKind::Routine {
                let count = goal.ok_or("routine memos require --goal")?;
                draft.recurrence_goal = Some(RecurrenceGoal {
                    count,
                    period: parse_period(&period)?,
                });
            }
            draft.location = parse_location(&location)?;
            draft.session_minutes = session;
            draft.total_minutes_expected = total;
            draft.importance = importance.as_deref().map(parse_importance).transpose()?;

            let memo = engine.create_memo(draft, &FallbackEnricher, chrono::Utc::now())?;
            println!("Memo created: {}", memo.id);
            println!("{}", serde_json::to_string_pretty(&memo)?);
        }
        MemoAction::List { kind } => {
            let filter = kind.as_deref().map(parse_kind).transpose()?;
            for memo in engine.store().list()? {
                if let Some(kind) = filter {
                    if memo.kind != kind {
                        continue;
                    }
                }
                println!(
                    "{}  {:<9} {:<9} {}",
                    memo.id,
                    memo.kind.as_str(),
                    format!("{:?}", memo.importance).to_lowercase(),
                    memo.title
                );
            }
        }
        MemoAction::Show { id } => match engine.store().get(&id)? {
            Some(memo) => println!("{}", serde_json::to_string_pretty(&memo)?),
            None => return Err(format!("no memo with id {id}").into()),
        },
        MemoAction::Delete { id } => {
            if engine.store_mut().delete(&id)? {
                println!("Memo deleted: {id}");
            } else {
                println!("No memo with id {id}");
            }
        }
    }
    Ok(())
}
