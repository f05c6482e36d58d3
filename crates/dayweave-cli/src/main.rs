use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "dayweave", version, about = "Dayweave CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Memo management
    Memo {
        #[command(subcommand)]
        action: commands::memo::MemoAction,
    },
    /// Show today's visible suggestions
    Suggest(commands::suggest::SuggestArgs),
    /// Allocate suggestions into the day's gaps
    Plan(commands::plan::PlanArgs),
    /// Apply a reaction to a memo
    React {
        #[command(subcommand)]
        action: commands::react::ReactAction,
    },
    /// Force the day-boundary rollover across all memos
    Rollover(commands::rollover::RolloverArgs),
    /// Engine configuration
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Memo { action } => commands::memo::run(action),
        Commands::Suggest(args) => commands::suggest::run(args),
        Commands::Plan(args) => commands::plan::run(args),
        Commands::React { action } => commands::react::run(action),
        Commands::Rollover(args) => commands::rollover::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
