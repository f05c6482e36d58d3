//! Configuration inspection commands.

use clap::Subcommand;
use dayweave_core::EngineConfig;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective engine configuration as TOML
    Show,
    /// Print the config file path
    Path,
    /// Write the current (or default) configuration to disk
    Init,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let path = EngineConfig::default_path()?;
    match action {
        ConfigAction::Show => {
            let config = EngineConfig::load(&path)?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Path => println!("{}", path.display()),
        ConfigAction::Init => {
            let config = EngineConfig::load(&path)?;
            config.save(&path)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}
