//! CLI command modules.

pub mod config;
pub mod memo;
pub mod plan;
pub mod react;
pub mod rollover;
pub mod suggest;

use dayweave_core::{EngineConfig, MemoDb, SuggestionEngine};

/// Open the SQLite-backed engine with the on-disk config.
pub fn open_engine() -> Result<SuggestionEngine<MemoDb>, Box<dyn std::error::Error>> {
    let config = EngineConfig::load(&EngineConfig::default_path()?)?;
    let store = MemoDb::open()?;
    Ok(SuggestionEngine::with_config(store, config))
}
