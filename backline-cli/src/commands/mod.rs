//! Command implementations for the backline CLI

pub mod check;
pub mod migrate;
pub mod serve;

use std::path::Path;

use anyhow::{Context, Result};
use backline_core::Settings;
use backline_server::db::{create_cache, DbCache};
use clap::Args;

pub use check::run_check;
pub use migrate::run_migrate;
pub use serve::run_serve;

/// Database connection flags shared by every command that talks to Postgres
#[derive(Args, Debug, Clone, Default)]
pub struct DatabaseArgs {
    /// Database URL (overrides config file and environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

/// Load layered settings and apply the command-line database override.
pub fn load_settings(config: Option<&Path>, db: &DatabaseArgs) -> Result<Settings> {
    let mut settings = Settings::load(config).context("Failed to load configuration")?;
    if let Some(url) = db.database_url.as_deref().filter(|url| !url.trim().is_empty()) {
        settings.database.url = Some(url.to_string());
    }
    Ok(settings)
}

/// Build the lazy connection cache. Configuration problems surface here,
/// before any connection is attempted.
pub fn open_cache(settings: &Settings) -> Result<DbCache> {
    create_cache(&settings.database).context("Invalid database configuration")
}
