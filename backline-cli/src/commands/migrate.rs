//! Apply the schema to the configured database

use std::path::Path;

use anyhow::{Context, Result};
use backline_server::db::migrations;

use super::{load_settings, open_cache, DatabaseArgs};

pub async fn run_migrate(db: DatabaseArgs, config: Option<&Path>) -> Result<()> {
    let settings = load_settings(config, &db)?;
    let cache = open_cache(&settings)?;

    let pool = cache
        .acquire()
        .await
        .context("Failed to connect to database")?;
    migrations::run(&pool)
        .await
        .context("Failed to apply migrations")?;

    tracing::info!(database = %cache.target(), "migrations applied");
    println!("✓ migrations applied to {}", cache.target());
    Ok(())
}
