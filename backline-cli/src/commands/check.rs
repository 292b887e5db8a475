//! Connectivity check
//!
//! Acquires a connection through the cache, runs a trivial query and
//! reports the cache state.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;

use super::{load_settings, open_cache, DatabaseArgs};

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub db: DatabaseArgs,
}

pub async fn run_check(args: CheckArgs, config: Option<&Path>) -> Result<()> {
    let settings = load_settings(config, &args.db)?;
    let cache = open_cache(&settings)?;

    let pool = cache
        .acquire()
        .await
        .context("Failed to connect to database")?;
    let one: i32 = sqlx::query_scalar("SELECT 1")
        .fetch_one(&pool)
        .await
        .context("Database did not answer a trivial query")?;

    if args.json {
        let report = json!({
            "target": cache.target().to_string(),
            "status": cache.status(),
            "attempts": cache.attempts(),
            "ok": one == 1,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("✓ connected to {}", cache.target());
        println!("  status:   {:?}", cache.status());
        println!("  attempts: {}", cache.attempts());
    }

    Ok(())
}
