//! HTTP server command
//!
//! Runs the backline API. The database is not contacted until the first
//! request that needs it, unless `--migrate` is given.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use backline_server::db::migrations;
use backline_server::{run_server, AppState, ServerConfig};
use clap::Parser;

use super::{load_settings, open_cache, DatabaseArgs};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default from config, else 127.0.0.1:3030)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Apply schema migrations before accepting requests
    #[arg(long)]
    pub migrate: bool,

    #[command(flatten)]
    pub db: DatabaseArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, config: Option<&Path>) -> Result<()> {
    let settings = load_settings(config, &args.db)?;
    let cache = open_cache(&settings)?;

    if args.migrate {
        let pool = cache
            .acquire()
            .await
            .context("Failed to connect to database for migrations")?;
        migrations::run(&pool)
            .await
            .context("Failed to apply migrations")?;
    }

    let mut server_config = ServerConfig::from(&settings.server);
    if let Some(bind) = args.bind {
        server_config.bind_addr = bind;
    }
    server_config.cors_permissive |= args.cors_permissive;

    tracing::info!(
        bind = %server_config.bind_addr,
        database = %cache.target(),
        "starting backline server"
    );

    run_server(AppState::new(cache), server_config)
        .await
        .context("Server error")?;

    Ok(())
}
