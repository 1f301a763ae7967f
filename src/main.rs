pub mod api;
pub mod config;
pub mod db;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{Profile, Settings};
use crate::db::models::fixture_users;
use crate::db::repo::UserStore;

#[derive(Debug, Parser)]
#[command(name = "users-service")]
#[command(about = "Users microservice and its database management commands", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    settings: Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
enum Command {
    /// Serve the HTTP API (default)
    Serve,
    /// Drop and recreate the users table
    RecreateDb,
    /// Insert the fixture users
    SeedDb,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.settings.profile);

    let database_url = cli.settings.database_url()?;
    let store = UserStore::connect(&database_url, cli.settings.max_connections)
        .await
        .wrap_err("failed to connect to the user store")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            store.create_schema().await?;
            info!(profile = %cli.settings.profile, "starting users service");
            api::server::start_server(store, cli.settings.bind)
                .await
                .wrap_err("server failed")?;
        }
        Command::RecreateDb => {
            store.drop_and_recreate_schema().await?;
            info!("users table recreated");
        }
        Command::SeedDb => {
            store.create_schema().await?;
            let seeded = store
                .seed(&fixture_users())
                .await
                .wrap_err("failed to seed fixture users")?;
            info!(count = seeded.len(), "fixture users seeded");
        }
    }

    Ok(())
}

fn init_tracing(profile: Profile) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(profile.default_log_filter()));
    if let Err(e) = fmt().with_env_filter(filter).try_init() {
        warn!(error = %e, "tracing init failed");
    }
}
