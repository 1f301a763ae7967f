//! Runtime settings, read from flags with environment-variable fallbacks.

use clap::{Args, ValueEnum};
use std::fmt;
use std::net::SocketAddr;
use thiserror::Error;

/// Environment profile selected through `APP_SETTINGS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Profile {
    Development,
    Testing,
    Production,
}

impl Profile {
    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Development => "development",
            Profile::Testing => "testing",
            Profile::Production => "production",
        }
    }

    /// Store URL used when `DATABASE_URL` is not set. Production has none.
    pub fn default_database_url(self) -> Option<&'static str> {
        match self {
            Profile::Development => Some("sqlite://users_dev.db?mode=rwc"),
            Profile::Testing => Some("sqlite::memory:"),
            Profile::Production => None,
        }
    }

    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(self) -> &'static str {
        match self {
            Profile::Development => "users_service=debug,tower_http=debug,info",
            Profile::Testing | Profile::Production => "info",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("DATABASE_URL must be set for the {0} profile")]
    MissingDatabaseUrl(Profile),
}

#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// Environment profile
    #[arg(
        long,
        env = "APP_SETTINGS",
        value_enum,
        default_value_t = Profile::Development,
        global = true
    )]
    pub profile: Profile,

    /// Store connection URL (defaults depend on the profile)
    #[arg(long, env = "DATABASE_URL", global = true)]
    pub database_url: Option<String>,

    /// Address the HTTP server binds to
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:5000", global = true)]
    pub bind: SocketAddr,

    /// Upper bound on pooled store connections
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 5, global = true)]
    pub max_connections: u32,
}

impl Settings {
    pub fn database_url(&self) -> Result<String, ConfigError> {
        if let Some(url) = &self.database_url {
            return Ok(url.clone());
        }
        self.profile
            .default_database_url()
            .map(str::to_string)
            .ok_or(ConfigError::MissingDatabaseUrl(self.profile))
    }
}
