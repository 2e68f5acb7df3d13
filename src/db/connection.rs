// Row store gateway: one sqlx::AnyPool whose backend is picked once at startup

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use sqlx::any::{install_default_drivers, AnyPoolOptions};
use sqlx::migrate::MigrateDatabase;
use sqlx::{Any, AnyPool};
use tracing::info;

use crate::config::Config;

/// Relational backend behind the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Sqlite,
    Postgres,
}

impl Backend {
    /// Infers the backend from the connection string scheme. Anything that is
    /// not a postgres URL is treated as a local SQLite file.
    pub fn from_url(url: &str) -> Self {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Backend::Postgres
        } else {
            Backend::Sqlite
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Sqlite => "sqlite",
            Backend::Postgres => "postgres",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Backend::Sqlite),
            "postgres" | "postgresql" => Ok(Backend::Postgres),
            other => Err(format!("unknown database backend: {}", other)),
        }
    }
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

pub async fn establish_connection(config: &Config) -> Result<AnyPool, sqlx::Error> {
    install_default_drivers();

    let url = config.database_url.as_str();
    let memory = config.database_backend == Backend::Sqlite && is_memory_url(url);

    // Create database file if it doesn't exist
    if config.database_backend == Backend::Sqlite
        && !memory
        && !Any::database_exists(url).await.unwrap_or(false)
    {
        info!("Creating SQLite database at {}", url);
        Any::create_database(url).await?;
    }

    // Every connection to sqlite::memory: opens a fresh database, so the pool
    // must hold exactly one connection for its whole lifetime.
    let options = if memory {
        AnyPoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
    } else {
        AnyPoolOptions::new().max_connections(config.database_max_connections.max(1))
    };

    let pool = options.connect(url).await?;

    if config.database_backend == Backend::Sqlite && !memory {
        // Enable WAL mode for better concurrency
        sqlx::query("PRAGMA journal_mode=WAL").execute(&pool).await?;
    }

    info!("Connected to {} database", config.database_backend);
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_is_inferred_from_scheme() {
        assert_eq!(Backend::from_url("postgres://u:p@db/app"), Backend::Postgres);
        assert_eq!(Backend::from_url("postgresql://db/app"), Backend::Postgres);
        assert_eq!(Backend::from_url("sqlite:squad.db"), Backend::Sqlite);
        assert_eq!(Backend::from_url("sqlite::memory:"), Backend::Sqlite);
    }

    #[test]
    fn backend_parses_from_config_value() {
        assert_eq!("Postgres".parse::<Backend>(), Ok(Backend::Postgres));
        assert_eq!(" sqlite ".parse::<Backend>(), Ok(Backend::Sqlite));
        assert!("mysql".parse::<Backend>().is_err());
    }
}
