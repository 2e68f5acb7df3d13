// Configuration for:
// - Database connection string and backend
// - Server listening address/port
// - Bootstrap admin credentials
// - CORS origin

use dotenv::dotenv;
use std::env;

use crate::db::connection::Backend;

pub const DEFAULT_ADMIN_PASSWORD: &str = "admin";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_backend: Backend,
    pub database_max_connections: u32,
    pub server_host: String,
    pub server_port: u16,
    pub admin_username: String,
    pub admin_password: String,
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:squad_ledger.db".to_string());
        let database_backend = env::var("DATABASE_BACKEND")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(|| Backend::from_url(&database_url));
        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(|| (num_cpus::get() * 2) as u32);
        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080);
        let admin_username = env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
        let admin_password = env::var("ADMIN_PASSWORD")
            .unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string());
        let cors_allowed_origin = env::var("CORS_ALLOWED_ORIGIN")
            .ok()
            .filter(|v| !v.trim().is_empty());

        Self {
            database_url,
            database_backend,
            database_max_connections,
            server_host,
            server_port,
            admin_username,
            admin_password,
            cors_allowed_origin,
        }
    }

    /// In-memory SQLite configuration used by the test suite.
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            database_backend: Backend::Sqlite,
            database_max_connections: 1,
            server_host: "127.0.0.1".to_string(),
            server_port: 0,
            admin_username: "admin".to_string(),
            admin_password: "secret".to_string(),
            cors_allowed_origin: None,
        }
    }

    pub fn uses_default_admin_password(&self) -> bool {
        self.admin_password == DEFAULT_ADMIN_PASSWORD
    }
}
