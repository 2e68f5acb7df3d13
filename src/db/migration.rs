use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};
use argon2::Argon2;
use sqlx::AnyPool;
use tracing::{info, warn};

use crate::config::Config;
use crate::db::{now_timestamp, INIT_SCHEMA};

pub const ADMIN_ROLE: &str = "ADMIN";

pub async fn run_migrations(pool: &AnyPool) -> Result<(), sqlx::Error> {
    info!("Running database migrations...");

    for statement in INIT_SCHEMA {
        sqlx::query(*statement).execute(pool).await?;
    }

    info!("Database migrations completed successfully");
    Ok(())
}

/// Argon2id PHC string with the salt embedded.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

#[cfg(test)]
pub fn verify_password(password: &str, stored: &str) -> bool {
    use argon2::password_hash::{PasswordHash, PasswordVerifier};

    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Inserts the admin account unless a user with that name already exists.
/// Returns true when a row was created.
pub async fn seed_admin(pool: &AnyPool, config: &Config) -> Result<bool, sqlx::Error> {
    if config.uses_default_admin_password() {
        warn!("ADMIN_PASSWORD not set, seeding admin account with the default password");
    }

    let password_hash = hash_password(&config.admin_password)
        .map_err(|e| sqlx::Error::Protocol(format!("failed to hash admin password: {}", e)))?;

    let result = sqlx::query(
        "INSERT INTO users (id, username, password_hash, role, created_at)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT(username) DO NOTHING",
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind(&config.admin_username)
    .bind(password_hash)
    .bind(ADMIN_ROLE)
    .bind(now_timestamp())
    .execute(pool)
    .await?;

    let created = result.rows_affected() > 0;
    if created {
        info!("Seeded admin account '{}'", config.admin_username);
    }
    Ok(created)
}

/// Schema plus admin seed; safe to run on every startup.
pub async fn bootstrap(pool: &AnyPool, config: &Config) -> Result<(), sqlx::Error> {
    run_migrations(pool).await?;
    seed_admin(pool, config).await?;
    Ok(())
}
