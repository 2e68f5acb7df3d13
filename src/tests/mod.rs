//! Store-backed tests. Each test gets its own in-memory SQLite database.

mod api_tests;

use crate::{
    config::Config,
    db::{connection, group, migration},
    state::AppState,
};
use sqlx::AnyPool;
use std::sync::Arc;

pub const GROUP_ID: &str = "g1";

/// Fresh schema, seeded admin and one group.
pub async fn setup() -> (AnyPool, Arc<AppState>) {
    let config = Config::in_memory();
    let db_pool = connection::establish_connection(&config)
        .await
        .expect("Failed to connect to database");
    migration::bootstrap(&db_pool, &config)
        .await
        .expect("Failed to bootstrap schema");

    group::create_group(&db_pool, Some(GROUP_ID), "Thursday Futsal", None)
        .await
        .expect("Failed to create group");

    let app_state = Arc::new(AppState {
        config,
        db_pool: db_pool.clone(),
    });

    (db_pool, app_state)
}
