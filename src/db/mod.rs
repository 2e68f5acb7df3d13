pub mod aggregate;
pub mod comment;
pub mod connection;
pub mod field;
pub mod game;
pub mod group;
pub mod migration;
pub mod player;
pub mod transaction;

use chrono::{SecondsFormat, Utc};

// Column types are limited to TEXT, BIGINT and DOUBLE PRECISION so the same
// statements run unchanged on SQLite and Postgres.
pub const INIT_SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL,
        created_at TEXT NOT NULL
    )"#,
    r#"
    CREATE TABLE IF NOT EXISTS sport_groups (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        created_at TEXT NOT NULL
    )"#,
    r#"
    CREATE TABLE IF NOT EXISTS players (
        id TEXT PRIMARY KEY,
        group_id TEXT NOT NULL REFERENCES sport_groups(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        nickname TEXT,
        position TEXT,
        monthly_fee DOUBLE PRECISION,
        active BIGINT NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL
    )"#,
    r#"
    CREATE TABLE IF NOT EXISTS fields (
        id TEXT PRIMARY KEY,
        group_id TEXT NOT NULL REFERENCES sport_groups(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        address TEXT,
        hourly_rate DOUBLE PRECISION,
        created_at TEXT NOT NULL
    )"#,
    r#"
    CREATE TABLE IF NOT EXISTS matches (
        id TEXT PRIMARY KEY,
        group_id TEXT NOT NULL REFERENCES sport_groups(id) ON DELETE CASCADE,
        field_id TEXT REFERENCES fields(id) ON DELETE SET NULL,
        date TEXT NOT NULL,
        start_time TEXT,
        status TEXT NOT NULL,
        team_a_score BIGINT,
        team_b_score BIGINT,
        notes TEXT,
        created_at TEXT NOT NULL
    )"#,
    r#"
    CREATE TABLE IF NOT EXISTS comments (
        id TEXT PRIMARY KEY,
        match_id TEXT NOT NULL REFERENCES matches(id) ON DELETE CASCADE,
        player_id TEXT,
        author TEXT NOT NULL,
        content TEXT NOT NULL,
        created_at TEXT NOT NULL
    )"#,
    r#"
    CREATE TABLE IF NOT EXISTS transactions (
        id TEXT PRIMARY KEY,
        group_id TEXT NOT NULL REFERENCES sport_groups(id) ON DELETE CASCADE,
        description TEXT NOT NULL,
        amount DOUBLE PRECISION NOT NULL,
        type TEXT NOT NULL,
        date TEXT NOT NULL,
        category TEXT,
        related_match_id TEXT,
        player_id TEXT,
        created_at TEXT NOT NULL
    )"#,
    r#"
    CREATE TABLE IF NOT EXISTS transaction_contributions (
        transaction_id TEXT NOT NULL REFERENCES transactions(id) ON DELETE CASCADE,
        player_id TEXT NOT NULL,
        amount DOUBLE PRECISION NOT NULL,
        created_at TEXT NOT NULL,
        PRIMARY KEY (transaction_id, player_id)
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_players_group ON players(group_id)",
    "CREATE INDEX IF NOT EXISTS idx_fields_group ON fields(group_id)",
    "CREATE INDEX IF NOT EXISTS idx_matches_group_date ON matches(group_id, date)",
    "CREATE INDEX IF NOT EXISTS idx_comments_match ON comments(match_id)",
    "CREATE INDEX IF NOT EXISTS idx_transactions_group_date ON transactions(group_id, date)",
];

/// Creation timestamp stored in every `created_at` column.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Uses the client-supplied id when present, otherwise a fresh UUID.
pub fn resolve_id(id: Option<&str>) -> String {
    match id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => id.to_string(),
        None => uuid::Uuid::new_v4().to_string(),
    }
}
