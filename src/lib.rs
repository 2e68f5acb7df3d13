pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod state;
pub mod validation;

#[cfg(test)]
pub mod tests;

// Re-export specific items for convenience
pub use api::error::ApiError;
pub use api::route::create_router;
pub use db::aggregate::{upsert_match_revenue, upsert_monthly_fee, MatchRevenue, MonthlyFee};
pub use db::connection::{establish_connection, Backend};
pub use db::migration::bootstrap;
pub use models::{MonthlyOutcome, Transaction};
pub use state::AppState;
