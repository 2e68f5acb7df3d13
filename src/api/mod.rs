pub mod comments;
pub mod error;
pub mod fields;
pub mod groups;
pub mod matches;
pub mod players;
pub mod response;
pub mod route;
pub mod transactions;

pub use error::ApiError;
pub use route::create_router;
pub use response::{created, with_total_count};
