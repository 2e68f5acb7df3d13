use crate::config::Config;
use sqlx::AnyPool;

pub struct AppState {
    pub config: Config,
    pub db_pool: AnyPool,
}
