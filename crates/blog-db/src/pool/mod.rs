//! Database connection pool management

mod postgres;
mod schema;

pub use postgres::{create_pool, PoolConfig};
pub use schema::run_migrations;

// Re-export PgPool for convenience
pub use sqlx::postgres::PgPool;
