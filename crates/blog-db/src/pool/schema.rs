//! Bundled schema, applied at startup

use sqlx::PgPool;
use tracing::info;

/// Ordered schema files. Each one is idempotent.
const MIGRATIONS: &[(&str, &str)] = &[("0001_init", include_str!("../../migrations/0001_init.sql"))];

/// Apply every bundled schema file in order
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    for (name, sql) in MIGRATIONS {
        sqlx::raw_sql(sql).execute(pool).await?;
        info!(migration = name, "Applied schema");
    }
    Ok(())
}
