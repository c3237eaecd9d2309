//! Database bootstrap: pool creation, schema and full-text index.

use crate::config::{ResolvedModel, Settings};
use crate::error::AppError;
use crate::migration::apply_migrations;
use crate::search::{RebuildStats, TextSearchManager};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

/// Open the pool. The database file is created if missing; foreign keys are enforced on every connection.
pub async fn connect(settings: &Settings) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(&settings.database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));
    let pool = SqlitePoolOptions::new()
        .max_connections(settings.pool_size)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Create missing tables and indexes, then rebuild the full-text index.
pub async fn init_db(pool: &SqlitePool, model: &ResolvedModel) -> Result<RebuildStats, AppError> {
    apply_migrations(pool, model).await?;
    let stats = TextSearchManager::rebuild(pool).await?;
    tracing::info!(
        tables = model.entities.len(),
        text_columns = stats.columns,
        indexed_rows = stats.rows,
        "database ready"
    );
    Ok(stats)
}
