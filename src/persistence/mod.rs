//! Storage gateway bootstrap: PostgreSQL connection pool and migrations.
//!
//! The engine treats PostgreSQL as its storage gateway. Every service
//! owns a [`sqlx::PgPool`] handle (a cheap clone over one shared pool);
//! state-mutating operations open explicit transactions on it, reads go
//! straight to the pool.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::EngineConfig;
use crate::error::EngineResult;

/// Connects a PostgreSQL pool using the engine configuration and, when
/// enabled, applies the embedded migrations.
///
/// # Errors
///
/// Returns [`crate::error::EngineError::StorageFailure`] when the
/// connection or a migration fails, or
/// [`crate::error::EngineError::StorageTimeout`] when the pool cannot be
/// acquired within the configured timeout.
pub async fn connect(config: &EngineConfig) -> EngineResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect(&config.database_url)
        .await?;

    if config.run_migrations {
        tracing::info!("running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("migrations complete");
    }

    Ok(pool)
}
