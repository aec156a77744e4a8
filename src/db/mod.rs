//! Database initialization and migration runner.
//!
//! SYSTEM CONTEXT
//! ==============
//! The driver uses this module when `LIGHTBOARD_STORE=postgres` to create the
//! SQLx pool behind [`crate::store::PgStore`] and bring the `user_configs`
//! schema up to date before the session starts.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

/// Initialize the `PostgreSQL` connection pool and run migrations.
///
/// # Errors
///
/// Returns an error if the connection or migrations fail.
pub async fn init_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    sqlx::migrate!("src/db/migrations").run(&pool).await?;
    info!(max_connections, "database ready");

    Ok(pool)
}
