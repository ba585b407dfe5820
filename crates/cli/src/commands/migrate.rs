//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! vestra migrate
//! ```
//!
//! # Environment Variables
//!
//! - `VESTRA_DATABASE_URL` - `PostgreSQL` connection string
//! - `DATABASE_URL` - fallback, also what sqlx tooling reads
//!
//! Migration files live in `crates/api/migrations/` and are embedded
//! into this binary at compile time, so the deployed CLI needs no access
//! to the source tree.

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;

/// Errors from the migrate command.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// Neither `VESTRA_DATABASE_URL` nor `DATABASE_URL` is set.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Connecting to the database failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration failed to apply.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run all pending database migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection
/// fails, or a migration fails to apply.
pub async fn run() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}

fn database_url() -> Result<SecretString, MigrationError> {
    std::env::var("VESTRA_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| MigrationError::MissingEnvVar("VESTRA_DATABASE_URL"))
}
