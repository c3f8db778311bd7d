use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    ConnectOptions, PgPool,
};
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the storage layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// True when the error is a PostgreSQL unique-constraint violation.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            DatabaseError::Sqlx(sqlx::Error::Database(db)) => db.code().as_deref() == Some("23505"),
            _ => false,
        }
    }
}

/// Owner of the process-wide connection pool
pub struct DatabaseManager;

impl DatabaseManager {
    fn slot() -> &'static OnceLock<PgPool> {
        static POOL: OnceLock<PgPool> = OnceLock::new();
        &POOL
    }

    /// Get the shared pool, creating it on first use from the global config.
    ///
    /// The pool connects lazily so the server can start (and report a
    /// degraded `/health`) before PostgreSQL is reachable.
    pub fn pool() -> Result<PgPool, DatabaseError> {
        if let Some(pool) = Self::slot().get() {
            return Ok(pool.clone());
        }
        let pool = Self::connect_lazy(&crate::config::config().database)?;
        Ok(Self::slot().get_or_init(|| pool).clone())
    }

    /// Build a lazily-connecting pool from explicit settings.
    pub fn connect_lazy(settings: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let url = settings
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;
        let parsed = url::Url::parse(url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;

        let mut options: PgConnectOptions = url.parse().map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if !settings.enable_query_logging {
            options = options.disable_statement_logging();
        }

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(Duration::from_secs(settings.connection_timeout))
            .connect_lazy_with(options);

        info!(database = %Self::redact(&parsed), "Created database pool");
        Ok(pool)
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    /// Apply the embedded migrations
    pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Connection string with the password masked, for logs
    fn redact(url: &url::Url) -> String {
        let mut masked = url.clone();
        if masked.password().is_some() {
            let _ = masked.set_password(Some("****"));
        }
        masked.to_string()
    }
}
