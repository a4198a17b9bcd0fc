use crate::error::DbError;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::time::Duration;

/// Establishes a connection pool to the SQLite warehouse.
///
/// URLs follow the `sqlite:<path>?mode=rwc` convention: the database file is
/// created on first use. The parent directory is created here because SQLite
/// only creates the file, never the directories above it.
pub async fn connect(database_url: &str) -> Result<SqlitePool, DbError> {
    ensure_parent_dir(database_url)?;

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Single-connection in-memory database for tests and dry runs. A larger pool
/// would hand each connection its own private empty database.
pub async fn connect_in_memory() -> Result<SqlitePool, DbError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    Ok(pool)
}

/// A utility function to run database migrations automatically.
///
/// This is useful for ensuring the warehouse schema is up-to-date when the
/// application starts, which also lets a fresh checkout run end to end.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
    // Use a relative path from the crate root
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

fn ensure_parent_dir(database_url: &str) -> Result<(), DbError> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);
    let path = path.split('?').next().unwrap_or(path);

    if path.is_empty() || path == ":memory:" {
        return Ok(());
    }
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| DbError::ConnectionConfigError(e.to_string()))?;
        }
    }
    Ok(())
}
