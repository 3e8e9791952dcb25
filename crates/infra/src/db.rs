//! SQLite connection pool and schema migrations.

use std::str::FromStr;

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::store::StoreError;

/// `DB_PATH` value selecting a private in-memory database.
pub const IN_MEMORY: &str = ":memory:";

const MAX_CONNECTIONS: u32 = 5;

/// Versioned schema scripts under `crates/infra/migrations`.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Open (creating if needed) the database at `db_path` and bring its schema up to date.
///
/// An in-memory database lives only as long as its connection, so that case
/// is pinned to a single connection that never expires.
pub async fn connect(db_path: &str) -> Result<SqlitePool, StoreError> {
    let connected = if db_path == IN_MEMORY {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| StoreError::Database { operation: "connect", source: e })?;
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
    } else {
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);
        SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await
    };
    let pool = connected.map_err(|e| StoreError::Database { operation: "connect", source: e })?;

    MIGRATOR.run(&pool).await?;
    tracing::info!(db_path, "database ready");
    Ok(pool)
}
