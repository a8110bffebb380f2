//! Connection helpers.
//!
//! SQLite is always available; PostgreSQL is compiled in with the `postgres` feature.
//! Bare paths, `:memory:`, `sqlite:` and `sqlite://` URLs all select SQLite.

#[cfg(feature = "postgres")]
use diesel::PgConnection;
use diesel::{Connection, SqliteConnection, connection::SimpleConnection};

use crate::errors::StoreError;

/// Backend selected by a database URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// File or in-memory SQLite database.
    Sqlite,
    /// PostgreSQL server.
    Postgres,
}

impl Backend {
    /// Classify `database_url` by its scheme.
    pub fn for_url(database_url: &str) -> Self {
        if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
            Backend::Postgres
        } else {
            Backend::Sqlite
        }
    }
}

/// An open connection to whichever backend the URL named.
pub enum StoreConnection {
    /// SQLite connection with PRAGMAs applied.
    Sqlite(SqliteConnection),
    /// PostgreSQL connection.
    #[cfg(feature = "postgres")]
    Postgres(PgConnection),
}

/// Strip `sqlite://` or `sqlite:` so Diesel sees a plain path.
pub fn sqlite_path(database_url: &str) -> &str {
    database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url)
}

/// Open a SQLite connection and apply connection-wide PRAGMAs.
pub fn connect_sqlite(database_url: &str) -> Result<SqliteConnection, StoreError> {
    let mut conn = SqliteConnection::establish(sqlite_path(database_url))?;

    // WAL for concurrent readers; busy_timeout so a second writer waits instead of failing
    conn.batch_execute(
        "PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON; PRAGMA busy_timeout=5000;",
    )?;
    Ok(conn)
}

/// Open a PostgreSQL connection.
#[cfg(feature = "postgres")]
pub fn connect_postgres(database_url: &str) -> Result<PgConnection, StoreError> {
    Ok(PgConnection::establish(database_url)?)
}

/// Open a connection for `database_url`, dispatching on [`Backend::for_url`].
pub fn open(database_url: &str) -> Result<StoreConnection, StoreError> {
    match Backend::for_url(database_url) {
        Backend::Sqlite => connect_sqlite(database_url).map(StoreConnection::Sqlite),
        #[cfg(feature = "postgres")]
        Backend::Postgres => connect_postgres(database_url).map(StoreConnection::Postgres),
        #[cfg(not(feature = "postgres"))]
        Backend::Postgres => Err(StoreError::UnsupportedBackend("postgres")),
    }
}
