//! Embedded schema migrations.
//!
//! Every statement is `CREATE ... IF NOT EXISTS`, so running against a database that
//! already has the tables leaves their data untouched.

use anyhow::anyhow;
#[cfg(feature = "postgres")]
use diesel::PgConnection;
#[cfg(feature = "postgres")]
use diesel::Connection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::db::connection::{Backend, connect_sqlite};

/// SQLite migrations bundled with this crate.
pub const SQLITE_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/sqlite");

/// PostgreSQL migrations bundled with this crate.
#[cfg(feature = "postgres")]
pub const POSTGRES_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/postgres");

/// Runs pending migrations on a SQLite database, returning the versions applied.
pub fn run_sqlite(url: &str) -> anyhow::Result<Vec<String>> {
    let mut conn = connect_sqlite(url)?;
    let applied = conn
        .run_pending_migrations(SQLITE_MIGRATIONS)
        .map_err(|e| anyhow!(e))?;

    Ok(applied.iter().map(ToString::to_string).collect())
}

/// Runs pending migrations on a PostgreSQL database, returning the versions applied.
#[cfg(feature = "postgres")]
pub fn run_postgres(url: &str) -> anyhow::Result<Vec<String>> {
    let mut conn = PgConnection::establish(url)?;
    let applied = conn
        .run_pending_migrations(POSTGRES_MIGRATIONS)
        .map_err(|e| anyhow!(e))?;

    Ok(applied.iter().map(ToString::to_string).collect())
}

/// Runs pending migrations for `database_url` on whichever backend it names.
pub fn run_all(database_url: &str) -> anyhow::Result<Vec<String>> {
    match Backend::for_url(database_url) {
        Backend::Sqlite => run_sqlite(database_url),
        #[cfg(feature = "postgres")]
        Backend::Postgres => run_postgres(database_url),
        #[cfg(not(feature = "postgres"))]
        Backend::Postgres => {
            anyhow::bail!("PostgreSQL support is not compiled in; rebuild with --features postgres")
        }
    }
}
