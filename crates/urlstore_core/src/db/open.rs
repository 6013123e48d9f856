//! Connection bootstrap for the URL store database.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Ping the connection before it is handed out.
//! - Create the schema before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have the busy timeout from `StoreOptions` applied.
//! - Returned connections have the `url` schema in place.

use super::migrations::apply_migrations;
use super::{DbError, DbResult, StoreOptions};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::Instant;

/// Opens (creating if absent) a SQLite database file with default options.
///
/// # Side effects
/// - Creates the file on disk when it does not exist yet.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_db_with_options(path, StoreOptions::default())
}

/// Opens a SQLite database file with explicit connection options.
pub fn open_db_with_options(path: impl AsRef<Path>, options: StoreOptions) -> DbResult<Connection> {
    let path = path.as_ref();
    open_with("file", options, || Connection::open(path))
}

/// Opens a private in-memory database with the schema applied.
///
/// Every call yields an independent database; nothing is shared between
/// handles.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", StoreOptions::default(), Connection::open_in_memory)
}

fn open_with(
    mode: &str,
    options: StoreOptions,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let result = connect()
        .map_err(DbError::OpenFailed)
        .and_then(|mut conn| bootstrap_connection(&mut conn, options).map(|()| conn));

    match result {
        Ok(conn) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code={} error={}",
                started_at.elapsed().as_millis(),
                error_code(&err),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection, options: StoreOptions) -> DbResult<()> {
    ping(conn).map_err(DbError::ConnectivityFailed)?;
    conn.busy_timeout(options.busy_timeout)
        .map_err(DbError::ConnectivityFailed)?;

    match apply_migrations(conn) {
        Ok(()) => Ok(()),
        Err(DbError::Sqlite(err)) => Err(DbError::SchemaInitFailed(err)),
        Err(err) => Err(err),
    }
}

// Reading sqlite_master forces the header and schema page to load, so a file
// that is not a database fails here rather than on the first insert.
fn ping(conn: &Connection) -> rusqlite::Result<()> {
    conn.query_row("SELECT COUNT(*) FROM sqlite_master;", [], |row| {
        row.get::<_, i64>(0)
    })?;
    Ok(())
}

fn error_code(err: &DbError) -> &'static str {
    match err {
        DbError::OpenFailed(_) => "db_open_failed",
        DbError::ConnectivityFailed(_) => "db_ping_failed",
        DbError::SchemaInitFailed(_) => "db_schema_init_failed",
        DbError::UnsupportedSchemaVersion { .. } => "db_schema_version_unsupported",
        DbError::Sqlite(_) => "db_bootstrap_failed",
    }
}
