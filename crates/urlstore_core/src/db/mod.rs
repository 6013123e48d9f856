//! SQLite storage bootstrap for the URL store.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections and verify they are usable.
//! - Create the `url` schema before any record is read or written.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Open failures report the stage that failed (open, connectivity, schema).

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory, open_db_with_options};

pub type DbResult<T> = Result<T, DbError>;

/// Default time a statement waits on a locked database before failing.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings applied while opening a database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// How long a statement blocks on `SQLITE_BUSY` before surfacing an error.
    pub busy_timeout: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }
}

/// Bootstrap stage at which opening a database failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenStage {
    Open,
    Connectivity,
    SchemaInit,
}

impl Display for OpenStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Connectivity => write!(f, "connectivity"),
            Self::SchemaInit => write!(f, "schema_init"),
        }
    }
}

#[derive(Debug)]
pub enum DbError {
    OpenFailed(rusqlite::Error),
    ConnectivityFailed(rusqlite::Error),
    SchemaInitFailed(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    Sqlite(rusqlite::Error),
}

impl DbError {
    /// Returns the bootstrap stage for startup failures, `None` otherwise.
    pub fn stage(&self) -> Option<OpenStage> {
        match self {
            Self::OpenFailed(_) => Some(OpenStage::Open),
            Self::ConnectivityFailed(_) => Some(OpenStage::Connectivity),
            Self::SchemaInitFailed(_) | Self::UnsupportedSchemaVersion { .. } => {
                Some(OpenStage::SchemaInit)
            }
            Self::Sqlite(_) => None,
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenFailed(err) => write!(f, "failed to open database: {err}"),
            Self::ConnectivityFailed(err) => write!(f, "failed to ping database: {err}"),
            Self::SchemaInitFailed(err) => write!(f, "failed to initialize schema: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::OpenFailed(err)
            | Self::ConnectivityFailed(err)
            | Self::SchemaInitFailed(err)
            | Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{DbError, OpenStage, StoreOptions, DEFAULT_BUSY_TIMEOUT};

    #[test]
    fn stage_is_reported_only_for_startup_failures() {
        let schema = DbError::UnsupportedSchemaVersion {
            db_version: 7,
            latest_supported: 1,
        };
        assert_eq!(schema.stage(), Some(OpenStage::SchemaInit));

        let runtime = DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows);
        assert_eq!(runtime.stage(), None);

        let open = DbError::OpenFailed(rusqlite::Error::InvalidQuery);
        assert_eq!(open.stage(), Some(OpenStage::Open));
    }

    #[test]
    fn default_options_use_five_second_busy_timeout() {
        assert_eq!(StoreOptions::default().busy_timeout, DEFAULT_BUSY_TIMEOUT);
    }
}
