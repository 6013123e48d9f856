//! URL repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/resolve/delete APIs over the `url` table.
//! - Translate driver failures into domain error kinds.
//!
//! # Invariants
//! - Alias matching is exact and case-sensitive (`BINARY` collation).
//! - A uniqueness violation is recognized from the extended result code,
//!   never from the error message.
//! - `delete_url` reports `NotFound` when no row was removed.

use crate::db::DbError;
use crate::model::url_record::{RecordId, UrlRecord};
use rusqlite::{ffi, params, Connection, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Coarse classification of a `RepoError`, for callers mapping failures to
/// responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoErrorKind {
    AliasExists,
    NotFound,
    StorageFailure,
}

/// Repository error for alias persistence and lookup.
#[derive(Debug)]
pub enum RepoError {
    /// The alias is already registered.
    AliasExists(String),
    /// No record carries the alias.
    NotFound(String),
    /// Any other driver or I/O failure, tagged with the operation name.
    Storage { op: &'static str, source: DbError },
}

impl RepoError {
    pub fn kind(&self) -> RepoErrorKind {
        match self {
            Self::AliasExists(_) => RepoErrorKind::AliasExists,
            Self::NotFound(_) => RepoErrorKind::NotFound,
            Self::Storage { .. } => RepoErrorKind::StorageFailure,
        }
    }

    fn storage(op: &'static str) -> impl Fn(rusqlite::Error) -> Self {
        move |err| Self::Storage {
            op,
            source: DbError::Sqlite(err),
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AliasExists(alias) => write!(f, "alias already exists: {alias}"),
            Self::NotFound(alias) => write!(f, "alias not found: {alias}"),
            Self::Storage { op, source } => write!(f, "url_repo.{op}: {source}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::AliasExists(_) | Self::NotFound(_) => None,
            Self::Storage { source, .. } => Some(source),
        }
    }
}

/// Repository interface for alias records.
pub trait UrlRepository {
    fn create_url(&self, url: &str, alias: &str) -> RepoResult<RecordId>;
    fn resolve_url(&self, alias: &str) -> RepoResult<String>;
    fn delete_url(&self, alias: &str) -> RepoResult<()>;
    fn get_record(&self, alias: &str) -> RepoResult<Option<UrlRecord>>;
}

/// SQLite-backed URL repository over a borrowed connection.
pub struct SqliteUrlRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUrlRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UrlRepository for SqliteUrlRepository<'_> {
    fn create_url(&self, url: &str, alias: &str) -> RepoResult<RecordId> {
        const OP: &str = "create_url";

        let mut stmt = self
            .conn
            .prepare_cached("INSERT INTO url (url, alias) VALUES (?1, ?2);")
            .map_err(RepoError::storage(OP))?;

        match stmt.execute(params![url, alias]) {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(err) if is_unique_violation(&err) => Err(RepoError::AliasExists(alias.to_string())),
            Err(err) => Err(RepoError::storage(OP)(err)),
        }
    }

    fn resolve_url(&self, alias: &str) -> RepoResult<String> {
        const OP: &str = "resolve_url";

        let mut stmt = self
            .conn
            .prepare_cached("SELECT url FROM url WHERE alias = ?1;")
            .map_err(RepoError::storage(OP))?;
        let mut rows = stmt.query([alias]).map_err(RepoError::storage(OP))?;

        let Some(row) = rows.next().map_err(RepoError::storage(OP))? else {
            return Err(RepoError::NotFound(alias.to_string()));
        };
        let url: String = row.get(0).map_err(RepoError::storage(OP))?;
        Ok(url)
    }

    fn delete_url(&self, alias: &str) -> RepoResult<()> {
        const OP: &str = "delete_url";

        let changed = self
            .conn
            .prepare_cached("DELETE FROM url WHERE alias = ?1;")
            .and_then(|mut stmt| stmt.execute([alias]))
            .map_err(RepoError::storage(OP))?;

        if changed == 0 {
            return Err(RepoError::NotFound(alias.to_string()));
        }

        Ok(())
    }

    fn get_record(&self, alias: &str) -> RepoResult<Option<UrlRecord>> {
        const OP: &str = "get_record";

        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, alias, url FROM url WHERE alias = ?1;")
            .map_err(RepoError::storage(OP))?;
        let mut rows = stmt.query([alias]).map_err(RepoError::storage(OP))?;

        let Some(row) = rows.next().map_err(RepoError::storage(OP))? else {
            return Ok(None);
        };

        let record = UrlRecord {
            id: row.get("id").map_err(RepoError::storage(OP))?,
            alias: row.get("alias").map_err(RepoError::storage(OP))?,
            url: row.get("url").map_err(RepoError::storage(OP))?,
        };
        Ok(Some(record))
    }
}

/// Returns true when `err` is a `UNIQUE` constraint violation.
///
/// Only `url.alias` carries a unique constraint; `id` is auto-assigned and
/// never conflicts on insert.
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => {
            failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
        }
        _ => false,
    }
}
