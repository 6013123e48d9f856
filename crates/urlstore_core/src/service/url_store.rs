//! Shared URL store handle.
//!
//! # Responsibility
//! - Own the database connection for the lifetime of the handle.
//! - Expose create/resolve/delete to concurrent callers.
//! - Emit one metadata-only log event per operation.
//!
//! # Invariants
//! - Each operation runs exactly one statement; nothing is retried.
//! - URLs are never written to logs.

use crate::db::{open_db, open_db_in_memory, open_db_with_options, DbResult, StoreOptions};
use crate::model::url_record::{RecordId, UrlRecord};
use crate::repo::url_repo::{RepoError, RepoResult, SqliteUrlRepository, UrlRepository};
use log::{debug, error};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

/// Thread-safe handle over one SQLite connection.
///
/// `rusqlite::Connection` is not `Sync`, so calls are serialized on the
/// connection, which matches SQLite's single-writer model. Share the handle
/// with `Arc<UrlStore>` or plain references.
pub struct UrlStore {
    conn: Mutex<Connection>,
}

impl UrlStore {
    /// Opens (creating if absent) the database at `path` and ensures the schema.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    pub fn open_with_options(path: impl AsRef<Path>, options: StoreOptions) -> DbResult<Self> {
        Ok(Self::from_connection(open_db_with_options(path, options)?))
    }

    /// Opens a private in-memory store, mainly for tests.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps a connection already returned by one of the `db::open_*` helpers.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Registers `alias` for `url` and returns the new record id.
    pub fn create(&self, url: &str, alias: &str) -> RepoResult<RecordId> {
        self.run("url_create", alias, |repo| repo.create_url(url, alias))
    }

    /// Returns the URL registered for `alias`.
    pub fn resolve(&self, alias: &str) -> RepoResult<String> {
        self.run("url_resolve", alias, |repo| repo.resolve_url(alias))
    }

    /// Removes `alias`; fails with `NotFound` when nothing was removed.
    pub fn delete(&self, alias: &str) -> RepoResult<()> {
        self.run("url_delete", alias, |repo| repo.delete_url(alias))
    }

    fn run<T>(
        &self,
        event: &str,
        alias: &str,
        op: impl FnOnce(&SqliteUrlRepository<'_>) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let started_at = Instant::now();
        // A panic mid-call cannot leave a half-applied statement behind, so a
        // poisoned lock still guards a usable connection.
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let result = op(&SqliteUrlRepository::new(&conn));
        drop(conn);

        let duration_ms = started_at.elapsed().as_millis();
        match &result {
            Ok(_) => debug!(
                "event={event} module=store status=ok alias_len={} duration_ms={duration_ms}",
                alias.len()
            ),
            Err(RepoError::Storage { op, source }) => error!(
                "event={event} module=store status=error alias_len={} duration_ms={duration_ms} error_code=storage_failure op={op} error={source}",
                alias.len()
            ),
            Err(err) => debug!(
                "event={event} module=store status=rejected alias_len={} duration_ms={duration_ms} error_code={}",
                alias.len(),
                rejection_code(err)
            ),
        }

        result
    }
}

impl UrlRepository for UrlStore {
    fn create_url(&self, url: &str, alias: &str) -> RepoResult<RecordId> {
        self.create(url, alias)
    }

    fn resolve_url(&self, alias: &str) -> RepoResult<String> {
        self.resolve(alias)
    }

    fn delete_url(&self, alias: &str) -> RepoResult<()> {
        self.delete(alias)
    }

    fn get_record(&self, alias: &str) -> RepoResult<Option<UrlRecord>> {
        self.run("url_get_record", alias, |repo| repo.get_record(alias))
    }
}

fn rejection_code(err: &RepoError) -> &'static str {
    match err {
        RepoError::AliasExists(_) => "alias_exists",
        RepoError::NotFound(_) => "not_found",
        RepoError::Storage { .. } => "storage_failure",
    }
}

#[cfg(test)]
mod tests {
    use super::UrlStore;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn store_is_shareable_across_threads() {
        assert_send_sync::<UrlStore>();
    }
}
