//! Embedded persistence for alias to URL mappings.
//!
//! Callers open a [`UrlStore`] once and share it; every operation is a single
//! SQLite statement whose failures are reported as [`RepoError`] kinds.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{DbError, DbResult, OpenStage, StoreOptions};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::url_record::{RecordId, UrlRecord};
pub use repo::url_repo::{
    RepoError, RepoErrorKind, RepoResult, SqliteUrlRepository, UrlRepository,
};
pub use service::url_store::UrlStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
