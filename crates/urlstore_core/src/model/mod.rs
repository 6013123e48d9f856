//! Domain model for alias to URL mappings.
//!
//! # Invariants
//! - Records are immutable once persisted.
//! - Deletion is a hard delete; there are no tombstones.

pub mod url_record;
