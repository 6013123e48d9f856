//! Repository layer for alias records.
//!
//! # Responsibility
//! - Define the data access contract used by the store handle.
//! - Keep SQL and driver error codes inside the persistence boundary.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`AliasExists`, `NotFound`)
//!   distinct from storage transport errors.

pub mod url_repo;
