//! Store handle exposed to callers.
//!
//! # Responsibility
//! - Wrap repository calls behind a single shareable handle.
//! - Keep API layers decoupled from connection management.

pub mod url_store;
