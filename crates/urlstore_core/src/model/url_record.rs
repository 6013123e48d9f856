//! Persisted alias record.

use serde::{Deserialize, Serialize};

/// Row identifier assigned by the store on creation.
pub type RecordId = i64;

/// One `(id, alias, url)` row of the `url` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// Auto-assigned primary key. Callers look records up by alias, not id.
    pub id: RecordId,
    /// Unique, case-sensitive key.
    pub alias: String,
    /// Destination address, stored verbatim.
    pub url: String,
}

impl UrlRecord {
    pub fn new(id: RecordId, alias: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id,
            alias: alias.into(),
            url: url.into(),
        }
    }
}
