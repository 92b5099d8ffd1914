//! Error type for persistence operations
//!
//! Per-object failures are isolated: batch loads log and continue past a
//! bad resource, so these errors surface only from single-object calls.

use mapwright_domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Resource unreadable or unwritable
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// Resource content is not a valid flat key-value record
    #[error("Malformed resource {collection}/{name}: {source}")]
    Format {
        collection: String,
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// The named resource does not exist in its collection
    #[error("Resource not found: {collection}/{name}")]
    NotFound { collection: String, name: String },

    /// A domain invariant rejected decoded data (e.g. map dimensions)
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl StoreError {
    pub fn not_found(collection: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            collection: collection.into(),
            name: name.into(),
        }
    }

    pub fn format(
        collection: impl Into<String>,
        name: impl Into<String>,
        source: serde_json::Error,
    ) -> Self {
        Self::Format {
            collection: collection.into(),
            name: name.into(),
            source,
        }
    }
}
