//! Session error types.
//!
//! Mode-transition and quota violations are returned to the caller; per-tick
//! pipeline errors never surface here — the tick handler degrades them to
//! "no detection" and keeps the session alive.

use thiserror::Error;

use refind_core::SessionMode;
use refind_embeddings::EmbeddingError;

/// Errors from session control operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Teaching is blocked because the learned-item quota is reached.
    #[error("item quota reached ({quota}); delete an item first")]
    QuotaExceeded {
        /// The configured quota.
        quota: usize,
    },

    /// The requested item does not exist.
    #[error("unknown item: {id}")]
    UnknownItem {
        /// The missing item ID.
        id: String,
    },

    /// The operation is not valid in the current mode.
    #[error("cannot {attempted} while in {current:?} mode")]
    InvalidTransition {
        /// The controller's current mode.
        current: SessionMode,
        /// What the caller tried to do.
        attempted: &'static str,
    },

    /// The embedding engine failed initialization; no teach or search is
    /// possible.
    #[error("embedding engine unavailable")]
    EmbedderUnavailable,

    /// The item label names contraband the finder refuses to locate.
    #[error("label not allowed: {label}")]
    DisallowedLabel {
        /// The rejected label.
        label: String,
    },

    /// Teaching cannot complete without at least one captured photo.
    #[error("teaching incomplete: no photos captured")]
    TeachIncomplete,

    /// An embedding operation failed.
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    /// `SQLite` error (preserves source chain).
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Item storage operation failed (non-SQLite).
    #[error("storage failed: {0}")]
    Storage(String),
}

/// Result alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn display_variants() {
        assert_eq!(
            SessionError::QuotaExceeded { quota: 1 }.to_string(),
            "item quota reached (1); delete an item first"
        );
        assert_eq!(
            SessionError::UnknownItem { id: "x".into() }.to_string(),
            "unknown item: x"
        );
        assert_eq!(
            SessionError::EmbedderUnavailable.to_string(),
            "embedding engine unavailable"
        );
        assert_eq!(
            SessionError::TeachIncomplete.to_string(),
            "teaching incomplete: no photos captured"
        );
    }

    #[test]
    fn invalid_transition_names_mode() {
        let err = SessionError::InvalidTransition {
            current: SessionMode::Search,
            attempted: "start teaching",
        };
        let msg = err.to_string();
        assert!(msg.contains("start teaching"));
        assert!(msg.contains("Search"));
    }

    #[test]
    fn embedding_error_is_transparent() {
        let err: SessionError = EmbeddingError::Unavailable.into();
        assert_eq!(err.to_string(), "Embedding model unavailable");
    }

    #[test]
    fn sqlite_error_preserves_source() {
        let err: SessionError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(err.source().is_some());
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SessionError>();
    }
}
