//! Sync error handling
//!
//! Every transport-level failure is recoverable by reconnecting, so the
//! error set is small: setup problems, plus the transport faults the
//! connection task collapses into a close-and-retry.

use thiserror::Error;

/// Errors that can occur while setting up or running a sync session
#[derive(Error, Debug)]
pub enum SyncError {
    /// The hosting page URL could not be turned into a session config
    #[error("Invalid page URL '{url}': {reason}")]
    InvalidPageUrl { url: String, reason: String },

    /// Underlying WebSocket failure
    #[error("Transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),
}

/// Result type for sync operations
pub type SyncResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_display() {
        let err = SyncError::InvalidPageUrl {
            url: "not a url".to_string(),
            reason: "relative URL without a base".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("Invalid page URL"));
        assert!(msg.contains("not a url"));
    }
}
