/// Error type for refresh operations.
///
/// This is the only error originating in the cache itself. It is `Clone` so a
/// single flight's outcome can be delivered to every caller waiting on it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RefreshError {
    /// The caller-supplied refresh function failed.
    #[error("refresh for key '{key}' failed: {message}")]
    Origin { key: String, message: String },
    /// The refresh exceeded the configured upper bound.
    #[error("refresh for key '{key}' timed out after {timeout_ms}ms")]
    Timeout { key: String, timeout_ms: u64 },
}

impl RefreshError {
    /// Create a new origin error.
    pub fn origin(key: impl Into<String>, message: impl Into<String>) -> Self {
        RefreshError::Origin {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout(key: impl Into<String>, timeout: std::time::Duration) -> Self {
        RefreshError::Timeout {
            key: key.into(),
            timeout_ms: timeout.as_millis() as u64,
        }
    }
}
