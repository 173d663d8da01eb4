use reqwest::StatusCode;
use thiserror::Error;

/// Failure of one remote operation against the admin backend. Callers get
/// the detail; the controller itself never retries or rolls back.
#[derive(Debug, Error)]
pub enum AdminApiError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned status {status}")]
    Status { url: String, status: StatusCode },
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("icon attachment rejected: {0}")]
    Attachment(reqwest::Error),
}

impl AdminApiError {
    /// True when the backend answered at all (some failures never reach it).
    pub fn reached_backend(&self) -> bool {
        matches!(
            self,
            AdminApiError::Status { .. } | AdminApiError::Decode { .. }
        )
    }
}
