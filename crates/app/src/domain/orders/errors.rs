//! Orders service errors.

use thiserror::Error;

use crate::persistence::PersistenceError;

/// Orders service error variants.
#[derive(Debug, Error)]
pub enum OrdersServiceError {
    /// Order could not be encoded for the backend.
    #[error("failed to encode order")]
    Encode(#[source] serde_json::Error),

    /// Backend rejected or failed the insert.
    #[error("failed to write order")]
    Persistence(#[from] PersistenceError),
}

impl From<serde_json::Error> for OrdersServiceError {
    fn from(error: serde_json::Error) -> Self {
        Self::Encode(error)
    }
}
