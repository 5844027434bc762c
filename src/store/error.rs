//! Errors raised while talking to the store over HTTP.

use thiserror::Error;

/// The store could not be reached at all. Surfaced to the operator as
/// "disconnected"; never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportError {
    #[error("store unreachable: {0}")]
    Unreachable(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() {
            TransportError::Unreachable(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

/// The store answered but refused the request. `message` is the response
/// body, passed to the operator verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreError {
    #[error("status {status}: {message}")]
    Status { status: u16, message: String },
}
