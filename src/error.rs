//! Custom errors and related types for the table store client.

use crate::store::error::{StoreError, TransportError};
use thiserror::Error;

/// A convenience `Result` type that may contain a `ClientError`. Used by every
/// operation that talks to the store or validates operator input.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ClientError {
    /// Local precondition failure, raised before any request is sent
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// The store answered with a non-success status
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The store could not be reached
    #[error("disconnected: {0}")]
    Transport(#[from] TransportError),

    /// The store answered with a body that is not the expected JSON shape
    #[error("malformed store response: {0}")]
    Decode(String),

    /// The configuration file could not be read or parsed
    #[error("configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Whether this error means the store is unreachable rather than
    /// refusing a request.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }
}

/// Failures detected locally from the operator's input or the session state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("expected {expected} values to match the schema, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    #[error("name must not be blank")]
    EmptyName,

    #[error("a table needs at least one column")]
    NoColumns,

    #[error("select two tables to intersect")]
    MissingIntersectionTable,

    #[error("cannot intersect table `{0}` with itself")]
    SameIntersectionTable(String),

    #[error("no table is selected")]
    NoTableSelected,

    #[error("column index {index} is out of range for {len} columns")]
    ColumnOutOfRange { index: usize, len: usize },

    #[error("no record is being edited")]
    NotEditing,

    #[error("record `{0}` is not in the current table")]
    UnknownRecord(String),

    #[error("there is no intersection result to save")]
    NothingToSave,

    #[error("action not confirmed")]
    NotConfirmed,
}
