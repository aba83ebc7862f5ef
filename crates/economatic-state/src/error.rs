//! Failures reading or writing snapshots and run-state.

use thiserror::Error;

pub type StateResult<T> = Result<T, StateError>;

/// A state store failure. Each variant carries the underlying redb or
/// serde_json message.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("cannot open state database: {0}")]
    Open(String),

    #[error("state transaction failed: {0}")]
    Transaction(String),

    #[error("cannot open state table: {0}")]
    Table(String),

    #[error("state read failed: {0}")]
    Read(String),

    #[error("state write failed: {0}")]
    Write(String),

    #[error("cannot encode record: {0}")]
    Serialize(String),

    #[error("cannot decode stored record: {0}")]
    Deserialize(String),
}
