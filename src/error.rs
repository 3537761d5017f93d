use thiserror::Error;

use crate::domain::todo::Field;

/// Failure of a single call against the remote todo collection.
#[derive(Debug, Error)]
pub enum CollectionError {
    /// The request never reached the server or no response came back.
    #[error("network error: {0}")]
    Network(String),
    #[error("server responded with {status}: {body}")]
    Server { status: u16, body: String },
    #[error("could not decode response: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to fetch todos: {0}")]
    Fetch(#[source] CollectionError),
    #[error("failed to add todo: {0}")]
    Create(#[source] CollectionError),
    #[error("failed to update todo: {0}")]
    Update(#[source] CollectionError),
    #[error("failed to delete todo: {0}")]
    Delete(#[source] CollectionError),
    #[error("{0} must not be empty")]
    EmptyField(Field),
    #[error("unknown form field `{0}`")]
    UnknownField(String),
    #[error("draft is not in {expected} mode")]
    WrongMode { expected: &'static str },
    #[error("background request ended without handing the state back")]
    WorkerLost,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value `{value}` for {key}: {reason}")]
    Invalid { key: &'static str, value: String, reason: String },
}
