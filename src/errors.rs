use crate::event::UserId;
use thiserror::Error;

/// Rejection of a submitted event. The messages are part of the wire contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing field: {0}")]
    MissingField(&'static str),
    #[error("Invalid action type. Must be 'deposit' or 'withdraw'.")]
    InvalidKind,
    #[error("Invalid amount. Must be a valid number.")]
    InvalidAmountFormat,
    #[error("Amount cannot be negative.")]
    NegativeAmount,
    #[error("Invalid user_id. Must be an integer.")]
    InvalidUserId,
    #[error("Invalid time. Must be an integer.")]
    InvalidTimestamp,
    #[error("Time must be sequential and increasing.")]
    NonSequentialTime,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("monitor for user {0} is unavailable")]
    MonitorUnavailable(UserId),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("MONITOR_PORT must be a port number, got {0:?}")]
    InvalidPort(String),
}

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("malformed JSON in record {record}: {source}")]
    Json {
        record: usize,
        source: serde_json::Error,
    },
    #[error("failed to write output: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Engine(#[from] EngineError),
}
