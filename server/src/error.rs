use thiserror::Error;

use tether_shared::{ReplicationError, SequenceError, Tick};

/// Errors returned when buffering a connection's inputs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// Inputs were received for a connection that was never added, or was removed
    #[error("No input buffer for connection {connection}")]
    ConnectionNotFound { connection: u64 },

    /// The input's tick was already consumed by the simulation
    #[error("Input for tick {tick} arrived after tick {last_consumed} was consumed")]
    StaleInput { tick: Tick, last_consumed: Tick },

    /// Another input is already buffered for the same tick
    #[error(transparent)]
    Duplicate(#[from] SequenceError),
}

/// Errors returned by `ReplicationHost`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("User {connection} not found")]
    UserNotFound { connection: u64 },

    #[error("User {connection} already exists")]
    UserAlreadyExists { connection: u64 },

    #[error(transparent)]
    Replication(#[from] ReplicationError),
}
