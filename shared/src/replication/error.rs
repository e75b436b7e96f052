use thiserror::Error;

/// Errors returned when the replication tracker is handed keys it doesn't know
/// about, or asked to create something that already exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplicationError {
    /// Attempted to register an entity twice
    #[error("Entity {entity_id} is already registered with the tracker")]
    EntityAlreadyRegistered { entity_id: String },

    /// Attempted to operate on an entity that was never registered, or was destroyed
    #[error("Entity {entity_id} is not registered with the tracker")]
    EntityNotRegistered { entity_id: String },

    /// Attempted to add the same connection twice
    #[error("Connection {connection} has already been added")]
    ConnectionAlreadyAdded { connection: u64 },

    /// Attempted to operate on a connection that was never added, or was removed
    #[error("Connection {connection} not found")]
    ConnectionNotFound { connection: u64 },

    /// A binding already exists for this (entity, connection) pair
    #[error("Entity {entity_id} is already bound to connection {connection}")]
    AlreadyBound { entity_id: String, connection: u64 },

    /// No binding exists for this (entity, connection) pair
    #[error("Entity {entity_id} is not bound to connection {connection}")]
    NotBound { entity_id: String, connection: u64 },
}
