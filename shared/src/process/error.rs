use thiserror::Error;

/// Errors returned by `ProcessList` operations given a stale or unknown key
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessError {
    /// The key names a participant that was removed, or never existed
    #[error("Participant {key} not found in process list")]
    ParticipantNotFound { key: String },

    /// The dependency target names a participant that was removed, or never existed
    #[error("Cannot make {key} process after {target} - target not found in process list")]
    DependencyNotFound { key: String, target: String },
}
