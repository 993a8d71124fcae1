use thiserror::Error;

/// Result type alias using KeelsonError
pub type Result<T> = std::result::Result<T, KeelsonError>;

/// Error taxonomy for aggregate persistence operations
///
/// Every failure is surfaced synchronously to the direct caller of the
/// save/remove/find operation. A `Conflict` on the root update aborts the
/// entire save before any child write is attempted; nothing is silently
/// swallowed and no partial-failure state is left ambiguous.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KeelsonError {
    /// Requested root entity does not exist. Never retried.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Optimistic-lock failure: an update or delete affected zero rows
    /// where exactly one was expected. The target row was modified or
    /// removed by another actor since the snapshot was taken, or it never
    /// existed. Carries the identity so the caller can reload and decide
    /// whether to retry; the core itself never retries.
    #[error("{entity} ({id}) was not found or was changed by another actor")]
    Conflict { entity: &'static str, id: String },

    /// An assigned identity was required but absent (invariant breach,
    /// not expected in normal operation)
    #[error("{entity} is missing an assigned identity")]
    MissingIdentity { entity: &'static str },

    /// Wrapped storage-driver failure
    #[error("Persistence error: {message}")]
    Persistence { message: String },

    /// Generic internal invariant breach
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl KeelsonError {
    /// Conflict error for the given entity kind and identity
    pub fn conflict(entity: &'static str, id: impl Into<String>) -> Self {
        KeelsonError::Conflict {
            entity,
            id: id.into(),
        }
    }

    /// NotFound error for the given entity kind and identity
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        KeelsonError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// True if this error reports an optimistic-lock conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, KeelsonError::Conflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_message_carries_identity() {
        let err = KeelsonError::conflict("order", "O001");
        assert!(err.to_string().contains("O001"));
        assert!(err.is_conflict());
    }

    #[test]
    fn test_not_found_is_not_conflict() {
        let err = KeelsonError::not_found("order", "missing");
        assert!(!err.is_conflict());
    }
}
