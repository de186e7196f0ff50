use thiserror::Error;

pub type Result<T> = std::result::Result<T, QueueError>;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Ticket not found: {0}")]
    TicketNotFound(String),

    #[error("Invalid ticket state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Invalid ticket ID format: {0}")]
    InvalidTicketId(String),

    #[error("Unknown ticket state: {0}")]
    InvalidState(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Coarse classification adapters use to pick a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    InvalidTransition,
    Internal,
}

impl QueueError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            // An id that cannot be parsed can never reference a live ticket
            Self::TicketNotFound(_) | Self::InvalidTicketId(_) => ErrorKind::NotFound,
            Self::InvalidTransition { .. } | Self::InvalidState(_) => {
                ErrorKind::InvalidTransition
            }
            Self::StorageError(_)
            | Self::IoError(_)
            | Self::SerializationError(_)
            | Self::ConfigError(_) => ErrorKind::Internal,
        }
    }

    /// True when the caller's input was at fault and the store is unchanged
    pub fn is_rejection(&self) -> bool {
        self.kind() != ErrorKind::Internal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            QueueError::Validation("name".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            QueueError::TicketNotFound("T1".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            QueueError::InvalidTicketId("x".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            QueueError::InvalidState("done".into()).kind(),
            ErrorKind::InvalidTransition
        );
        assert_eq!(
            QueueError::StorageError("disk".into()).kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn test_rejections_are_not_internal() {
        let err = QueueError::InvalidTransition {
            from: "waiting".into(),
            to: "served".into(),
        };
        assert!(err.is_rejection());
        assert!(!QueueError::ConfigError("bad".into()).is_rejection());
        assert_eq!(
            err.to_string(),
            "Invalid ticket state transition from waiting to served"
        );
    }
}
