use std::fmt;

/// Result type for quest-dqn operations
pub type Result<T> = std::result::Result<T, QuestError>;

/// Main error type for the simulator, network and trainers
#[derive(Debug, Clone)]
pub enum QuestError {
    /// Invalid dimensions for operations
    DimensionMismatch {
        expected: String,
        actual: String,
    },

    /// A named tensor is absent from a checkpoint
    MissingTensor(String),

    /// Invalid parameter value
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// IO errors (file operations)
    IoError(String),

    /// Serialization/deserialization errors
    SerializationError(String),

    /// Numerical computation errors
    NumericalError(String),

    /// Buffer holds fewer transitions than requested
    InsufficientSamples {
        requested: usize,
        available: usize,
    },

    /// Invalid action
    InvalidAction {
        action: usize,
        max_actions: usize,
    },
}

impl fmt::Display for QuestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestError::DimensionMismatch { expected, actual } => {
                write!(f, "Dimension mismatch: expected {}, got {}", expected, actual)
            }
            QuestError::MissingTensor(name) => {
                write!(f, "Checkpoint is missing tensor '{}'", name)
            }
            QuestError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
            QuestError::IoError(msg) => write!(f, "IO error: {}", msg),
            QuestError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            QuestError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
            QuestError::InsufficientSamples { requested, available } => {
                write!(
                    f,
                    "Cannot sample {} transitions: buffer holds {}",
                    requested, available
                )
            }
            QuestError::InvalidAction { action, max_actions } => {
                write!(f, "Invalid action {}: must be less than {}", action, max_actions)
            }
        }
    }
}

impl std::error::Error for QuestError {}

impl From<std::io::Error> for QuestError {
    fn from(err: std::io::Error) -> Self {
        QuestError::IoError(err.to_string())
    }
}

impl From<bincode::Error> for QuestError {
    fn from(err: bincode::Error) -> Self {
        QuestError::SerializationError(err.to_string())
    }
}

impl From<serde_json::Error> for QuestError {
    fn from(err: serde_json::Error) -> Self {
        QuestError::SerializationError(err.to_string())
    }
}

// Helper functions for common error patterns
impl QuestError {
    pub fn dimension_mismatch<E: Into<String>, A: Into<String>>(expected: E, actual: A) -> Self {
        QuestError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_parameter<N: Into<String>, R: Into<String>>(name: N, reason: R) -> Self {
        QuestError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
