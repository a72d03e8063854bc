use std::fmt;

/// Result type for Metis operations
pub type Result<T> = std::result::Result<T, MetisError>;

/// Main error type for the Metis library
#[derive(Debug, Clone)]
pub enum MetisError {
    /// Invalid dimensions for operations
    DimensionMismatch {
        expected: String,
        actual: String,
    },

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

    /// Replay buffer cannot supply the requested number of transitions
    NotEnoughTransitions {
        requested: usize,
        available: usize,
    },
}

impl fmt::Display for MetisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetisError::DimensionMismatch { expected, actual } => {
                write!(f, "Dimension mismatch: expected {}, got {}", expected, actual)
            }
            MetisError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
            MetisError::IoError(msg) => write!(f, "IO error: {}", msg),
            MetisError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            MetisError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
            MetisError::NotEnoughTransitions { requested, available } => {
                write!(
                    f,
                    "Not enough transitions in replay buffer: requested {}, available {}",
                    requested, available
                )
            }
        }
    }
}

impl std::error::Error for MetisError {}

// Conversion from std::io::Error
impl From<std::io::Error> for MetisError {
    fn from(err: std::io::Error) -> Self {
        MetisError::IoError(err.to_string())
    }
}

// Conversion from bincode::Error
impl From<bincode::Error> for MetisError {
    fn from(err: bincode::Error) -> Self {
        MetisError::SerializationError(err.to_string())
    }
}

// Helper functions for common error patterns
impl MetisError {
    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        MetisError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        MetisError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
