use thiserror::Error;

/// Core error types for shop admin operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Request failed: {message}")]
    Network { message: String },

    #[error("Duplicate key '{key}' in {collection}")]
    DuplicateKey { collection: String, key: String },

    #[error("Cannot {action} while {state}")]
    InvalidTransition { action: String, state: String },

    #[error("Invalid entity data: {message}")]
    InvalidEntity { message: String },

    #[error("Not found: {kind} {id}")]
    NotFound { kind: String, id: String },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Create a new Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn duplicate_key(collection: impl Into<String>, key: impl Into<String>) -> Self {
        Self::DuplicateKey {
            collection: collection.into(),
            key: key.into(),
        }
    }

    pub fn invalid_transition(action: impl Into<String>, state: impl Into<String>) -> Self {
        Self::InvalidTransition {
            action: action.into(),
            state: state.into(),
        }
    }

    pub fn invalid_entity(message: impl Into<String>) -> Self {
        Self::InvalidEntity {
            message: message.into(),
        }
    }

    pub fn not_found(kind: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            kind: kind.into(),
            id: id.to_string(),
        }
    }

    /// Whether repeating the same operation may succeed without local changes.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Get error category for logging and user-facing classification
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) | Self::InvalidEntity { .. } => ErrorCategory::Validation,
            Self::Network { .. } => ErrorCategory::Network,
            Self::DuplicateKey { .. } | Self::InvalidTransition { .. } => {
                ErrorCategory::Precondition
            }
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Json(_) => ErrorCategory::Serialization,
        }
    }
}

/// Error categories for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Network,
    Precondition,
    NotFound,
    Serialization,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Network => write!(f, "network"),
            Self::Precondition => write!(f, "precondition"),
            Self::NotFound => write!(f, "not_found"),
            Self::Serialization => write!(f, "serialization"),
        }
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
