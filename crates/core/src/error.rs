// Error types for storage backends

use thiserror::Error;

/// Result type alias for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors returned by `CredentialStore` and `SnippetStore` implementations
#[derive(Debug, Error)]
pub enum StorageError {
    /// A unique key (username, token digest, tag name) is already taken
    #[error("{0} already exists")]
    Conflict(String),

    /// Input the backend refuses to store (e.g. an empty username)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The backend could not be reached or failed the query
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl StorageError {
    /// Create a conflict error
    pub fn conflict(what: impl Into<String>) -> Self {
        StorageError::Conflict(what.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        StorageError::InvalidInput(msg.into())
    }

    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        StorageError::Backend(msg.into())
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, StorageError::Conflict(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            StorageError::conflict("username 'admin'").to_string(),
            "username 'admin' already exists"
        );
        assert_eq!(
            StorageError::backend("connection refused").to_string(),
            "Storage backend error: connection refused"
        );
        assert!(StorageError::conflict("x").is_conflict());
        assert!(!StorageError::invalid_input("x").is_conflict());
    }

    #[test]
    fn test_from_anyhow() {
        let err: StorageError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, StorageError::Internal(_)));
    }
}
