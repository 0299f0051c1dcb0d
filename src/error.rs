//! Error types for storage, auth and card operations.
//!
//! Store actions never panic or bubble raw I/O failures to the view. Each
//! failure maps to one of these enums, whose `Display` text is the readable
//! message the store keeps in its error field.

use thiserror::Error;

/// Failure of the underlying key-value medium.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage quota exceeded writing '{key}' ({needed} bytes, limit {limit})")]
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored value is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),

    #[error("value could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Failure of an auth store action.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Registration failed. Please check your information.")]
    IncompleteRegistration,

    #[error("Login failed. Please try again.")]
    LoginFailed(#[source] StorageError),

    #[error("Registration failed. Please try again.")]
    RegistrationFailed(#[source] StorageError),
}

/// Failure of a card store action.
#[derive(Debug, Error)]
pub enum CardError {
    #[error("Title and content are required")]
    MissingFields,

    #[error("Card not found")]
    NotFound,

    #[error("Failed to load cards")]
    LoadFailed(#[source] StorageError),

    #[error("Failed to save cards")]
    SaveFailed(#[source] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_messages_are_user_facing() {
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Invalid username or password"
        );
        let err = AuthError::LoginFailed(StorageError::Unavailable("offline".into()));
        assert_eq!(err.to_string(), "Login failed. Please try again.");
    }

    #[test]
    fn test_card_save_failure_keeps_source() {
        let err = CardError::SaveFailed(StorageError::QuotaExceeded {
            key: "k".into(),
            needed: 10,
            limit: 5,
        });
        assert_eq!(err.to_string(), "Failed to save cards");
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert!(source.unwrap().contains("quota exceeded"));
    }
}
