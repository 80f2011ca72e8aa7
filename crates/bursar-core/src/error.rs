//! Error types for the BURSAR system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BursarError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    /// A refresh token was presented where an access token was
    /// expected, or vice versa. Kept separate from
    /// [`BursarError::AuthenticationFailed`] so callers can tell a
    /// client integration bug apart from a forged or expired token.
    #[error("Invalid token type {found:?}, expected {expected:?}")]
    WrongTokenKind { found: String, expected: String },

    #[error("Authorization denied: {reason}")]
    AuthorizationDenied { reason: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type BursarResult<T> = Result<T, BursarError>;
