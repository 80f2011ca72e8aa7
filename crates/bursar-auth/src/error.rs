//! Authentication error types.

use bursar_core::error::BursarError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for BursarError {
    fn from(err: AuthError) -> Self {
        match err {
            // Bad passwords, forged tokens and expired tokens all
            // collapse into one outward reason so callers cannot
            // probe which check failed.
            AuthError::InvalidCredentials
            | AuthError::TokenExpired
            | AuthError::TokenInvalid(_) => BursarError::AuthenticationFailed {
                reason: "could not validate credentials".into(),
            },
            AuthError::Crypto(msg) => BursarError::Crypto(msg),
        }
    }
}
