//! BURSAR Auth — password verification, JWT issuance/validation, and
//! the session authenticator.

pub mod config;
pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{AuthService, LoginOutput, RefreshOutput};
pub use token::{TokenClaims, TokenKind};
