//! Session authenticator — login, bearer-token resolution, and
//! refresh orchestration.

use bursar_core::error::{BursarError, BursarResult};
use bursar_core::models::user::User;
use bursar_core::repository::UserRepository;
use tracing::debug;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token::{self, TokenKind};

/// Successful login result: a fresh dual-token pair.
#[derive(Debug)]
pub struct LoginOutput {
    /// Signed access token (business operations).
    pub access_token: String,
    /// Signed refresh token (only usable to mint a new access token).
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
}

/// Successful refresh result. Only a new access token is minted; the
/// presented refresh token stays valid until its natural expiry.
#[derive(Debug)]
pub struct RefreshOutput {
    pub access_token: String,
    pub expires_in: u64,
}

/// Authentication service.
///
/// Generic over the user repository so that the auth layer has no
/// dependency on the database crate.
pub struct AuthService<U: UserRepository> {
    users: U,
    config: AuthConfig,
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(users: U, config: AuthConfig) -> Self {
        Self { users, config }
    }

    /// Authenticate a login/password pair against the stored hash.
    ///
    /// Unknown logins and password mismatches are indistinguishable
    /// to the caller. There is no lockout or backoff.
    pub async fn authenticate(&self, login: &str, pwd: &str) -> BursarResult<User> {
        let user = match self.users.get_by_login(login).await {
            Ok(u) => u,
            Err(BursarError::NotFound { .. }) => {
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        let valid = password::verify_password(pwd, &user.password_hash, self.config.pepper.as_deref())
            .map_err(|e| BursarError::Crypto(e.to_string()))?;
        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        Ok(user)
    }

    /// Re-validate a bearer token and load its subject.
    ///
    /// Parse failures (forged, malformed, expired) all surface as the
    /// same unauthenticated failure. A kind mismatch is reported
    /// distinctly — that is a caller integration bug, not a forgery
    /// signal. Tokens whose subject no longer exists are rejected
    /// even though they remain cryptographically valid.
    pub async fn resolve(&self, bearer: &str, expected: TokenKind) -> BursarResult<User> {
        let claims = match token::parse(bearer, &self.config) {
            Ok(claims) => claims,
            Err(AuthError::Crypto(msg)) => return Err(BursarError::Crypto(msg)),
            Err(e) => {
                debug!(error = %e, "bearer token rejected");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        if claims.kind != expected {
            return Err(BursarError::WrongTokenKind {
                found: claims.kind.as_str().into(),
                expected: expected.as_str().into(),
            });
        }

        let subject =
            Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidCredentials)?;

        match self.users.get_by_id(subject).await {
            Ok(user) => Ok(user),
            Err(BursarError::NotFound { .. }) => Err(AuthError::InvalidCredentials.into()),
            Err(e) => Err(e),
        }
    }

    /// Resolve an access token to its principal.
    pub async fn resolve_access(&self, bearer: &str) -> BursarResult<User> {
        self.resolve(bearer, TokenKind::Access).await
    }

    /// Resolve a refresh token to its principal.
    pub async fn resolve_refresh(&self, bearer: &str) -> BursarResult<User> {
        self.resolve(bearer, TokenKind::Refresh).await
    }

    /// Authenticate and issue a fresh access/refresh pair.
    pub async fn login(&self, login: &str, pwd: &str) -> BursarResult<LoginOutput> {
        let user = self.authenticate(login, pwd).await?;

        let access_token = token::issue_access_token(user.id, &self.config)?;
        let refresh_token = token::issue_refresh_token(user.id, &self.config)?;

        Ok(LoginOutput {
            access_token,
            refresh_token,
            expires_in: self.config.access_token_lifetime_secs,
        })
    }

    /// Mint a new access token from a valid refresh token. Refresh
    /// tokens never authorize business operations directly.
    pub async fn refresh(&self, refresh_token: &str) -> BursarResult<RefreshOutput> {
        let user = self.resolve_refresh(refresh_token).await?;

        let access_token = token::issue_access_token(user.id, &self.config)?;

        Ok(RefreshOutput {
            access_token,
            expires_in: self.config.access_token_lifetime_secs,
        })
    }
}
