//! JWT token codec: issuance and verification of access and refresh
//! tokens with an asymmetric key pair.
//!
//! Tokens are stateless — validity is fully determined by signature
//! and expiry. There is no revocation list; a compromised token stays
//! valid until its natural expiry.

use std::str::FromStr;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;

/// The two token kinds of the dual-token scheme. A token presented
/// where the other kind is expected must be rejected regardless of
/// signature validity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed claim set embedded in every token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject — user ID (UUID string).
    pub sub: String,
    /// Token kind discriminator.
    #[serde(rename = "type")]
    pub kind: TokenKind,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp), `iat + ttl` at issuance.
    pub exp: i64,
}

fn algorithm(config: &AuthConfig) -> Result<Algorithm, AuthError> {
    Algorithm::from_str(&config.jwt_algorithm)
        .map_err(|_| AuthError::Crypto(format!("unknown JWT algorithm: {}", config.jwt_algorithm)))
}

fn encoding_key(alg: Algorithm, pem: &str) -> Result<EncodingKey, AuthError> {
    let key = match alg {
        Algorithm::EdDSA => EncodingKey::from_ed_pem(pem.as_bytes()),
        Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512 => {
            EncodingKey::from_rsa_pem(pem.as_bytes())
        }
        Algorithm::ES256 | Algorithm::ES384 => EncodingKey::from_ec_pem(pem.as_bytes()),
        other => {
            return Err(AuthError::Crypto(format!(
                "unsupported signing algorithm: {other:?}"
            )));
        }
    };
    key.map_err(|e| AuthError::Crypto(format!("bad private key: {e}")))
}

fn decoding_key(alg: Algorithm, pem: &str) -> Result<DecodingKey, AuthError> {
    let key = match alg {
        Algorithm::EdDSA => DecodingKey::from_ed_pem(pem.as_bytes()),
        Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512 => {
            DecodingKey::from_rsa_pem(pem.as_bytes())
        }
        Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(pem.as_bytes()),
        other => {
            return Err(AuthError::Crypto(format!(
                "unsupported verification algorithm: {other:?}"
            )));
        }
    };
    key.map_err(|e| AuthError::Crypto(format!("bad public key: {e}")))
}

/// Issue a signed token of the given kind for `subject`, expiring
/// `ttl_secs` from now. Negative TTLs produce already-expired tokens
/// (useful in tests).
pub fn issue(
    subject: Uuid,
    kind: TokenKind,
    ttl_secs: i64,
    config: &AuthConfig,
) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    let claims = TokenClaims {
        sub: subject.to_string(),
        kind,
        iat: now,
        exp: now + ttl_secs,
    };

    let alg = algorithm(config)?;
    let key = encoding_key(alg, &config.jwt_private_key_pem)?;

    jsonwebtoken::encode(&Header::new(alg), &claims, &key)
        .map_err(|e| AuthError::Crypto(format!("JWT encode: {e}")))
}

/// Issue a short-lived access token using the configured lifetime.
pub fn issue_access_token(subject: Uuid, config: &AuthConfig) -> Result<String, AuthError> {
    issue(
        subject,
        TokenKind::Access,
        config.access_token_lifetime_secs as i64,
        config,
    )
}

/// Issue a long-lived refresh token using the configured lifetime.
pub fn issue_refresh_token(subject: Uuid, config: &AuthConfig) -> Result<String, AuthError> {
    issue(
        subject,
        TokenKind::Refresh,
        config.refresh_token_lifetime_secs as i64,
        config,
    )
}

/// Decode and verify a token: signature against the public key,
/// expiry against wall-clock time at the moment of parsing (zero
/// leeway).
pub fn parse(token: &str, config: &AuthConfig) -> Result<TokenClaims, AuthError> {
    let alg = algorithm(config)?;
    let key = decoding_key(alg, &config.jwt_public_key_pem)?;

    let mut validation = Validation::new(alg);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["sub", "exp", "iat"]);

    jsonwebtoken::decode::<TokenClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid(e.to_string()),
        })
}
