//! Authentication configuration.

/// Configuration for the authentication service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// PEM-encoded private key for JWT signing.
    pub jwt_private_key_pem: String,
    /// PEM-encoded public key for JWT verification. Verification
    /// needs only this half of the pair.
    pub jwt_public_key_pem: String,
    /// Signing algorithm name (`EdDSA`, `RS256`, ...). Must match the
    /// key material.
    pub jwt_algorithm: String,
    /// Access token lifetime in seconds (default: 86_400 = 1 day).
    pub access_token_lifetime_secs: u64,
    /// Refresh token lifetime in seconds (default: 2_592_000 = 30 days).
    pub refresh_token_lifetime_secs: u64,
    /// Optional pepper prepended to passwords before Argon2id
    /// verification. Must match the pepper used during hashing.
    pub pepper: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_private_key_pem: String::new(),
            jwt_public_key_pem: String::new(),
            jwt_algorithm: "EdDSA".into(),
            access_token_lifetime_secs: 86_400,
            refresh_token_lifetime_secs: 2_592_000,
            pepper: None,
        }
    }
}
