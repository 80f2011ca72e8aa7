//! Password verification using Argon2id.

use std::borrow::Cow;

use argon2::{Argon2, PasswordVerifier};

use crate::error::AuthError;

/// The byte string actually fed to Argon2: pepper (if any) followed
/// by the password. Must be applied identically at hash time.
fn keyed_input<'a>(password: &'a str, pepper: Option<&str>) -> Cow<'a, [u8]> {
    match pepper {
        Some(p) => Cow::Owned(format!("{p}{password}").into_bytes()),
        None => Cow::Borrowed(password.as_bytes()),
    }
}

/// Check a plaintext password against a stored Argon2id PHC hash.
///
/// A mismatch is `Ok(false)`, not an error; only a hash that cannot
/// be parsed at all surfaces as [`AuthError::Crypto`].
pub fn verify_password(
    password: &str,
    hash: &str,
    pepper: Option<&str>,
) -> Result<bool, AuthError> {
    let parsed = argon2::PasswordHash::new(hash)
        .map_err(|e| AuthError::Crypto(format!("stored hash is not valid PHC: {e}")))?;

    match Argon2::default().verify_password(&keyed_input(password, pepper), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::Crypto(format!("password verification: {e}"))),
    }
}
