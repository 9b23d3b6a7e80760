use std::fmt;

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash as PhcString, PasswordHasher, PasswordVerifier, SaltString,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CredentialError {
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Salted Argon2id hash of a password, stored in PHC string format.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a plaintext password with a fresh random salt.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::Hash` if Argon2 rejects the input.
    pub fn generate(password: &str) -> Result<Self, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        let phc = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| CredentialError::Hash(err.to_string()))?;
        Ok(Self(phc.to_string()))
    }

    /// Check a plaintext password against this hash.
    ///
    /// A malformed stored hash never verifies.
    #[must_use]
    pub fn verify(&self, password: &str) -> bool {
        let Ok(parsed) = PhcString::new(&self.0) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// Returns the PHC-encoded hash string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_only_the_original_password() {
        let hash = PasswordHash::generate("pass123").unwrap();
        assert!(hash.verify("pass123"));
        assert!(!hash.verify("pass124"));
        assert!(!hash.as_str().contains("pass123"));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = PasswordHash::generate("secret1").unwrap();
        let b = PasswordHash::generate("secret1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_never_verifies() {
        let hash: PasswordHash = serde_json::from_str("\"pass123\"").unwrap();
        assert!(!hash.verify("pass123"));
    }

    #[test]
    fn debug_output_is_redacted() {
        let hash = PasswordHash::generate("pass123").unwrap();
        assert_eq!(format!("{hash:?}"), "PasswordHash(<redacted>)");
    }
}
