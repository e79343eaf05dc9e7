//! Password hashing
//!
//! Argon2id with the crate's default parameters. Hashes are PHC strings that
//! carry the algorithm, salt and cost, so verification needs nothing else.

use std::sync::OnceLock;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

use crate::error::{Error, Result};

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::Hashing(e.to_string()))?;
    Ok(hash.to_string())
}

/// Check a password against a stored hash
///
/// Malformed hashes verify as `false` rather than erroring.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        tracing::warn!("Stored password hash could not be parsed");
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// A real Argon2 hash of a random secret, computed once
///
/// Verifying against it costs the same as verifying a stored hash. Empty if
/// hashing failed, in which case verification short-circuits to `false`.
pub(crate) fn dummy_hash() -> &'static str {
    static DUMMY: OnceLock<String> = OnceLock::new();
    DUMMY.get_or_init(|| {
        let secret = SaltString::generate(&mut OsRng);
        hash_password(secret.as_str()).unwrap_or_default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_salted() {
        let first = hash_password("Abcdef12").unwrap();
        let second = hash_password("Abcdef12").unwrap();
        assert_ne!(first, second);
        assert!(first.starts_with("$argon2id$"));
    }

    #[test]
    fn test_verify() {
        let hash = hash_password("Abcdef12").unwrap();
        assert!(verify_password("Abcdef12", &hash));
        assert!(!verify_password("wrong", &hash));
        assert!(!verify_password("abcdef12", &hash));
    }

    #[test]
    fn test_malformed_hash_is_false() {
        assert!(!verify_password("Abcdef12", ""));
        assert!(!verify_password("Abcdef12", "not-a-hash"));
        assert!(!verify_password("Abcdef12", "$argon2id$v=19$garbage"));
    }
}
