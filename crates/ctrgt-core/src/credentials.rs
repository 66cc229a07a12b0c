//! Credential hashing strategy
//!
//! Registration and login only see the [`CredentialHasher`] trait, so the
//! algorithm can be swapped without touching call sites. The shipped
//! implementation is argon2id with a per-hash random salt, encoded as a PHC
//! string that carries its own parameters.

use crate::errors::{ExError, ExErrorKind, Result};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

/// Password used for restored users whose backup row carries no credential
pub const DEFAULT_RESTORE_PASSWORD: &str = "123456";

/// Hash/verify pair used for stored credentials
///
/// `verify(p, &hash(p)?)` must hold for every plaintext `p`, and `verify`
/// must reject any other plaintext.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String>;

    fn verify(&self, plaintext: &str, token: &str) -> bool;
}

/// argon2id hasher
#[derive(Clone)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    /// Hasher with the crate's recommended default cost
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Hasher with explicit cost parameters (memory KiB, iterations, lanes)
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self> {
        let params = Params::new(m_cost, t_cost, p_cost, None).map_err(|e| {
            ExError::new(ExErrorKind::Validation)
                .with_op("argon2_params")
                .with_message(e.to_string())
        })?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Argon2Hasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Argon2Hasher").finish_non_exhaustive()
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                ExError::new(ExErrorKind::Validation)
                    .with_op("hash_credential")
                    .with_message(format!("password could not be hashed: {}", e))
            })
    }

    fn verify(&self, plaintext: &str, token: &str) -> bool {
        match PasswordHash::new(token) {
            Ok(parsed) => self
                .argon2
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> Argon2Hasher {
        Argon2Hasher::with_params(1024, 1, 1).unwrap()
    }

    #[test]
    fn test_verify_accepts_original_plaintext() {
        let hasher = cheap();
        let token = hasher.hash("correct horse").unwrap();
        assert!(hasher.verify("correct horse", &token));
        assert!(!hasher.verify("correct horse ", &token));
        assert!(!hasher.verify("", &token));
    }

    #[test]
    fn test_token_is_not_plaintext() {
        let token = cheap().hash("123456").unwrap();
        assert!(token.starts_with("$argon2id$"));
        assert!(!token.contains("123456"));
    }

    #[test]
    fn test_verify_rejects_garbage_token() {
        let hasher = cheap();
        assert!(!hasher.verify("pw", "hashed_pw_secure"));
        assert!(!hasher.verify("pw", ""));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let err = Argon2Hasher::with_params(1, 1, 1).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Validation);
    }
}
