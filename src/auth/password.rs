// Password hashing and verification

use argon2::{
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;

use crate::config::PasswordSettings;
use crate::error::ServiceError;

/// Argon2id hasher with a configurable work factor
///
/// Every hash gets a fresh random salt, so hashing the same plaintext twice
/// yields two different digests that both verify.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Build a hasher with `work_factor` iterations over `memory_kib` KiB
    pub fn new(work_factor: u32, memory_kib: u32) -> Result<Self, ServiceError> {
        let params = Params::new(memory_kib, work_factor, Params::DEFAULT_P_COST, None)
            .map_err(|e| ServiceError::Credential(format!("invalid argon2 parameters: {}", e)))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn from_settings(settings: &PasswordSettings) -> Result<Self, ServiceError> {
        Self::new(settings.work_factor, settings.memory_kib)
    }

    /// Hash a password into a PHC-format digest
    pub fn hash(&self, plaintext: &str) -> Result<String, ServiceError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ServiceError::Credential(format!("password hashing failed: {}", e)))
    }

    /// Check `plaintext` against a stored digest
    ///
    /// Malformed digests, mismatches and empty input all yield `false`.
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        if plaintext.is_empty() || digest.is_empty() {
            return false;
        }

        match PasswordHash::new(digest) {
            Ok(parsed) => self
                .argon2
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}
