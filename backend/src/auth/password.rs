//! Password hashing using bcrypt or argon2
//!
//! New hashes use the configured algorithm. Verification reads the algorithm
//! from the stored hash, so accounts hashed before a switch keep working.
//!
//! # Performance Considerations
//!
//! Both algorithms are intentionally CPU-intensive. The `*_async` variants run
//! on the blocking thread pool so request handling is not stalled.

use crate::config::{PasswordAlgorithm, PasswordConfig};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

/// Password hashing errors
#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    Hash(String),

    #[error("Invalid hash format: {0}")]
    InvalidHash(String),

    #[error("Task join error: {0}")]
    Join(String),
}

/// Password hashing service
#[derive(Debug, Clone)]
pub struct PasswordService {
    algorithm: PasswordAlgorithm,
    bcrypt_cost: u32,
}

impl Default for PasswordService {
    fn default() -> Self {
        Self::new(&PasswordConfig::default())
    }
}

impl PasswordService {
    pub fn new(config: &PasswordConfig) -> Self {
        Self {
            algorithm: config.algorithm,
            bcrypt_cost: config.bcrypt_cost,
        }
    }

    /// Algorithm used for new hashes
    pub fn algorithm(&self) -> PasswordAlgorithm {
        self.algorithm
    }

    /// Hash a password (blocking operation)
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        match self.algorithm {
            PasswordAlgorithm::Bcrypt => bcrypt::hash(password, self.bcrypt_cost)
                .map_err(|e| PasswordError::Hash(e.to_string())),
            PasswordAlgorithm::Argon2 => {
                let salt = SaltString::generate(&mut OsRng);
                let hash = Argon2::default()
                    .hash_password(password.as_bytes(), &salt)
                    .map_err(|e| PasswordError::Hash(e.to_string()))?;
                Ok(hash.to_string())
            }
        }
    }

    /// Hash a password on the blocking thread pool
    pub async fn hash_async(&self, password: String) -> Result<String, PasswordError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.hash(&password))
            .await
            .map_err(|e| PasswordError::Join(e.to_string()))?
    }

    /// Verify a password against a stored hash (blocking operation)
    ///
    /// Returns `Ok(false)` on mismatch and an error when the stored hash
    /// cannot be parsed or carries unusable parameters.
    pub fn verify(password: &str, hash: &str) -> Result<bool, PasswordError> {
        if hash.starts_with("$argon2") {
            let parsed_hash =
                PasswordHash::new(hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;
            return match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
                Ok(()) => Ok(true),
                Err(argon2::password_hash::Error::Password) => Ok(false),
                Err(e) => Err(PasswordError::InvalidHash(e.to_string())),
            };
        }

        bcrypt::verify(password, hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))
    }

    /// Verify a password on the blocking thread pool
    pub async fn verify_async(password: String, hash: String) -> Result<bool, PasswordError> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &hash))
            .await
            .map_err(|e| PasswordError::Join(e.to_string()))?
    }
}
