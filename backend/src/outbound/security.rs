//! Argon2 password hashing adapter.
//!
//! Implements the domain `PasswordHasher` port with Argon2id in PHC string
//! format. Salts come from the operating system RNG; verification parses the
//! stored PHC string, so parameter upgrades remain backward compatible.

use argon2::{Argon2, PasswordHasher as _, PasswordVerifier as _};
use password_hash::{PasswordHash as PhcString, SaltString};

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Argon2id implementation of the `PasswordHasher` port.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHashError> {
        let mut salt_bytes = [0u8; 16];
        getrandom::getrandom(&mut salt_bytes)
            .map_err(|error| PasswordHashError::hashing(error.to_string()))?;
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|error| PasswordHashError::hashing(error.to_string()))?;

        let phc = Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|error| PasswordHashError::hashing(error.to_string()))?
            .to_string();
        Ok(PasswordHash::new(phc))
    }

    fn verify(&self, hash: &PasswordHash, plaintext: &str) -> bool {
        match PhcString::new(hash.as_str()) {
            Ok(parsed) => Argon2::default()
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}
