//! One-way password hashing.
//!
//! [`CredentialVerifier`] is the seam the ledger hashes and checks passwords
//! through. [`Argon2Verifier`] is the production implementation: Argon2id with
//! a fresh random salt per hash, encoded as a PHC string so the parameters and
//! salt travel with the hash.

use std::fmt;

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::{Deserialize, Serialize};

use crate::CredentialError;

/// Opaque password hash. Persisted verbatim as a string.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialHash(String);

impl CredentialHash {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialHash(..)")
    }
}

pub trait CredentialVerifier: fmt::Debug {
    /// Hashes `password` with a fresh salt.
    fn hash(&self, password: &str) -> Result<CredentialHash, CredentialError>;

    /// Returns `true` if `password` matches `hash`. A malformed hash never
    /// matches.
    fn verify(&self, password: &str, hash: &CredentialHash) -> bool;
}

#[derive(Debug, Clone, Default)]
pub struct Argon2Verifier {
    params: Params,
}

impl Argon2Verifier {
    pub const DEFAULT_MEMORY_KIB: u32 = Params::DEFAULT_M_COST;
    pub const DEFAULT_ITERATIONS: u32 = Params::DEFAULT_T_COST;
    pub const DEFAULT_PARALLELISM: u32 = Params::DEFAULT_P_COST;

    /// Builds a verifier with explicit cost parameters.
    ///
    /// `memory_kib` must be at least `8 * parallelism` and `iterations` at
    /// least 1.
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, CredentialError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|err| CredentialError::Params(err.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl CredentialVerifier for Argon2Verifier {
    fn hash(&self, password: &str) -> Result<CredentialHash, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| CredentialError::Hash(err.to_string()))?;
        Ok(CredentialHash(hash.to_string()))
    }

    fn verify(&self, password: &str, hash: &CredentialHash) -> bool {
        let Ok(parsed) = PasswordHash::new(hash.as_str()) else {
            return false;
        };
        self.argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> Argon2Verifier {
        Argon2Verifier::with_params(8, 1, 1).unwrap()
    }

    #[test]
    fn hash_verifies_only_the_same_password() {
        let verifier = cheap();
        let hash = verifier.hash("hunter2").unwrap();

        assert!(verifier.verify("hunter2", &hash));
        assert!(!verifier.verify("hunter3", &hash));
        assert!(!verifier.verify("", &hash));
    }

    #[test]
    fn hashes_are_salted() {
        let verifier = cheap();
        let first = verifier.hash("same").unwrap();
        let second = verifier.hash("same").unwrap();

        assert_ne!(first, second);
        assert!(first.as_str().starts_with("$argon2id$"));
    }

    #[test]
    fn malformed_hash_never_matches() {
        let verifier = cheap();
        assert!(!verifier.verify("anything", &CredentialHash::new("not-a-phc-string")));
        assert!(!verifier.verify("", &CredentialHash::new("")));
    }

    #[test]
    fn rejects_invalid_params() {
        assert!(matches!(
            Argon2Verifier::with_params(1, 1, 1),
            Err(CredentialError::Params(_))
        ));
        assert!(matches!(
            Argon2Verifier::with_params(64, 0, 1),
            Err(CredentialError::Params(_))
        ));
    }

    #[test]
    fn debug_hides_hash() {
        let hash = CredentialHash::new("$argon2id$secret");
        assert_eq!(format!("{hash:?}"), "CredentialHash(..)");
    }
}
