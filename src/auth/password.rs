//! Credential hashing with Argon2id.
//!
//! Hashes are PHC strings (`$argon2id$v=19$m=19456,t=2,p=1$<salt>$<digest>`),
//! so each stored value carries its own algorithm, version, cost parameters
//! and salt. Verification always re-derives under the embedded parameters,
//! which keeps old hashes verifiable after the policy is raised.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::config::settings::HashingConfig;
use crate::error::{CarelineError, Result};
use crate::models::Password;

/// A self-describing password hash. This is the only password form that is
/// ever persisted or read back.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialHash(String);

impl CredentialHash {
    /// Wrap a hash read back from storage. No parsing happens here; a
    /// malformed value simply never verifies.
    pub fn from_stored<T: Into<String>>(value: T) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialHash(..)")
    }
}

/// Outcome of checking a password against a stored hash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Verification {
    pub matched: bool,
    /// Stored hash is older or cheaper than the current policy
    pub needs_rehash: bool,
}

impl Verification {
    fn mismatch() -> Self {
        Self::default()
    }
}

/// Hashes and verifies passwords under one cost policy.
#[derive(Clone)]
pub struct CredentialHasher {
    params: Params,
}

impl CredentialHasher {
    pub fn new(config: &HashingConfig) -> Result<Self> {
        Ok(Self {
            params: config.params()?,
        })
    }

    pub fn with_params(params: Params) -> Self {
        Self { params }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password with a fresh random salt.
    pub fn hash(&self, password: &Password) -> Result<CredentialHash> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.expose().as_bytes(), &salt)
            .map_err(|e| CarelineError::Hashing(format!("Failed to hash password: {}", e)))?;
        Ok(CredentialHash(hash.to_string()))
    }

    /// Check a password against a stored hash.
    ///
    /// Never fails: a foreign or malformed stored value is reported as a
    /// mismatch.
    pub fn verify(&self, stored: &CredentialHash, password: &Password) -> Verification {
        let parsed = match PasswordHash::new(stored.as_str()) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!("Stored credential is not a PHC string: {}", e);
                return Verification::mismatch();
            }
        };

        // argon2 re-derives with the algorithm and params embedded in `parsed`
        let matched = self
            .argon2()
            .verify_password(password.expose().as_bytes(), &parsed)
            .is_ok();

        Verification {
            matched,
            needs_rehash: matched && self.is_weaker_than_policy(&parsed),
        }
    }

    /// Whether a stored hash should be replaced under the current policy
    pub fn needs_rehash(&self, stored: &CredentialHash) -> bool {
        match PasswordHash::new(stored.as_str()) {
            Ok(parsed) => self.is_weaker_than_policy(&parsed),
            Err(_) => true,
        }
    }

    fn is_weaker_than_policy(&self, parsed: &PasswordHash<'_>) -> bool {
        if parsed.algorithm != Algorithm::Argon2id.ident() {
            return true;
        }
        if parsed.version.map_or(true, |v| v < Version::V0x13 as u32) {
            return true;
        }
        match Params::try_from(parsed) {
            Ok(stored) => {
                stored.m_cost() < self.params.m_cost()
                    || stored.t_cost() < self.params.t_cost()
                    || stored.p_cost() < self.params.p_cost()
            }
            Err(_) => true,
        }
    }

    /// Hash on the blocking pool so request workers keep serving
    pub async fn hash_blocking(self: &Arc<Self>, password: Password) -> Result<CredentialHash> {
        let hasher = Arc::clone(self);
        tokio::task::spawn_blocking(move || hasher.hash(&password)).await?
    }

    /// Verify on the blocking pool so request workers keep serving
    pub async fn verify_blocking(
        self: &Arc<Self>,
        stored: CredentialHash,
        password: Password,
    ) -> Result<Verification> {
        let hasher = Arc::clone(self);
        Ok(tokio::task::spawn_blocking(move || hasher.verify(&stored, &password)).await?)
    }
}

#[cfg(test)]
pub(crate) fn test_hasher() -> CredentialHasher {
    CredentialHasher::with_params(Params::new(1024, 1, 1, None).expect("valid test params"))
}
