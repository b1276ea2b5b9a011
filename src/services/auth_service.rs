use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::auth::{CredentialHash, CredentialHasher};
use crate::error::{CarelineError, Result};
use crate::models::{AccountKind, LoginOutcome, Password};
use crate::storage::Storage;

const ABSENT_ACCOUNT_PASSWORD: &str = "careline-absent-account";

/// Authentication service
pub struct AuthService {
    /// Storage backend
    storage: Arc<dyn Storage>,
    hasher: Arc<CredentialHasher>,
    /// Replace stale hashes after a successful login
    rehash_on_login: bool,
    /// Verified against when no usable hash exists, so every failed login
    /// costs one argon2 verification
    absent_hash: CredentialHash,
}

impl AuthService {
    pub fn new(
        storage: Arc<dyn Storage>,
        hasher: Arc<CredentialHasher>,
        rehash_on_login: bool,
    ) -> Result<Self> {
        let absent_hash = hasher.hash(&Password::new(ABSENT_ACCOUNT_PASSWORD))?;
        Ok(Self {
            storage,
            hasher,
            rehash_on_login,
            absent_hash,
        })
    }

    /// Check an email and password for one kind of account.
    ///
    /// An unknown email, an account without a password and a wrong password
    /// all fail with the same [`CarelineError::Authentication`].
    #[instrument(skip(self, password), fields(kind = %kind))]
    pub async fn login(
        &self,
        kind: AccountKind,
        email: &str,
        password: Password,
    ) -> Result<LoginOutcome> {
        let credential = self.storage.get_credentials(kind, email).await.map_err(|e| {
            error!("Error fetching {} credentials: {}", kind, e);
            CarelineError::from(e)
        })?;

        let (name, stored) = match credential {
            Some(c) => match c.password_hash {
                Some(hash) => (c.name, CredentialHash::from_stored(hash)),
                None => {
                    debug!("{} account has no password", kind);
                    return self.reject_without_account(password).await;
                }
            },
            None => {
                debug!("No {} account for login attempt", kind);
                return self.reject_without_account(password).await;
            }
        };

        let verification = self.hasher.verify_blocking(stored, password.clone()).await?;
        if !verification.matched {
            debug!("{} password mismatch", kind);
            return Err(CarelineError::invalid_credentials());
        }

        if verification.needs_rehash && self.rehash_on_login {
            self.rehash(kind, email, password).await;
        }

        info!("{} login successful", kind);
        Ok(LoginOutcome {
            name,
            needs_rehash: verification.needs_rehash,
        })
    }

    /// Spend the same verification work as a wrong password before failing
    async fn reject_without_account(&self, password: Password) -> Result<LoginOutcome> {
        self.hasher
            .verify_blocking(self.absent_hash.clone(), password)
            .await?;
        Err(CarelineError::invalid_credentials())
    }

    /// Store a fresh hash under the current policy. Failure only costs the
    /// upgrade, never the login.
    async fn rehash(&self, kind: AccountKind, email: &str, password: Password) {
        let fresh = match self.hasher.hash_blocking(password).await {
            Ok(fresh) => fresh,
            Err(e) => {
                warn!("Rehash of {} credential failed: {}", kind, e);
                return;
            }
        };

        match self
            .storage
            .update_password_hash(kind, email, fresh.as_str())
            .await
        {
            Ok(()) => info!("Upgraded {} credential to current hashing policy", kind),
            Err(e) => warn!("Failed to store upgraded {} credential: {}", kind, e),
        }
    }
}
