use std::sync::Arc;
use tracing::info;

use crate::auth::CredentialHasher;
use crate::config::settings::Config;
use crate::error::AppError;
use crate::services::{AccountRegistrar, AuthService};
use crate::storage::Storage;

/// Application state that is shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Config,
    /// Storage service for persisting data
    pub storage: Arc<dyn Storage>,
    /// Patient, hospital and doctor registration
    pub registrar: AccountRegistrar,
    /// Login flow
    pub auth: Arc<AuthService>,
}

impl AppState {
    /// Wire the services around an already initialized storage backend
    pub fn new_with_storage(storage: Arc<dyn Storage>, config: &Config) -> Result<Self, AppError> {
        let hasher = Arc::new(CredentialHasher::new(&config.hashing)?);
        info!(
            "Credential hasher ready (m={} KiB, t={}, p={}, rehash_on_login={})",
            config.hashing.memory_kib,
            config.hashing.iterations,
            config.hashing.parallelism,
            config.hashing.rehash_on_login
        );

        let registrar = AccountRegistrar::new(storage.clone(), hasher.clone());
        let auth = Arc::new(AuthService::new(
            storage.clone(),
            hasher,
            config.hashing.rehash_on_login,
        )?);

        Ok(Self {
            config: config.clone(),
            storage,
            registrar,
            auth,
        })
    }
}
