// Core module definitions
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod server;
pub mod services;
pub mod storage;
pub mod utils;
pub mod validation;

// Unified error handling
pub use error::{CarelineError, Result};

// Essential re-exports for convenience
pub use server::{app_state::AppState, startup::{configure_routes, start_server}};

pub use config::settings::{Config, DatabaseConfig, HashingConfig, ServerConfig};

// Storage backends
pub use storage::{init_storage, memory::MemoryStorage, mysql::MySqlStorage, Storage, StorageError};

// Model exports
pub use models::{AccountKind, DoctorStatus, NewDoctor, NewHospital, NewPatient, Password};

// Credential hashing and account services
pub use auth::CredentialHasher;
pub use services::{AccountRegistrar, AuthService};
