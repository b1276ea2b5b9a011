pub mod constants;
pub mod settings;

pub use settings::{Config, DatabaseConfig, HashingConfig, LoggingConfig, ServerConfig, StorageType};
