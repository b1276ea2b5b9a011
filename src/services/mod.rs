// Module declarations
pub mod auth_service;
pub mod registration_service;

// Public re-exports
pub use auth_service::AuthService;
pub use registration_service::AccountRegistrar;
