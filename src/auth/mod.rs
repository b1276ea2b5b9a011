pub mod password;

pub use password::{CredentialHash, CredentialHasher, Verification};
