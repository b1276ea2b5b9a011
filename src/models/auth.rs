use serde::{Deserialize, Serialize};
use std::fmt;

/// Plaintext password as received from a client.
///
/// Only the credential hasher reads the inner value; `Debug` never prints it.
#[derive(Clone, Deserialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    pub fn new<T: Into<String>>(value: T) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Patient login payload
#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    pub email: String,
    pub password: Password,
}

/// Doctor login payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DoctorLoginData {
    pub email: String,
    pub password: Password,
}

/// Name and stored hash fetched for a login attempt
#[derive(Debug, Clone, PartialEq)]
pub struct StoredCredential {
    pub name: String,
    /// `None` for accounts registered without a password
    pub password_hash: Option<String>,
}

/// Result of a successful login
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LoginOutcome {
    pub name: String,
    /// Stored hash uses weaker parameters than the current policy
    #[serde(skip)]
    pub needs_rehash: bool,
}
