//! Input validation for inbound payloads
//!
//! Payloads arrive as raw JSON. Every declared field is checked for presence
//! and type before the body is turned into a typed payload, so a bad request
//! reports all of its field errors at once and never reaches storage.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::{CarelineError, Result};
use crate::models::{
    DoctorLoginData, DoctorStatus, LoginData, NewDoctor, NewHospital, NewPatient,
};

const MAX_EMAIL_LENGTH: usize = 254;
const MAX_EMAIL_LOCAL_LENGTH: usize = 64;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        // dot-atom local part
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*",
        // dotted domain with an alphabetic top level
        r"@([A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$",
    ))
    .expect("email pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.is_valid = false;
        self.errors.push(ValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn into_result(self) -> Result<()> {
        if self.is_valid {
            Ok(())
        } else {
            Err(CarelineError::Validation(self))
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// Declared type of a payload field
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Text,
    Email,
    Integer,
    DoctorStatus,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldRule {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, required: true }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, required: false }
    }
}

/// A payload with a declared field layout.
pub trait Validate: DeserializeOwned {
    const RULES: &'static [FieldRule];

    /// Canonicalize fields after a successful parse
    fn normalize(&mut self) {}
}

/// Check a JSON body against a field layout, collecting every error
pub fn validate_value(value: &Value, rules: &[FieldRule]) -> ValidationResult {
    let mut result = ValidationResult::new();

    let object = match value.as_object() {
        Some(object) => object,
        None => {
            result.add_error("body", "request body must be a JSON object");
            return result;
        }
    };

    for rule in rules {
        match object.get(rule.name) {
            None | Some(Value::Null) => {
                if rule.required {
                    result.add_error(rule.name, "field required");
                }
            }
            Some(field) => {
                if let Err(message) = check_kind(field, rule.kind) {
                    result.add_error(rule.name, message);
                }
            }
        }
    }

    result
}

fn check_kind(value: &Value, kind: FieldKind) -> std::result::Result<(), String> {
    match kind {
        FieldKind::Text => value
            .as_str()
            .map(|_| ())
            .ok_or_else(|| "value is not a valid string".to_string()),
        FieldKind::Email => {
            let email = value
                .as_str()
                .ok_or_else(|| "value is not a valid string".to_string())?;
            // surrounding whitespace is dropped by normalization
            if is_valid_email(email.trim()) {
                Ok(())
            } else {
                Err("value is not a valid email address".to_string())
            }
        }
        FieldKind::Integer => {
            let number = value
                .as_i64()
                .ok_or_else(|| "value is not a valid integer".to_string())?;
            i32::try_from(number)
                .map(|_| ())
                .map_err(|_| "integer is out of range".to_string())
        }
        FieldKind::DoctorStatus => {
            let status = value
                .as_str()
                .ok_or_else(|| "value is not a valid string".to_string())?;
            status.parse::<DoctorStatus>().map(|_| ())
        }
    }
}

/// Validate a JSON body and convert it into its typed payload
pub fn parse_payload<T: Validate>(value: Value) -> Result<T> {
    validate_value(&value, T::RULES).into_result()?;

    let mut payload: T = serde_json::from_value(value).map_err(|e| {
        let mut result = ValidationResult::new();
        result.add_error("body", e.to_string());
        CarelineError::Validation(result)
    })?;
    payload.normalize();
    Ok(payload)
}

/// Checks an address against the dot-atom email grammar
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > MAX_EMAIL_LENGTH {
        return false;
    }
    match email.rsplit_once('@') {
        Some((local, _)) if local.len() <= MAX_EMAIL_LOCAL_LENGTH => EMAIL_RE.is_match(email),
        _ => false,
    }
}

/// Trims the address and lowercases its domain part
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

impl Validate for NewPatient {
    const RULES: &'static [FieldRule] = &[
        FieldRule::required("name", FieldKind::Text),
        FieldRule::required("location_address", FieldKind::Text),
        FieldRule::required("country", FieldKind::Text),
        FieldRule::required("tel", FieldKind::Text),
        FieldRule::required("email", FieldKind::Email),
        FieldRule::optional("referral_no", FieldKind::Text),
        FieldRule::optional("access_no", FieldKind::Text),
        FieldRule::required("age", FieldKind::Integer),
        FieldRule::required("sex", FieldKind::Text),
        FieldRule::required("password", FieldKind::Text),
    ];

    fn normalize(&mut self) {
        self.email = normalize_email(&self.email);
        // an empty referral code is the same as none
        if self.referral_no.as_deref().map_or(false, |r| r.trim().is_empty()) {
            self.referral_no = None;
        }
    }
}

impl Validate for NewHospital {
    const RULES: &'static [FieldRule] = &[
        FieldRule::required("HospitalName", FieldKind::Text),
        FieldRule::required("Address", FieldKind::Text),
        FieldRule::required("Country", FieldKind::Text),
        FieldRule::required("Type", FieldKind::Text),
        FieldRule::required("EmergencyLine", FieldKind::Text),
        FieldRule::required("HelpLine", FieldKind::Text),
        FieldRule::required("RegNumber", FieldKind::Text),
        FieldRule::required("Email", FieldKind::Email),
        FieldRule::required("Telephone", FieldKind::Text),
        FieldRule::required("Docs", FieldKind::Text),
        FieldRule::required("ContactNumber", FieldKind::Text),
        FieldRule::optional("Password", FieldKind::Text),
    ];

    fn normalize(&mut self) {
        self.email = normalize_email(&self.email);
    }
}

impl Validate for NewDoctor {
    const RULES: &'static [FieldRule] = &[
        FieldRule::required("DoctorName", FieldKind::Text),
        FieldRule::required("Specialty", FieldKind::Text),
        FieldRule::required("AccessNumber", FieldKind::Text),
        FieldRule::required("LicenseNumber", FieldKind::Text),
        FieldRule::required("Status", FieldKind::DoctorStatus),
        FieldRule::required("Email", FieldKind::Email),
        FieldRule::required("Telephone", FieldKind::Text),
        FieldRule::required("Docs", FieldKind::Text),
        FieldRule::required("Password", FieldKind::Text),
        FieldRule::required("ContactNumber", FieldKind::Text),
    ];

    fn normalize(&mut self) {
        self.email = normalize_email(&self.email);
    }
}

impl Validate for LoginData {
    const RULES: &'static [FieldRule] = &[
        FieldRule::required("email", FieldKind::Email),
        FieldRule::required("password", FieldKind::Text),
    ];

    fn normalize(&mut self) {
        self.email = normalize_email(&self.email);
    }
}

impl Validate for DoctorLoginData {
    const RULES: &'static [FieldRule] = &[
        FieldRule::required("Email", FieldKind::Email),
        FieldRule::required("Password", FieldKind::Text),
    ];

    fn normalize(&mut self) {
        self.email = normalize_email(&self.email);
    }
}
