//! Contact form validation

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::validation::{optional_text, required_text};
use super::ValidationError;

const MAX_NAME_LEN: usize = 120;
const MAX_EMAIL_LEN: usize = 254;
const MAX_SUBJECT_LEN: usize = 200;
const MAX_MESSAGE_LEN: usize = 5000;

/// Pragmatic address check: one @, no spaces, dotted domain
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").expect("invalid email regex")
});

/// Contact form body
#[derive(Debug, Clone, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
}

/// Validated contact submission
#[derive(Debug, Clone, PartialEq)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
}

impl TryFrom<ContactRequest> for NewContactMessage {
    type Error = ValidationError;

    fn try_from(req: ContactRequest) -> Result<Self, Self::Error> {
        let email = required_text("email", &req.email, MAX_EMAIL_LEN)?.to_lowercase();
        if !EMAIL_RE.is_match(&email) {
            return Err(ValidationError::InvalidFormat {
                field: "email",
                reason: "must be a valid email address",
            });
        }

        Ok(Self {
            name: required_text("name", &req.name, MAX_NAME_LEN)?,
            email,
            subject: optional_text("subject", req.subject.as_deref(), MAX_SUBJECT_LEN)?,
            message: required_text("message", &req.message, MAX_MESSAGE_LEN)?,
        })
    }
}
