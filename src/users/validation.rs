use lazy_static::lazy_static;
use regex::Regex;

use crate::users::dto::{LoginRequest, RegisterRequest};

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// A blank field counts the same as a missing one.
fn presence(value: &str) -> &str {
    if value.trim().is_empty() {
        ""
    } else {
        value
    }
}

/// Field errors from a registration payload. One message per field; a later
/// check on the same field replaces the earlier one, distinct fields never
/// clobber each other.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RegisterErrors {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

impl RegisterErrors {
    pub fn is_valid(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.password_confirmation.is_none()
    }

    /// Collapse the field errors into one envelope message, in field order.
    pub fn message(&self) -> String {
        [
            &self.username,
            &self.email,
            &self.password,
            &self.password_confirmation,
        ]
        .iter()
        .filter_map(|m| m.as_deref())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Field errors from a login payload.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LoginErrors {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginErrors {
    pub fn is_valid(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }

    pub fn message(&self) -> String {
        [&self.email, &self.password]
            .iter()
            .filter_map(|m| m.as_deref())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Pure shape check of a registration payload; no I/O.
pub fn validate_registration(payload: &RegisterRequest) -> RegisterErrors {
    let mut errors = RegisterErrors::default();

    let username = presence(&payload.username);
    let email = presence(&payload.email);
    let password = presence(&payload.password);
    let password_confirmation = presence(&payload.password_confirmation);

    if username.is_empty() {
        errors.username = Some("Username field is required".into());
    }

    if email.is_empty() {
        errors.email = Some("Email field is required".into());
    } else if !is_valid_email(email) {
        errors.email = Some("Email is invalid".into());
    }

    if password.is_empty() {
        errors.password = Some("Password field is required".into());
    }

    if password_confirmation.is_empty() {
        errors.password_confirmation = Some("Confirm password field is required".into());
    }

    let length = password.chars().count();
    if !(6..=30).contains(&length) {
        errors.password = Some("Password must be at least 6 characters".into());
    }

    if password != password_confirmation {
        errors.password_confirmation = Some("Passwords must match".into());
    }

    errors
}

/// Pure shape check of a login payload; no I/O.
pub fn validate_login(payload: &LoginRequest) -> LoginErrors {
    let mut errors = LoginErrors::default();

    let email = presence(&payload.email);
    let password = presence(&payload.password);

    if email.is_empty() {
        errors.email = Some("Email field is required".into());
    } else if !is_valid_email(email) {
        errors.email = Some("Email is invalid".into());
    }

    if password.is_empty() {
        errors.password = Some("Password field is required".into());
    }

    errors
}
