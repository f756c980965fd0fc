use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::users::repo::User;

/// Request body for registration. Missing fields deserialize to empty
/// strings so the validator reports them instead of the JSON layer.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, rename = "passwordConfirmation")]
    pub password_confirmation: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Public part of a user: password and email stay out.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: String,
    pub username: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_hex(),
            username: user.username,
            date: user.date.to_time_0_3(),
        }
    }
}

/// Identifier of a freshly registered user.
#[derive(Debug, Serialize)]
pub struct RegisteredUser {
    pub id: String,
}

/// Bearer-wrapped token returned on login.
#[derive(Debug, Serialize)]
pub struct BearerToken {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_strips_private_fields() {
        let user = User::new("tester".into(), "tester@email.com".into(), "hash".into());
        let value = serde_json::to_value(PublicUser::from(user)).unwrap();
        assert!(value.get("email").is_none());
        assert!(value.get("password").is_none());
        assert_eq!(value["username"], "tester");
        assert_eq!(value["id"].as_str().unwrap().len(), 24);
    }

    #[test]
    fn register_request_reads_camel_case_confirmation() {
        let payload: RegisterRequest = serde_json::from_value(serde_json::json!({
            "username": "tester",
            "email": "tester@email.com",
            "password": "testPassword",
            "passwordConfirmation": "testPassword",
        }))
        .unwrap();
        assert_eq!(payload.password_confirmation, "testPassword");
    }

    #[test]
    fn register_request_defaults_missing_fields_to_empty() {
        let payload: RegisterRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(payload.username.is_empty());
        assert!(payload.email.is_empty());
        assert!(payload.password.is_empty());
        assert!(payload.password_confirmation.is_empty());
    }
}
