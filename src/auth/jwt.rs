use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::{config::JwtConfig, state::AppState, users::repo::User};

/// Identity claims carried by an issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: String, // user ObjectId as hex
    pub username: String,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}

/// Signing and verification keys plus the token lifetime.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            ttl_seconds,
        } = state.config.jwt.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::from_secs(ttl_seconds as u64),
        }
    }
}

impl JwtKeys {
    /// Issue a token carrying the user's identity. Expiry is the only
    /// invalidation path; there is no revocation.
    pub fn sign(&self, user: &User) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            id: user.id.to_hex(),
            username: user.username.clone(),
            email: user.email.clone(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %claims.id, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        debug!(user_id = %data.claims.id, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;

    fn test_user() -> User {
        User::new(
            "tester".into(),
            "tester@email.com".into(),
            "not-a-real-hash".into(),
        )
    }

    async fn make_keys() -> JwtKeys {
        let state = AppState::fake().await;
        JwtKeys::from_ref(&state)
    }

    #[tokio::test]
    async fn sign_and_verify_roundtrip() {
        let keys = make_keys().await;
        let user = test_user();
        let token = keys.sign(&user).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.id, user.id.to_hex());
        assert_eq!(claims.username, "tester");
        assert_eq!(claims.email, "tester@email.com");
        assert_eq!(claims.exp - claims.iat, 300);
    }

    #[tokio::test]
    async fn verify_rejects_wrong_secret() {
        let keys = make_keys().await;
        let other = JwtKeys {
            encoding: EncodingKey::from_secret(b"other-secret"),
            decoding: DecodingKey::from_secret(b"other-secret"),
            ttl: keys.ttl,
        };
        let token = keys.sign(&test_user()).expect("sign");
        assert!(other.verify(&token).is_err());
    }

    #[tokio::test]
    async fn verify_rejects_expired_token() {
        let keys = make_keys().await;
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            id: ObjectId::new().to_hex(),
            username: "tester".into(),
            email: "tester@email.com".into(),
            iat: (now - 600) as usize,
            exp: (now - 300) as usize,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).expect("encode");
        assert!(keys.verify(&token).is_err());
    }
}
