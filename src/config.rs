use serde::Deserialize;

/// Seconds until an issued token expires (~30.44 days).
const DEFAULT_TOKEN_TTL_SECONDS: i64 = 2_629_744;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_seconds: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub database_name: String,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let database_name = std::env::var("MONGO_DB").unwrap_or_else(|_| "blog-site".into());
        let jwt = JwtConfig {
            secret: std::env::var("SECRET")?,
            ttl_seconds: std::env::var("JWT_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(DEFAULT_TOKEN_TTL_SECONDS),
        };
        Ok(Self {
            database_url,
            database_name,
            jwt,
        })
    }
}
