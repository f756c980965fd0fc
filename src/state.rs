use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use mongodb::{Client, Database};

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<AppConfig>,
    pub started_at: Instant,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let client = Client::with_uri_str(&config.database_url)
            .await
            .context("connect to database")?;
        let db = client.database(&config.database_name);
        Ok(Self {
            db,
            config,
            started_at: Instant::now(),
        })
    }

    /// State for unit tests; the client connects lazily, so nothing here
    /// touches a real server.
    #[cfg(test)]
    pub async fn fake() -> Self {
        use crate::config::JwtConfig;

        let config = Arc::new(AppConfig {
            database_url: "mongodb://localhost:27017".into(),
            database_name: "blogsite-test".into(),
            jwt: JwtConfig {
                secret: "test-secret".into(),
                ttl_seconds: 300,
            },
        });
        let client = Client::with_uri_str(&config.database_url)
            .await
            .expect("client from static uri");
        Self {
            db: client.database(&config.database_name),
            config,
            started_at: Instant::now(),
        }
    }
}
