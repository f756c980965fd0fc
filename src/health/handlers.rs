use axum::{extract::State, Json};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::instrument;

use crate::{error::ApiError, health::repo, state::AppState};

/// Payload consumed directly by liveness probes; not enveloped.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub message: &'static str,
    pub uptime: f64,
    #[serde(rename = "databaseUp")]
    pub database_up: bool,
    pub timestamp: i64,
}

#[instrument(skip(state))]
pub async fn check(State(state): State<AppState>) -> Result<Json<HealthStatus>, ApiError> {
    let sentinel = repo::upsert_sentinel(&state.db).await?;

    Ok(Json(HealthStatus {
        message: "OK",
        uptime: state.started_at.elapsed().as_secs_f64(),
        database_up: sentinel.is_some(),
        timestamp: unix_millis(OffsetDateTime::now_utc()),
    }))
}

fn unix_millis(at: OffsetDateTime) -> i64 {
    (at.unix_timestamp_nanos() / 1_000_000) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn payload_uses_database_up_key() {
        let status = HealthStatus {
            message: "OK",
            uptime: 1.5,
            database_up: true,
            timestamp: 1_722_902_400_000,
        };
        let value = serde_json::to_value(status).unwrap();
        assert_eq!(value["message"], "OK");
        assert_eq!(value["databaseUp"], true);
        assert!(value.get("database_up").is_none());
        assert_eq!(value["uptime"], 1.5);
    }

    #[test]
    fn timestamp_is_unix_milliseconds() {
        let at = datetime!(2026-01-01 00:00:00 UTC);
        assert_eq!(unix_millis(at), 1_767_225_600_000);
    }
}
