use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};
use tracing::warn;

use crate::infra::app_state::AppState;

/// Liveness plus a store round-trip when Postgres backs the ports.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let mut body = json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    });

    if let Some(postgres) = &state.postgres {
        match postgres.ping().await {
            Ok(()) => body["database"] = json!("ok"),
            Err(err) => {
                warn!(error = %err, "health check could not reach the database");
                body["status"] = json!("degraded");
                body["database"] = json!("unreachable");
                return (StatusCode::SERVICE_UNAVAILABLE, Json(body));
            }
        }
    }

    (StatusCode::OK, Json(body))
}
