// handlers/public/health.rs - GET /health handler

use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::DatabaseManager;

/// Liveness plus a `SELECT 1` against the pool. Answers 503 while the
/// database is unreachable so the process can still be checked.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let now = chrono::Utc::now();
    let revoked = state.blacklist.len().await;

    match DatabaseManager::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok",
                    "revokedTokens": revoked
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "message": "Cơ sở dữ liệu tạm thời không khả dụng",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database": "unavailable",
                        "revokedTokens": revoked
                    }
                })),
            )
        }
    }
}
