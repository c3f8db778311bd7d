// handlers/public/login.rs - POST /api/auth/login handler

use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::auth_service::LoginRequest;
use crate::services::AuthService;

/// Exchange user name and password for an access token.
///
/// ```json
/// { "userName": "admin", "password": "..." }
/// ```
pub async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> Result<Json<Value>, ApiError> {
    let (token, user) = AuthService::new(state.pool.clone(), state.hasher)
        .login(request)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Đăng nhập thành công!",
        "access_token": token,
        "user": user
    })))
}
