// handlers/protected/session.rs - logout, change-password and "me"

use axum::{extract::State, response::Json, Extension};
use serde_json::{json, Value};
use tracing::info;

use crate::app::AppState;
use crate::auth::AuthUser;
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::auth_service::ChangePasswordRequest;
use crate::services::AuthService;

/// POST /api/auth/logout - revoke the presented token until it expires
pub async fn logout(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> Json<Value> {
    state.blacklist.revoke(&user.token, user.exp).await;
    info!(user_name = %user.user_name, "User logged out");
    Json(json!({ "success": true, "message": "Đăng xuất thành công." }))
}

/// POST /api/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<Value>, ApiError> {
    AuthService::new(state.pool.clone(), state.hasher)
        .change_password(&user, request)
        .await?;
    Ok(Json(json!({ "success": true, "message": "Đổi mật khẩu thành công" })))
}

/// GET /api/users/me
pub async fn me(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<User> {
    let current = AuthService::new(state.pool.clone(), state.hasher).me(&user).await?;
    Ok(ApiResponse::success(current))
}
