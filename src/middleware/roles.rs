use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::types::Role;

pub const ADMIN_ONLY: &[Role] = &[Role::Admin];
pub const STAFF: &[Role] = &[Role::Admin, Role::Manager];

/// Admit only callers whose role is in `allowed`. Runs after
/// [`jwt_auth_middleware`](super::jwt_auth_middleware).
pub async fn require_roles(
    State(allowed): State<&'static [Role]>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthorized("Token không được cung cấp"))?;

    if !allowed.contains(&user.role) {
        warn!(user_name = %user.user_name, role = ?user.role, path = %request.uri().path(), "Role not permitted");
        return Err(ApiError::forbidden("Bạn không có quyền truy cập"));
    }

    Ok(next.run(request).await)
}
