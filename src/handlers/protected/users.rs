// handlers/protected/users.rs - account management shared by admins, managers and teachers
//
// Each route group carries its `Role` as a request extension; the handlers
// only differ through that value.

use axum::{
    extract::{Path, State},
    response::Json,
    Extension,
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::filter::UserListQuery;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::user_service::{CreateUserRequest, UpdateUserRequest};
use crate::services::{UserService, UserView};
use crate::types::{IdsRequest, Role, StatusRequest};

fn service(state: &AppState, role: Role) -> UserService {
    UserService::new(state.pool.clone(), state.hasher, role)
}

fn done(message: String) -> Json<Value> {
    Json(json!({ "success": true, "message": message }))
}

/// POST /api/{role}s/list
pub async fn list(
    State(state): State<AppState>,
    Extension(role): Extension<Role>,
    Json(query): Json<UserListQuery>,
) -> ApiResult<Vec<UserView>> {
    let page = service(&state, role).list(&query).await?;
    Ok(ApiResponse::page(page))
}

/// POST /api/{role}s/add
pub async fn create(
    State(state): State<AppState>,
    Extension(role): Extension<Role>,
    Json(request): Json<CreateUserRequest>,
) -> ApiResult<UserView> {
    let service = service(&state, role);
    let created = service.create(request).await?;
    let message = service.created_message(&created);
    Ok(ApiResponse::created(created).message(message))
}

/// PATCH /api/{role}s/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(role): Extension<Role>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> ApiResult<UserView> {
    let service = service(&state, role);
    let updated = service.update(id, request).await?;
    Ok(ApiResponse::success(updated).message(service.updated_message()))
}

/// DELETE /api/{role}s
pub async fn delete(
    State(state): State<AppState>,
    Extension(role): Extension<Role>,
    Extension(actor): Extension<AuthUser>,
    Json(request): Json<IdsRequest>,
) -> Result<Json<Value>, ApiError> {
    let message = service(&state, role).delete(&actor, &request.ids).await?;
    Ok(done(message))
}

/// POST /api/{role}s/status
pub async fn set_status(
    State(state): State<AppState>,
    Extension(role): Extension<Role>,
    Extension(actor): Extension<AuthUser>,
    Json(request): Json<StatusRequest>,
) -> Result<Json<Value>, ApiError> {
    let message = service(&state, role)
        .set_status(&actor, &request.ids, request.status)
        .await?;
    Ok(done(message))
}

/// POST /api/{role}s/reset-pw
pub async fn reset_password(
    State(state): State<AppState>,
    Extension(role): Extension<Role>,
    Extension(actor): Extension<AuthUser>,
    Json(request): Json<IdsRequest>,
) -> Result<Json<Value>, ApiError> {
    let message = service(&state, role).reset_passwords(&actor, &request.ids).await?;
    Ok(done(message))
}
