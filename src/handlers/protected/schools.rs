// handlers/protected/schools.rs - /api/schools handlers

use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::models::School;
use crate::error::ApiError;
use crate::filter::SchoolListQuery;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::school_service::{CreateSchoolRequest, UpdateSchoolRequest};
use crate::services::SchoolService;
use crate::types::IdsRequest;

/// POST /api/schools/list
pub async fn list(State(state): State<AppState>, Json(query): Json<SchoolListQuery>) -> ApiResult<Vec<School>> {
    let page = SchoolService::new(state.pool.clone()).list(&query).await?;
    Ok(ApiResponse::page(page))
}

/// POST /api/schools
pub async fn create(State(state): State<AppState>, Json(request): Json<CreateSchoolRequest>) -> ApiResult<School> {
    let school = SchoolService::new(state.pool.clone()).create(request).await?;
    let message = format!("Trường {} đã được tạo thành công", school.name);
    Ok(ApiResponse::created(school).message(message))
}

/// GET /api/schools/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<School> {
    let school = SchoolService::new(state.pool.clone()).get(id).await?;
    Ok(ApiResponse::success(school))
}

/// PATCH /api/schools/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateSchoolRequest>,
) -> ApiResult<School> {
    let school = SchoolService::new(state.pool.clone()).update(id, request).await?;
    Ok(ApiResponse::success(school).message("Cập nhật trường học thành công"))
}

/// DELETE /api/schools
pub async fn delete(State(state): State<AppState>, Json(request): Json<IdsRequest>) -> Result<Json<Value>, ApiError> {
    let message = SchoolService::new(state.pool.clone()).delete(&request.ids).await?;
    Ok(Json(json!({ "success": true, "message": message })))
}
