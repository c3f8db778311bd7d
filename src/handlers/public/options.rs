// handlers/public/options.rs - GET /api/options/:type handler

use axum::{
    extract::Path,
    http::{header, HeaderValue},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::config::config;
use crate::error::ApiError;
use crate::options::OptionType;

/// Lookup list for a select box. The tables are static, so responses are
/// cacheable for `API_OPTIONS_CACHE_SECS`.
pub async fn options_get(Path(kind): Path<String>) -> Result<Response, ApiError> {
    let kind: OptionType = kind.parse().map_err(|e: String| ApiError::bad_request(e))?;

    let mut response = Json(json!({ "data": kind.items() })).into_response();
    let cache = format!("public, max-age={}", config().api.options_cache_secs);
    if let Ok(value) = HeaderValue::from_str(&cache) {
        response.headers_mut().insert(header::CACHE_CONTROL, value);
    }
    Ok(response)
}
