// handlers/mod.rs - two security tiers
//
// Public (no auth): root, health, options, login
// Protected (JWT auth, then a per-group role guard): everything under /api

pub mod protected;
pub mod public;

use axum::{
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

pub const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Spreadsheet download with `Content-Disposition: attachment`
pub fn xlsx_response(status: StatusCode, file_name: &str, bytes: Vec<u8>, extra: Vec<(HeaderName, HeaderValue)>) -> Response {
    let mut response = (status, bytes).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(XLSX_CONTENT_TYPE));
    if let Ok(value) = HeaderValue::from_str(&format!("attachment; filename={}", file_name)) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    for (name, value) in extra {
        headers.insert(name, value);
    }
    response
}
