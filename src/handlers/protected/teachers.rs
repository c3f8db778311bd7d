// handlers/protected/teachers.rs - teacher spreadsheet endpoints
//
// POST /api/teachers/import           multipart `file`
// GET  /api/teachers/import-template
// POST /api/teachers/export           same filters as the listing

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::info;

use crate::app::AppState;
use crate::config::config;
use crate::error::ApiError;
use crate::export::{export_teachers, EXPORT_FILE_NAME};
use crate::filter::UserListQuery;
use crate::handlers::xlsx_response;
use crate::importer::template::{import_template, TEMPLATE_FILE_NAME};
use crate::importer::{ImportOutcome, PgTeacherStore, TeacherImporter, ERROR_FILE_NAME};
use crate::services::UserService;
use crate::types::Role;

/// Bulk import. Either every row is stored (200 JSON) or nothing is and the
/// caller receives the annotated workbook (400 xlsx).
pub async fn import(State(state): State<AppState>, mut multipart: Multipart) -> Result<Response, ApiError> {
    let upload = read_upload(&mut multipart).await?;
    info!(bytes = upload.len(), "Received teacher import file");

    let store = PgTeacherStore::new(state.pool.clone());
    let importer = TeacherImporter::new(&store, &store, state.hasher, config().import.clone());
    let outcome = importer.import_bytes(&upload).await?;
    let message = outcome.message();

    match outcome {
        ImportOutcome::Committed { imported } => Ok(Json(json!({
            "success": true,
            "message": message,
            "importedCount": imported
        }))
        .into_response()),
        ImportOutcome::Rejected { errors, workbook } => {
            let mut extra = vec![(
                HeaderName::from_static("x-error-count"),
                HeaderValue::from(errors.len()),
            )];
            if let Ok(value) = HeaderValue::from_str(&encode_header_text(&message)) {
                extra.push((HeaderName::from_static("x-import-message"), value));
            }
            Ok(xlsx_response(StatusCode::BAD_REQUEST, ERROR_FILE_NAME, workbook, extra))
        }
    }
}

/// GET /api/teachers/import-template
pub async fn import_template_get() -> Result<Response, ApiError> {
    let bytes = import_template()?;
    Ok(xlsx_response(StatusCode::OK, TEMPLATE_FILE_NAME, bytes, Vec::new()))
}

/// POST /api/teachers/export
pub async fn export(State(state): State<AppState>, Json(query): Json<UserListQuery>) -> Result<Response, ApiError> {
    let teachers = UserService::new(state.pool.clone(), state.hasher, Role::Teacher)
        .export_teachers(&query)
        .await?;
    let bytes = export_teachers(&teachers)?;
    Ok(xlsx_response(StatusCode::OK, EXPORT_FILE_NAME, bytes, Vec::new()))
}

async fn read_upload(multipart: &mut Multipart) -> Result<Bytes, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Không đọc được file tải lên: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Không đọc được file tải lên: {}", e)))?;
        if bytes.is_empty() {
            break;
        }
        return Ok(bytes);
    }
    Err(ApiError::invalid_field("file", "Vui lòng chọn file Excel để import"))
}

/// Percent-encode non-ASCII header text, spaces as `%20`
fn encode_header_text(text: &str) -> String {
    url::form_urlencoded::byte_serialize(text.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_text_is_ascii_and_reversible() {
        let message = "Tải lên thành công, nhưng có 2 giáo viên lỗi.";
        let encoded = encode_header_text(message);
        assert!(encoded.is_ascii());
        assert!(!encoded.contains('+'));
        assert!(encoded.starts_with("T%E1%BA%A3i%20l%C3%AAn"));

        let decoded: String = url::form_urlencoded::parse(format!("m={}", encoded).as_bytes())
            .map(|(_, v)| v.into_owned())
            .collect();
        assert_eq!(decoded, message);
    }
}
