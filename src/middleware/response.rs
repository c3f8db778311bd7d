use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::filter::{Page, PageMeta};

/// Wrapper for API responses that adds the success envelope
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub status_code: Option<StatusCode>,
    pub message: Option<String>,
    pub meta: Option<PageMeta>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful response with default 200 status
    pub fn success(data: T) -> Self {
        Self {
            data,
            status_code: None,
            message: None,
            meta: None,
        }
    }

    pub fn with_status(data: T, status_code: StatusCode) -> Self {
        Self {
            status_code: Some(status_code),
            ..Self::success(data)
        }
    }

    /// 201 Created
    pub fn created(data: T) -> Self {
        Self::with_status(data, StatusCode::CREATED)
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// One page of a listing, `meta` next to `data`
    pub fn page(page: Page<T>) -> Self {
        Self {
            meta: Some(page.meta),
            ..Self::success(page.data)
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "statusCode": 500,
                        "message": "Không thể tạo phản hồi",
                        "code": "INTERNAL_SERVER_ERROR"
                    })),
                )
                    .into_response();
            }
        };

        let mut envelope = json!({
            "success": true,
            "data": data_value
        });
        if let Some(message) = self.message {
            envelope["message"] = Value::String(message);
        }
        if let Some(meta) = self.meta {
            envelope["meta"] = json!(meta);
        }

        (status, Json(envelope)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn wraps_page_with_meta() {
        let page = Page {
            data: vec![1, 2],
            meta: PageMeta {
                total: 12,
                page: 2,
                limit: 2,
                total_pages: 6,
            },
        };
        let response = ApiResponse::page(page).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let value = body(response).await;
        assert_eq!(value["success"], true);
        assert_eq!(value["data"], json!([1, 2]));
        assert_eq!(value["meta"]["totalPages"], 6);
        assert!(value.get("message").is_none());
    }

    #[tokio::test]
    async fn created_carries_message() {
        let response = ApiResponse::created(json!({ "id": 3 }))
            .message("Trường A đã được tạo thành công")
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body(response).await["message"], "Trường A đã được tạo thành công");
    }
}
