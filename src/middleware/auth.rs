use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::app::AppState;
use crate::auth::validate_jwt;
use crate::error::ApiError;

pub use crate::auth::AuthUser;

/// Bearer-token authentication. Rejects missing, revoked, expired or forged
/// tokens and attaches the caller as an [`AuthUser`] extension.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(request.headers())
        .ok_or_else(|| ApiError::unauthorized("Token không được cung cấp"))?;

    if state.blacklist.is_revoked(&token).await {
        return Err(ApiError::unauthorized("Token đã bị thu hồi"));
    }

    let claims = validate_jwt(&token).map_err(|e| {
        debug!("Rejected token: {}", e);
        ApiError::unauthorized("Token không hợp lệ hoặc đã hết hạn")
    })?;

    request.extensions_mut().insert(AuthUser::from_claims(claims, token));
    Ok(next.run(request).await)
}

/// Token from `Authorization: Bearer <token>`
fn extract_jwt_from_headers(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn reads_bearer_tokens_only() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_jwt_from_headers(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_jwt_from_headers(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(extract_jwt_from_headers(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(extract_jwt_from_headers(&headers).as_deref(), Some("abc.def"));
    }
}
