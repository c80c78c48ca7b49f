use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

/// Response-mapping layer that rewraps framework-generated errors (unknown
/// path 404s, method-mismatch 405s, body-deserialization rejections) into the
/// standard failure envelope. Handler errors already carry the envelope and
/// pass through untouched.
pub async fn envelope_errors(response: Response) -> Response {
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/json"))
        .unwrap_or(false);
    if is_json {
        return response;
    }

    (
        status,
        Json(json!({
            "success": false,
            "error": status.as_u16(),
            "message": canonical_message(status),
        })),
    )
        .into_response()
}

/// Fixed client-facing messages for the statuses this API produces.
fn canonical_message(status: StatusCode) -> String {
    match status {
        StatusCode::BAD_REQUEST => "bad request".to_string(),
        StatusCode::UNAUTHORIZED => "unauthorized".to_string(),
        StatusCode::NOT_FOUND => "resource not found".to_string(),
        StatusCode::METHOD_NOT_ALLOWED => "method not allowed".to_string(),
        StatusCode::UNPROCESSABLE_ENTITY => "unprocessable".to_string(),
        StatusCode::INTERNAL_SERVER_ERROR => "internal server error".to_string(),
        other => other
            .canonical_reason()
            .unwrap_or("error")
            .to_ascii_lowercase(),
    }
}
