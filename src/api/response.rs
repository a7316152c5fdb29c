//! API response utility functions module

use super::types::{ErrorDetail, ErrorResponse};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::CONTENT_TYPE;
use hyper::{Response, StatusCode};
use serde::Serialize;

const JSON: &str = "application/json";

/// Build JSON response
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let json = match serde_json::to_string_pretty(body) {
        Ok(j) => j,
        Err(e) => {
            logger::log_api_error(&format!("Failed to serialize response: {e}"));
            return raw_json(
                StatusCode::INTERNAL_SERVER_ERROR,
                r#"{"status":"error","error_detail":{"code":500,"message":"Internal server error"}}"#,
            );
        }
    };
    raw_json(status, json)
}

fn raw_json(status: StatusCode, body: impl Into<Bytes>) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, JSON)
        .body(Full::new(body.into()))
        .unwrap_or_else(|e| {
            logger::log_api_error(&format!("Failed to build response: {e}"));
            Response::new(Full::new(Bytes::from("Error")))
        })
}

/// JSON error envelope with the status code repeated in the body
pub fn error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let body = ErrorResponse {
        status: "error",
        error_detail: ErrorDetail {
            code: status.as_u16(),
            message: message.to_string(),
        },
    };
    json_response(status, &body)
}

/// 404 Not Found response
pub fn not_found() -> Response<Full<Bytes>> {
    error_response(
        StatusCode::NOT_FOUND,
        "Not Found. Available endpoints: PUT /assets/{path}, GET /assets/{path}, GET /stats",
    )
}

/// 400 Bad Request response
pub fn bad_request(message: &str) -> Response<Full<Bytes>> {
    error_response(StatusCode::BAD_REQUEST, message)
}

/// 413 Payload Too Large response
pub fn payload_too_large(message: &str) -> Response<Full<Bytes>> {
    error_response(StatusCode::PAYLOAD_TOO_LARGE, message)
}

/// 500 Internal Server Error response
pub fn internal_error(message: &str) -> Response<Full<Bytes>> {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, message)
}
