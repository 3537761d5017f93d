use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(skip, default = "default_status")]
    pub status: StatusCode,
    pub message: String,
}

fn default_status() -> StatusCode { StatusCode::BAD_REQUEST }

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self { Self { status: StatusCode::BAD_REQUEST, message: message.into() } }
    pub fn not_found() -> Self { Self { status: StatusCode::NOT_FOUND, message: "Not found".into() } }
    pub fn internal<E: std::fmt::Display>(e: E) -> Self { Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: e.to_string() } }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response { (self.status, axum::Json(self)).into_response() }
}
