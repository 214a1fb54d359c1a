//! JSON error responses.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use folio_core::PipelineError;
use serde_json::json;

/// Everything a handler can fail with. Rendered as `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    /// No multipart part named `file` carrying a filename
    NoFile,
    /// The `file` part has an empty filename
    EmptyFilename,
    /// The multipart body could not be read
    Multipart(MultipartError),
    /// Decoding or classification failed
    Processing(PipelineError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NoFile | ApiError::EmptyFilename => StatusCode::BAD_REQUEST,
            ApiError::Multipart(e) => e.status(),
            ApiError::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::NoFile => "No file provided".to_string(),
            ApiError::EmptyFilename => "Empty filename".to_string(),
            ApiError::Multipart(e) => e.body_text(),
            ApiError::Processing(e) => e.to_string(),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        ApiError::Multipart(e)
    }
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        ApiError::Processing(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            tracing::error!("Error processing image: {message}");
        } else {
            tracing::debug!("Rejected request ({status}): {message}");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}
