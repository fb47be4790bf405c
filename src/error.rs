use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Errors produced while answering a visual question.
#[derive(Debug, thiserror::Error)]
pub enum VqaError {
    /// The uploaded bytes could not be decoded into a bitmap.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// A required multipart field was not present.
    #[error("missing form field: {0}")]
    MissingField(&'static str),

    /// The multipart body itself could not be read.
    #[error("malformed multipart body: {message}")]
    Multipart { status: StatusCode, message: String },

    /// The model failed while generating an answer.
    #[error("inference failed: {0}")]
    InferenceFailure(String),

    /// The model could not be loaded at startup.
    #[error("failed to load model: {0}")]
    ModelLoad(String),
}

impl VqaError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            VqaError::InvalidImage(_) | VqaError::MissingField(_) => StatusCode::BAD_REQUEST,
            VqaError::Multipart { status, .. } => *status,
            VqaError::InferenceFailure(_) | VqaError::ModelLoad(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for VqaError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        VqaError::Multipart {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl From<axum::extract::multipart::MultipartRejection> for VqaError {
    fn from(rejection: axum::extract::multipart::MultipartRejection) -> Self {
        VqaError::Multipart {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for VqaError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{self}");
        } else {
            log::warn!("{self}");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
