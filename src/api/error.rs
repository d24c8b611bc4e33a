//! Turning engine errors into HTTP responses

use crate::api::envelope::Envelope;
use crate::core::error::LabError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, warn};
use uuid::Uuid;

const GENERIC_MESSAGE: &str = "An internal error occurred.";

#[derive(Debug)]
pub enum ApiError {
    Lab(LabError),
    /// Body that could not be decoded into the expected request shape
    BadRequest(String),
}

impl From<LabError> for ApiError {
    fn from(err: LabError) -> Self {
        ApiError::Lab(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// HTTP status for an error category
pub fn status_for(err: &LabError) -> StatusCode {
    match err {
        LabError::UnknownScenario(_)
        | LabError::UnknownSession(_)
        | LabError::UnknownQuestion(_)
        | LabError::UnknownTopic(_) => StatusCode::NOT_FOUND,
        LabError::UnknownAction { .. } | LabError::UnsupportedDifficulty { .. } => {
            StatusCode::BAD_REQUEST
        }
        LabError::SessionTerminal(_) => StatusCode::CONFLICT,
        LabError::InputOutOfRange { .. } | LabError::InvalidAmount(_) | LabError::Calculation(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        LabError::Catalog(_)
        | LabError::Config(_)
        | LabError::IoError(_)
        | LabError::SerdeError(_)
        | LabError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4().to_string();

        let (status, code, message) = match self {
            ApiError::BadRequest(detail) => {
                warn!(error_id = %error_id, detail = %detail, "Malformed request");
                (StatusCode::BAD_REQUEST, "INVALID_REQUEST", detail)
            }
            ApiError::Lab(err) if err.is_client_error() => {
                warn!(error_id = %error_id, code = err.code(), "{}", err);
                (status_for(&err), err.code(), err.to_string())
            }
            ApiError::Lab(err) => {
                error!(error_id = %error_id, code = err.code(), "{}", err);
                (status_for(&err), err.code(), GENERIC_MESSAGE.to_string())
            }
        };

        (status, Json(Envelope::failure(code, message, error_id))).into_response()
    }
}
