use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use contact_relay_notification::MailError;
use serde::Serialize;
use thiserror::Error;

pub const GENERIC_FAILURE: &str =
    "We couldn't send your message right now. Please try again later.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("Mail error: {0}")]
    MailError(#[from] MailError),
}

impl From<contact_relay_contact::Error> for AppError {
    fn from(err: contact_relay_contact::Error) -> Self {
        match err {
            contact_relay_contact::Error::Validate(msg) => AppError::ValidationError(msg),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, detail) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::InvalidBody(rejection) => {
                tracing::warn!(error = %rejection.body_text(), "Rejected contact payload");
                (
                    StatusCode::BAD_REQUEST,
                    "The request body must be a JSON object with name, email and message."
                        .to_string(),
                )
            }
            AppError::MailError(MailError::Configuration(e)) => {
                tracing::error!(error = %e, "Contact relay is not configured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    GENERIC_FAILURE.to_string(),
                )
            }
            AppError::MailError(e) => {
                tracing::error!(error = %e, kind = e.kind(), "Failed to relay contact message");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    GENERIC_FAILURE.to_string(),
                )
            }
        };

        (
            status_code,
            Json(ErrorBody {
                success: false,
                detail,
            }),
        )
            .into_response()
    }
}
