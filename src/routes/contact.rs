use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use contact_relay_contact::ContactSubmission;
use serde::Serialize;

use crate::{error::AppError, routes::AppState};

pub const CONFIRMATION: &str = "Message sent successfully. I'll get back to you soon.";

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: &'static str,
}

/// POST /api/contact
///
/// Validates before relaying so a rejected submission never reaches SMTP.
/// Only field lengths are logged, never the submitted text.
#[tracing::instrument(skip_all)]
pub async fn submit(
    State(app_state): State<AppState>,
    payload: Result<Json<ContactSubmission>, JsonRejection>,
) -> Result<Json<ContactResponse>, AppError> {
    let Json(submission) = payload?;

    tracing::info!(
        name_len = submission.name.chars().count(),
        message_len = submission.message.chars().count(),
        "Contact form received"
    );

    if let Err(e) = submission.check() {
        tracing::info!(reason = %e, "Contact form rejected");
        return Err(e.into());
    }

    app_state.mailer.send_contact(&submission).await?;

    Ok(Json(ContactResponse {
        success: true,
        message: CONFIRMATION,
    }))
}
