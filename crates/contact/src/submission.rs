use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

pub const NAME_MIN_CHARS: usize = 2;
pub const MESSAGE_MIN_CHARS: usize = 10;

/// Fields are reported in form order so the first problem the visitor sees
/// is the first one on the page.
const FIELD_ORDER: [&str; 2] = ["name", "message"];

/// One contact-form payload, built from the request body and dropped once
/// the response is written.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Validate)]
pub struct ContactSubmission {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    pub email: String,
    #[validate(custom(function = "validate_message"))]
    pub message: String,
}

impl ContactSubmission {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    /// Checks the field rules without side effects.
    pub fn check(&self) -> crate::Result<()> {
        self.validate()?;

        Ok(())
    }
}

fn trimmed_len(value: &str) -> usize {
    value.trim().chars().count()
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if trimmed_len(name) < NAME_MIN_CHARS {
        return Err(ValidationError::new("name_too_short").with_message(Cow::Owned(format!(
            "Name must be at least {NAME_MIN_CHARS} characters long"
        ))));
    }

    Ok(())
}

fn validate_message(message: &str) -> Result<(), ValidationError> {
    if trimmed_len(message) < MESSAGE_MIN_CHARS {
        return Err(
            ValidationError::new("message_too_short").with_message(Cow::Owned(format!(
                "Message must be at least {MESSAGE_MIN_CHARS} characters long"
            ))),
        );
    }

    Ok(())
}

pub(crate) fn first_message(errors: &ValidationErrors) -> String {
    let fields = errors.field_errors();

    FIELD_ORDER
        .iter()
        .filter_map(|field| fields.get(*field))
        .flat_map(|errs| errs.iter())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| errors.to_string())
}
