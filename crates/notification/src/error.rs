use lettre::transport::smtp::response::Code;

/// Reply codes a relay uses to turn down the login.
const AUTH_REJECTION_CODES: [&str; 3] = ["530", "534", "535"];

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// Required mail settings are absent or unusable. Raised before any
    /// connection is opened.
    #[error("mail configuration error: {0}")]
    Configuration(String),

    #[error("smtp authentication rejected: {0}")]
    Authentication(String),

    #[error("smtp delivery failed: {0}")]
    Delivery(String),
}

impl MailError {
    pub fn kind(&self) -> &'static str {
        match self {
            MailError::Configuration(_) => "configuration",
            MailError::Authentication(_) => "authentication",
            MailError::Delivery(_) => "delivery",
        }
    }
}

impl From<lettre::transport::smtp::Error> for MailError {
    fn from(value: lettre::transport::smtp::Error) -> Self {
        if is_auth_rejection(value.status()) {
            Self::Authentication(value.to_string())
        } else {
            Self::Delivery(value.to_string())
        }
    }
}

impl From<lettre::error::Error> for MailError {
    fn from(value: lettre::error::Error) -> Self {
        Self::Delivery(value.to_string())
    }
}

impl From<askama::Error> for MailError {
    fn from(value: askama::Error) -> Self {
        Self::Delivery(format!("failed to render notification: {value}"))
    }
}

impl From<time::error::Format> for MailError {
    fn from(value: time::error::Format) -> Self {
        Self::Delivery(format!("failed to format timestamp: {value}"))
    }
}

pub(crate) fn is_auth_rejection(code: Option<Code>) -> bool {
    code.map(|code| code.to_string())
        .is_some_and(|code| AUTH_REJECTION_CODES.contains(&code.as_str()))
}
