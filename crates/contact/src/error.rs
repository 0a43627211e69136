#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validate(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<validator::ValidationErrors> for Error {
    fn from(value: validator::ValidationErrors) -> Self {
        Self::Validate(crate::submission::first_message(&value))
    }
}
