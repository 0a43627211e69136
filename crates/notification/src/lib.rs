mod contact;
mod error;
mod service;
pub(crate) mod template;

pub use contact::*;
pub use error::*;
pub use service::*;
