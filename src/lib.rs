pub mod config;
pub mod error;
pub mod observability;
pub mod routes;

pub use config::Config;
pub use routes::AppState;

use contact_relay_notification::{Mailer, SmtpMailer};

/// Create the app router with an explicit mailer
///
/// Integration tests pass a recording mailer here instead of the SMTP relay.
pub fn create_app(config: Config, mailer: impl Mailer) -> axum::Router {
    routes::router(AppState::new(config, mailer))
}

/// Create the app router relaying through the configured SMTP server
pub fn create_smtp_app(config: Config) -> axum::Router {
    let mailer = SmtpMailer::new(config.smtp.clone());

    create_app(config, mailer)
}
