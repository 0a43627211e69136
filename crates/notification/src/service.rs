//! Contact relay using lettre

use std::{fmt, time::Duration};

use async_trait::async_trait;
use contact_relay_contact::ContactSubmission;
use lettre::{
    SmtpTransport, Transport, message::Mailbox, transport::smtp::authentication::Credentials,
};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{ContactNotification, MailError};

#[derive(Deserialize, Clone)]
pub struct MailConfig {
    #[serde(default = "default_server")]
    pub server: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub sender_email: Option<String>,
    #[serde(default)]
    pub sender_password: Option<String>,
    /// Falls back to `sender_email` when unset.
    #[serde(default)]
    pub receiver_email: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            port: default_port(),
            sender_email: None,
            sender_password: None,
            receiver_email: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("sender_email", &self.sender_email)
            .field(
                "sender_password",
                &self.sender_password.as_ref().map(|_| "********"),
            )
            .field("receiver_email", &self.receiver_email)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_server() -> String {
    "smtp.gmail.com".to_string()
}

fn default_port() -> u16 {
    587
}

fn default_timeout_secs() -> u64 {
    10
}

/// Addresses and login resolved from [`MailConfig`].
#[derive(Clone)]
pub struct Envelope {
    pub from: Mailbox,
    pub to: Mailbox,
    pub credentials: Credentials,
}

impl MailConfig {
    pub fn sender_email(&self) -> Option<&str> {
        non_blank(self.sender_email.as_deref())
    }

    pub fn sender_password(&self) -> Option<&str> {
        non_blank(self.sender_password.as_deref())
    }

    pub fn receiver_email(&self) -> Option<&str> {
        non_blank(self.receiver_email.as_deref()).or_else(|| self.sender_email())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolves sender, receiver and login. Never touches the network.
    pub fn envelope(&self) -> Result<Envelope, MailError> {
        let Some(sender) = self.sender_email() else {
            return Err(MailError::Configuration("SENDER_EMAIL is not set".to_string()));
        };
        let Some(password) = self.sender_password() else {
            return Err(MailError::Configuration(
                "SENDER_PASSWORD is not set".to_string(),
            ));
        };

        let from = parse_mailbox("sender", sender)?;
        let to = match self.receiver_email() {
            Some(receiver) => parse_mailbox("receiver", receiver)?,
            None => from.clone(),
        };

        Ok(Envelope {
            credentials: Credentials::new(sender.to_string(), password.to_string()),
            from,
            to,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_mailbox(role: &str, address: &str) -> Result<Mailbox, MailError> {
    address
        .parse()
        .map_err(|e| MailError::Configuration(format!("invalid {role} address {address:?}: {e}")))
}

/// Delivers one contact submission per call.
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    async fn send_contact(&self, submission: &ContactSubmission) -> Result<(), MailError>;
}

/// Authenticated STARTTLS relay. A fresh connection is opened for every
/// send and dropped when it completes.
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    config: MailConfig,
}

impl SmtpMailer {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    fn transport(&self, credentials: Credentials) -> Result<SmtpTransport, MailError> {
        Ok(SmtpTransport::starttls_relay(&self.config.server)?
            .port(self.config.port)
            .timeout(Some(self.config.timeout()))
            .credentials(credentials)
            .build())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[tracing::instrument(
        skip_all,
        fields(smtp_host = %self.config.server, smtp_port = self.config.port)
    )]
    async fn send_contact(&self, submission: &ContactSubmission) -> Result<(), MailError> {
        let envelope = self.config.envelope()?;

        let message = ContactNotification::render(submission, OffsetDateTime::now_utc())?
            .into_message(envelope.from, envelope.to)?;
        let transport = self.transport(envelope.credentials)?;

        tracing::info!("Relaying contact message");

        tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| MailError::Delivery(format!("smtp task aborted: {e}")))??;

        tracing::info!("Contact message relayed");

        Ok(())
    }
}
