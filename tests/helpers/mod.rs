//! Shared setup for router-level tests

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use contact_relay::Config;
use contact_relay_contact::ContactSubmission;
use contact_relay_notification::{MailError, Mailer};
use http_body_util::BodyExt;
use tower::ServiceExt;

/// What the recording mailer answers with.
#[derive(Clone, Copy)]
pub enum Outcome {
    Deliver,
    RejectLogin,
    DropConnection,
}

/// Mailer double that keeps every submission it was asked to send.
#[derive(Clone)]
pub struct RecordingMailer {
    outcome: Outcome,
    sent: Arc<Mutex<Vec<ContactSubmission>>>,
}

impl RecordingMailer {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn sent(&self) -> Vec<ContactSubmission> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_contact(&self, submission: &ContactSubmission) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(submission.clone());

        match self.outcome {
            Outcome::Deliver => Ok(()),
            Outcome::RejectLogin => Err(MailError::Authentication(
                "535 5.7.8 Username and Password not accepted".to_string(),
            )),
            Outcome::DropConnection => Err(MailError::Delivery(
                "Connection error: Connection reset by peer (os error 104)".to_string(),
            )),
        }
    }
}

/// Build a config from flat variables without reading the process
/// environment or any config file.
pub fn create_test_config(pairs: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    vars.insert(
        "CONFIG_PATH".to_string(),
        "tests/does-not-exist.toml".to_string(),
    );

    Config::load_from(None, vars).unwrap()
}

pub fn configured() -> Config {
    create_test_config(&[
        ("SMTP_SERVER", "relay.invalid"),
        ("SMTP_PORT", "2525"),
        ("SENDER_EMAIL", "site@example.com"),
        ("SENDER_PASSWORD", "app-password"),
    ])
}

pub fn test_app(outcome: Outcome) -> (Router, RecordingMailer) {
    let mailer = RecordingMailer::new(outcome);
    let app = contact_relay::create_app(configured(), mailer.clone());

    (app, mailer)
}

pub async fn post_json(app: Router, body: impl Into<String>) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/contact")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.into()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

    (status, json)
}

pub fn submission_json(name: &str, email: &str, message: &str) -> String {
    serde_json::json!({ "name": name, "email": email, "message": message }).to_string()
}
