use contact_relay_contact::ContactSubmission;
use contact_relay_notification::{MailConfig, MailError, Mailer, SmtpMailer};

fn submission() -> ContactSubmission {
    ContactSubmission::new("Al", "a@b.com", "Hello there!")
}

/// The relay host does not resolve, so reaching the network would surface
/// as a delivery error rather than a configuration error.
fn unreachable_relay() -> MailConfig {
    MailConfig {
        server: "relay.invalid".to_string(),
        port: 2525,
        timeout_secs: 1,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_missing_sender_email_fails_before_connecting() {
    let mailer = SmtpMailer::new(MailConfig {
        sender_password: Some("secret".to_string()),
        ..unreachable_relay()
    });

    let err = mailer.send_contact(&submission()).await.unwrap_err();

    assert!(matches!(err, MailError::Configuration(_)), "got {err:?}");
    assert_eq!(err.kind(), "configuration");
}

#[tokio::test]
async fn test_missing_sender_password_fails_before_connecting() {
    let mailer = SmtpMailer::new(MailConfig {
        sender_email: Some("site@example.com".to_string()),
        ..unreachable_relay()
    });

    let err = mailer.send_contact(&submission()).await.unwrap_err();

    assert!(matches!(err, MailError::Configuration(_)), "got {err:?}");
}

#[tokio::test]
async fn test_unreachable_relay_is_delivery_error() {
    let mailer = SmtpMailer::new(MailConfig {
        sender_email: Some("site@example.com".to_string()),
        sender_password: Some("secret".to_string()),
        ..unreachable_relay()
    });

    let err = mailer.send_contact(&submission()).await.unwrap_err();

    assert!(matches!(err, MailError::Delivery(_)), "got {err:?}");
}
