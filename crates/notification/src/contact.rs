use askama::Template;
use contact_relay_contact::ContactSubmission;
use lettre::{
    Message,
    message::{Mailbox, MultiPart},
};
use time::{OffsetDateTime, format_description::well_known::Rfc2822};

use crate::{
    MailError,
    template::{ContactHtmlTemplate, ContactPlainTemplate},
};

/// A rendered contact notification, ready to be addressed and sent.
#[derive(Debug, Clone)]
pub struct ContactNotification {
    pub subject: String,
    pub html: String,
    pub plain: String,
    pub reply_to: Option<Mailbox>,
}

impl ContactNotification {
    pub fn render(
        submission: &ContactSubmission,
        received_at: OffsetDateTime,
    ) -> Result<Self, MailError> {
        let name = submission.name.trim();
        let email = submission.email.trim();
        let message = submission.message.trim();
        let received_at = received_at.format(&Rfc2822)?;

        let html = ContactHtmlTemplate {
            name,
            email,
            message,
            received_at: &received_at,
        }
        .render()?;

        let plain = ContactPlainTemplate {
            name,
            email,
            message,
            received_at: &received_at,
        }
        .render()?;

        let reply_to = match email.parse::<Mailbox>() {
            Ok(mailbox) => Some(mailbox),
            Err(err) => {
                tracing::debug!(error = %err, "submitter address is not a mailbox, omitting Reply-To");
                None
            }
        };

        Ok(Self {
            subject: subject_for(name),
            html,
            plain,
            reply_to,
        })
    }

    pub fn into_message(self, from: Mailbox, to: Mailbox) -> Result<Message, MailError> {
        let mut builder = Message::builder().from(from).to(to).subject(self.subject);

        if let Some(reply_to) = self.reply_to {
            builder = builder.reply_to(reply_to);
        }

        Ok(builder.multipart(MultiPart::alternative_plain_html(self.plain, self.html))?)
    }
}

fn subject_for(name: &str) -> String {
    let name: String = name
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();

    format!("New message from {name}")
}
