//! Verification mail composition and delivery.
//!
//! Delivery goes through an [`EmailSender`]: SMTP when a mail server is
//! configured, otherwise a sender that only logs the message.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use log::{error, info};

use crate::config::MailConfig;
use crate::constants::MAIL_SUBJECT_CONFIRM;
use crate::errors::ApiError;
use crate::services::auth_service::JwtKeys;
use crate::utils::mask_email;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Delivery failure reported by an [`EmailSender`].
#[derive(Debug)]
pub struct MailError(pub String);

impl fmt::Display for MailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mail delivery failed: {}", self.0)
    }
}

impl std::error::Error for MailError {}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError>;
}

/// Development sender that logs messages instead of delivering them.
#[derive(Clone, Debug, Default)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        info!(
            "Mail delivery disabled, would send {:?} to {}:\n{}",
            message.subject,
            mask_email(&message.to),
            message.html_body
        );
        Ok(())
    }
}

/// SMTP sender using STARTTLS and credentials.
pub struct SmtpEmailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpEmailSender {
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let address = config
            .from
            .parse::<lettre::Address>()
            .map_err(|e| MailError(format!("invalid sender address: {}", e)))?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.server)
            .map_err(|e| MailError(e.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from: Mailbox::new(Some(config.from_name.clone()), address),
        })
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|e| MailError(format!("invalid recipient: {}", e)))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject.as_str())
            .header(ContentType::TEXT_HTML)
            .body(message.html_body.clone())
            .map_err(|e| MailError(e.to_string()))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| MailError(e.to_string()))?;
        Ok(())
    }
}

/// Builds verification mails and hands them to the configured sender.
pub struct MailService {
    sender: Arc<dyn EmailSender>,
    keys: JwtKeys,
}

impl MailService {
    pub fn new(sender: Arc<dyn EmailSender>, keys: JwtKeys) -> Self {
        Self { sender, keys }
    }

    /// Compose the confirmation mail; `host` is the API base URL ending in `/`.
    pub fn verification_message(&self, email: &str, host: &str) -> Result<EmailMessage, ApiError> {
        let token = self.keys.create_email_token(email)?;
        let link = format!("{}api/auth/confirmed_email/{}", host, token);

        let html_body = format!(
            r#"<!DOCTYPE html>
<html>
  <body>
    <h2>Hi, {email}!</h2>
    <p>Thanks for signing up for Notebook. Please confirm your email address:</p>
    <p><a href="{link}">Confirm email</a></p>
    <p>If the button does not work, paste this link into your browser:<br>{link}</p>
  </body>
</html>"#
        );

        Ok(EmailMessage {
            to: email.to_string(),
            subject: MAIL_SUBJECT_CONFIRM.to_string(),
            html_body,
        })
    }

    /// Build and deliver the confirmation mail. Failures are only logged.
    pub async fn send_verification(&self, email: &str, host: &str) {
        let result = match self.verification_message(email, host) {
            Ok(message) => self.sender.send(&message).await.map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match result {
            Ok(()) => info!("Verification mail sent to {}", mask_email(email)),
            Err(e) => error!(
                "Failed to send verification mail to {}: {}",
                mask_email(email),
                e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TokenScope;
    use crate::test_support::{test_config, RecordingEmailSender};

    #[test]
    fn verification_message_links_to_confirmation_route() {
        let keys = JwtKeys::from_config(&test_config());
        let service = MailService::new(Arc::new(LogEmailSender), keys.clone());

        let message = service
            .verification_message("jane@example.com", "http://localhost:8000/")
            .unwrap();

        assert_eq!(message.to, "jane@example.com");
        assert_eq!(message.subject, "Confirm your email");

        let prefix = "http://localhost:8000/api/auth/confirmed_email/";
        let start = message.html_body.find(prefix).unwrap() + prefix.len();
        let token: String = message.html_body[start..]
            .chars()
            .take_while(|c| *c != '"')
            .collect();
        let claims = keys.decode(&token).unwrap();
        assert_eq!(claims.sub, "jane@example.com");
        assert_eq!(claims.scope, TokenScope::EmailToken);
    }

    #[actix_web::test]
    async fn send_verification_uses_sender() {
        let sender = Arc::new(RecordingEmailSender::default());
        let service = MailService::new(sender.clone(), JwtKeys::from_config(&test_config()));

        service
            .send_verification("jane@example.com", "http://localhost:8000/")
            .await;

        let sent = sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "jane@example.com");
    }

    #[actix_web::test]
    async fn log_sender_always_succeeds() {
        let message = EmailMessage {
            to: "jane@example.com".to_string(),
            subject: "hi".to_string(),
            html_body: "<p>hi</p>".to_string(),
        };
        assert!(LogEmailSender.send(&message).await.is_ok());
    }
}
