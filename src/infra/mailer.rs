//! Outbound email delivery.
//!
//! Without an SMTP host the notifier skips delivery after building the
//! message, so development and tests need no mail server. Logs carry the
//! user id, never the recipient address or body.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::config::SmtpSettings;
use crate::domain::NotificationMessage;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Delivers user-facing notifications.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send the account deletion confirmation
    async fn send_deletion_notice(&self, message: &NotificationMessage) -> AppResult<()>;
}

/// SMTP-backed notifier
pub struct EmailNotifier {
    settings: SmtpSettings,
}

impl EmailNotifier {
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    fn build_message(&self, message: &NotificationMessage) -> AppResult<Message> {
        let rendered = message.render_deletion();

        let from: Mailbox = self
            .settings
            .from
            .parse()
            .map_err(|e| AppError::notification(format!("invalid sender address: {}", e)))?;
        let to: Mailbox = message
            .recipient
            .parse()
            .map_err(|e| AppError::notification(format!("invalid recipient address: {}", e)))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(rendered.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(rendered.body)
            .map_err(|e| AppError::notification(e.to_string()))
    }

    fn transport(&self, host: &str) -> AppResult<AsyncSmtpTransport<Tokio1Executor>> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| AppError::notification(e.to_string()))?
            .port(self.settings.port);

        if let Some(user) = &self.settings.user {
            let creds = Credentials::new(
                user.clone(),
                self.settings.password().unwrap_or_default().to_string(),
            );
            builder = builder.credentials(creds);
        }

        Ok(builder.build())
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn send_deletion_notice(&self, message: &NotificationMessage) -> AppResult<()> {
        let email = self.build_message(message)?;

        tracing::info!(
            user_id = %message.user_id,
            locale = message.locale.code(),
            "Sending deletion confirmation"
        );

        let Some(host) = self.settings.host.as_deref() else {
            tracing::warn!(
                user_id = %message.user_id,
                "SMTP not configured, deletion confirmation not sent"
            );
            return Ok(());
        };

        self.transport(host)?
            .send(email)
            .await
            .map_err(|e| AppError::notification(e.to_string()))?;

        tracing::info!(user_id = %message.user_id, "Deletion confirmation sent");
        Ok(())
    }
}
