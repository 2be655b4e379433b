//! SMTP mail transport using Lettre.

use crate::config::SmtpConfig;
use crate::error::{HubError, Result};
use crate::providers::Mailer;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

/// SMTP mailer, suitable for production use.
///
/// A fresh transport is built per send to avoid connection pooling
/// issues with long-lived relays.
#[derive(Clone)]
pub struct SmtpMailer {
    server: String,
    port: u16,
    credentials: Credentials,
    from_email: String,
    from_name: String,
}

impl SmtpMailer {
    /// Create an SMTP mailer from its configuration.
    #[must_use]
    pub fn new(config: SmtpConfig) -> Self {
        Self {
            server: config.server,
            port: config.port,
            credentials: Credentials::new(config.username, config.password),
            from_email: config.from_email,
            from_name: config.from_name,
        }
    }

    fn build_transport(&self) -> Result<SmtpTransport> {
        let relay = SmtpTransport::relay(&self.server)
            .map_err(|e| HubError::EmailError(format!("SMTP relay error: {e}")))?;
        Ok(relay
            .port(self.port)
            .credentials(self.credentials.clone())
            .build())
    }

    fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }
}

impl Mailer for SmtpMailer {
    async fn send_html(&self, to: &str, subject: &str, html: &str) -> Result<()> {
        let email = Message::builder()
            .from(
                self.from_header()
                    .parse()
                    .map_err(|e| HubError::EmailError(format!("Invalid sender: {e}")))?,
            )
            .to(to
                .parse()
                .map_err(|e| HubError::EmailError(format!("Invalid recipient: {e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html.to_string())
            .map_err(|e| HubError::EmailError(format!("Failed to build message: {e}")))?;

        self.build_transport()?
            .send(&email)
            .map_err(|e| HubError::EmailError(format!("SMTP send failed: {e}")))?;

        tracing::info!(to = %to, subject = %subject, "email sent via SMTP");
        metrics::counter!("mail.sent", "transport" => "smtp").increment(1);
        Ok(())
    }
}
