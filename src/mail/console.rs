//! Console mailer for development and testing.

use crate::error::Result;
use crate::providers::Mailer;
use tracing::info;

/// Mailer that logs messages instead of sending them.
///
/// Useful for development where real delivery is unwanted.
#[derive(Clone, Debug, Default)]
pub struct ConsoleMailer;

impl ConsoleMailer {
    /// Create a new console mailer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Mailer for ConsoleMailer {
    async fn send_html(&self, to: &str, subject: &str, html: &str) -> Result<()> {
        info!(
            to = %to,
            subject = %subject,
            body_bytes = html.len(),
            "📧 Email (Development Mode)"
        );
        Ok(())
    }
}
