//! Mail delivery and queueing contracts.

use crate::error::Result;
use crate::mail::EmailJob;
use std::future::Future;

/// Email delivery transport.
///
/// Abstracts over delivery backends (SMTP relay, console output, mocks).
/// Messages arrive already rendered; rendering is the job of
/// [`crate::mail::MailMessage`].
pub trait Mailer: Send + Sync {
    /// Deliver one HTML email.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport rejects the message or the
    /// recipient address is invalid.
    fn send_html(
        &self,
        to: &str,
        subject: &str,
        html: &str,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Asynchronous mail job queue.
///
/// Enqueueing is fire-and-forget from the request's point of view: the
/// job is rendered and delivered later by a worker with no request
/// context, which is why [`EmailJob`] carries the base URL captured at
/// enqueue time.
pub trait MailQueue: Send + Sync {
    /// Enqueue one mail job for asynchronous delivery.
    ///
    /// # Errors
    ///
    /// Returns [`crate::HubError::QueueError`] if the queue is closed.
    fn enqueue(&self, job: EmailJob) -> Result<()>;
}
