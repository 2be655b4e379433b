//! Mock mailer and mail queue.

use crate::error::{HubError, Result};
use crate::mail::EmailJob;
use crate::providers::{MailQueue, Mailer};
use std::sync::{Arc, Mutex};

/// One email captured by the mock mailer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Rendered HTML body.
    pub html: String,
}

#[derive(Debug, Default)]
struct MailerInner {
    sent: Vec<SentEmail>,
    fail_next: usize,
}

/// Mock mailer.
///
/// Captures sent emails without delivering them; can be told to fail the
/// next N sends to exercise worker error handling.
#[derive(Debug, Clone, Default)]
pub struct MockMailer {
    inner: Arc<Mutex<MailerInner>>,
}

impl MockMailer {
    /// Create a mailer that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `count` sends with an email error.
    pub fn fail_next(&self, count: usize) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_next = count;
        }
    }

    /// Emails captured so far.
    #[must_use]
    pub fn sent(&self) -> Vec<SentEmail> {
        self.inner.lock().map(|i| i.sent.clone()).unwrap_or_default()
    }
}

impl Mailer for MockMailer {
    async fn send_html(&self, to: &str, subject: &str, html: &str) -> Result<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| HubError::EmailError("mock mailer poisoned".to_string()))?;
        if inner.fail_next > 0 {
            inner.fail_next -= 1;
            return Err(HubError::EmailError("injected delivery failure".to_string()));
        }
        inner.sent.push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            html: html.to_string(),
        });
        Ok(())
    }
}

/// Mock mail queue that captures jobs instead of dispatching them.
#[derive(Debug, Clone, Default)]
pub struct MockMailQueue {
    jobs: Arc<Mutex<Vec<EmailJob>>>,
}

impl MockMailQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Jobs enqueued so far.
    #[must_use]
    pub fn jobs(&self) -> Vec<EmailJob> {
        self.jobs.lock().map(|j| j.clone()).unwrap_or_default()
    }
}

impl MailQueue for MockMailQueue {
    fn enqueue(&self, job: EmailJob) -> Result<()> {
        self.jobs
            .lock()
            .map_err(|_| HubError::QueueError("mock queue poisoned".to_string()))?
            .push(job);
        Ok(())
    }
}
