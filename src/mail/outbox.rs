//! Outbox facade and the asynchronous mail worker.

use crate::error::{HubError, Result};
use crate::mail::message::{EmailJob, MailMessage};
use crate::providers::{MailQueue, Mailer};
use chrono::NaiveDate;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// In-process mail queue backed by a tokio channel.
///
/// [`TokioMailQueue::channel`] returns the sending half together with the
/// receiver to hand to [`spawn_mail_worker`].
#[derive(Debug, Clone)]
pub struct TokioMailQueue {
    sender: mpsc::UnboundedSender<EmailJob>,
}

impl TokioMailQueue {
    /// Create a queue and the receiver its worker will drain.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<EmailJob>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl MailQueue for TokioMailQueue {
    fn enqueue(&self, job: EmailJob) -> Result<()> {
        self.sender
            .send(job)
            .map_err(|e| HubError::QueueError(e.to_string()))
    }
}

/// Spawn the background worker that renders and delivers queued jobs.
///
/// A delivery failure is logged and counted; it never stops the worker,
/// so later jobs still go out. The worker exits when every sender is
/// dropped.
pub fn spawn_mail_worker<M>(
    mut receiver: mpsc::UnboundedReceiver<EmailJob>,
    mailer: M,
) -> JoinHandle<()>
where
    M: Mailer + 'static,
{
    tokio::spawn(async move {
        while let Some(job) = receiver.recv().await {
            let subject = job.message.subject();
            let html = job.message.html_body(&job.base_url);
            match mailer.send_html(&job.to, &subject, &html).await {
                Ok(()) => {
                    info!(to = %job.to, subject = %subject, "queued email delivered");
                }
                Err(err) => {
                    error!(to = %job.to, subject = %subject, %err, "queued email delivery failed");
                    metrics::counter!("mail.delivery_failures").increment(1);
                }
            }
        }
    })
}

/// Facade for sending platform emails asynchronously.
///
/// One method per message kind; each captures the request's base URL into
/// the job, since the worker has no request context to derive it from.
#[derive(Debug, Clone)]
pub struct Outbox<Q> {
    queue: Q,
}

impl<Q: MailQueue> Outbox<Q> {
    /// Create an outbox over a mail queue.
    pub const fn new(queue: Q) -> Self {
        Self { queue }
    }

    /// Queue a "testing scheduled" notification.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::QueueError`] if the job cannot be enqueued.
    pub fn testing_scheduled(
        &self,
        to: &str,
        athlete_name: &str,
        date: NaiveDate,
        base_url: &str,
    ) -> Result<()> {
        self.enqueue(
            to,
            MailMessage::TestingScheduled {
                athlete_name: athlete_name.to_string(),
                date,
            },
            base_url,
        )
    }

    /// Queue a "testing results available" notification.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::QueueError`] if the job cannot be enqueued.
    pub fn testing_results(
        &self,
        to: &str,
        athlete_name: &str,
        date: NaiveDate,
        outcome: &str,
        base_url: &str,
    ) -> Result<()> {
        self.enqueue(
            to,
            MailMessage::TestingResults {
                athlete_name: athlete_name.to_string(),
                date,
                outcome: outcome.to_string(),
            },
            base_url,
        )
    }

    /// Queue a "schedule replaced" notification.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::QueueError`] if the job cannot be enqueued.
    pub fn schedule_replaced(
        &self,
        to: &str,
        athlete_name: &str,
        dates: Vec<NaiveDate>,
        base_url: &str,
    ) -> Result<()> {
        self.enqueue(
            to,
            MailMessage::ScheduleReplaced {
                athlete_name: athlete_name.to_string(),
                dates,
            },
            base_url,
        )
    }

    fn enqueue(&self, to: &str, message: MailMessage, base_url: &str) -> Result<()> {
        self.queue.enqueue(EmailJob {
            to: to.to_string(),
            message,
            base_url: base_url.to_string(),
        })
    }
}
