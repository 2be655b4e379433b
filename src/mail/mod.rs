//! Email composition and asynchronous dispatch.
//!
//! [`MailMessage`] renders subject and HTML body; [`crate::providers::Mailer`]
//! implementations deliver ([`SmtpMailer`] in production, [`ConsoleMailer`]
//! in development); [`Outbox`] enqueues serialized [`EmailJob`]s onto a
//! queue drained by a background worker, so request handling never blocks
//! on SMTP.

pub mod console;
pub mod message;
pub mod outbox;
pub mod smtp;

pub use console::ConsoleMailer;
pub use message::{EmailJob, MailMessage};
pub use outbox::{Outbox, TokioMailQueue, spawn_mail_worker};
pub use smtp::SmtpMailer;
