//! Typed mail messages and their HTML rendering.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A renderable platform email.
///
/// Each variant carries exactly the fields its template needs; the body
/// additionally receives the base URL captured from the originating
/// request, since rendering happens later on a worker with no request
/// context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MailMessage {
    /// A testing was scheduled for an athlete.
    TestingScheduled {
        /// Athlete display name.
        athlete_name: String,
        /// Date of the scheduled testing.
        date: NaiveDate,
    },

    /// Results of a completed testing are available.
    TestingResults {
        /// Athlete display name.
        athlete_name: String,
        /// Date the testing took place.
        date: NaiveDate,
        /// Recorded outcome.
        outcome: String,
    },

    /// Previously scheduled testings were replaced by a new request.
    ScheduleReplaced {
        /// Athlete display name.
        athlete_name: String,
        /// Dates whose testings were replaced.
        dates: Vec<NaiveDate>,
    },
}

impl MailMessage {
    /// Subject line for this message.
    #[must_use]
    pub fn subject(&self) -> String {
        match self {
            Self::TestingScheduled { date, .. } => {
                format!("Testing scheduled for {date}")
            }
            Self::TestingResults { date, .. } => {
                format!("Your testing results from {date}")
            }
            Self::ScheduleReplaced { .. } => "Your testing schedule was updated".to_string(),
        }
    }

    /// Render the HTML body.
    ///
    /// `base_url` is the public URL of the application as seen by the
    /// original request, used for links back into the platform.
    #[must_use]
    pub fn html_body(&self, base_url: &str) -> String {
        match self {
            Self::TestingScheduled { athlete_name, date } => format!(
                r#"<!DOCTYPE html>
<html>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
        <h2 style="color: #2563eb;">Testing scheduled</h2>
        <p>Hi {athlete_name},</p>
        <p>A testing has been scheduled for you on <strong>{date}</strong>.</p>
        <p style="margin: 30px 0;">
            <a href="{base_url}/schedule"
               style="display: inline-block; background-color: #2563eb; color: white; padding: 12px 24px; text-decoration: none; border-radius: 4px;">
                View your schedule
            </a>
        </p>
    </div>
</body>
</html>"#
            ),
            Self::TestingResults {
                athlete_name,
                date,
                outcome,
            } => format!(
                r#"<!DOCTYPE html>
<html>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
        <h2 style="color: #2563eb;">Testing results</h2>
        <p>Hi {athlete_name},</p>
        <p>The results of your testing on <strong>{date}</strong> are in:</p>
        <blockquote style="border-left: 4px solid #2563eb; padding-left: 12px; color: #555;">{outcome}</blockquote>
        <p><a href="{base_url}/results">See the full breakdown</a></p>
    </div>
</body>
</html>"#
            ),
            Self::ScheduleReplaced {
                athlete_name,
                dates,
            } => {
                let listed = dates
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    r#"<!DOCTYPE html>
<html>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
        <h2 style="color: #2563eb;">Schedule updated</h2>
        <p>Hi {athlete_name},</p>
        <p>Your testings on {listed} were replaced with a new schedule.</p>
        <p><a href="{base_url}/schedule">Review the changes</a></p>
    </div>
</body>
</html>"#
                )
            }
        }
    }
}

/// A serialized unit of asynchronous mail work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailJob {
    /// Recipient address.
    pub to: String,

    /// The message to render and send.
    pub message: MailMessage,

    /// Public base URL of the application, captured at enqueue time
    /// because the worker has no request context of its own.
    pub base_url: String,
}
