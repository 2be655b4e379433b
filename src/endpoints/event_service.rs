//! Event-service client: the production conflict checker.

use crate::endpoints::ApiClient;
use crate::error::{HubError, Result};
use crate::providers::{ConflictChecker, ConflictDomain};
use crate::scheduling::request::collect_dates;
use crate::scheduling::{CalendarSlot, Layout, ScheduleAction};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const CONFLICTS_PATH: &str = "events/conflicts";

/// HTTP client for the event service's conflict-check endpoint.
///
/// Implements [`ConflictChecker`] by asking the event service whether the
/// requested dates collide with other events (camps, competitions, ...)
/// in the given conflict domain. The service owns the policy; a
/// disallowed response surfaces as [`HubError::EventConflict`].
#[derive(Debug, Clone)]
pub struct EventServiceClient {
    client: ApiClient,
}

#[derive(Debug, Serialize)]
struct ConflictCheckRequest {
    domain: ConflictDomain,
    layout: Layout,
    dates: Vec<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    action: Option<ScheduleAction>,
}

#[derive(Debug, Deserialize)]
struct ConflictCheckResponse {
    allowed: bool,
    #[serde(default)]
    reason: Option<String>,
}

impl EventServiceClient {
    /// Create an event-service client on top of an API client.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

impl ConflictChecker for EventServiceClient {
    async fn process_existing_events(
        &self,
        domain: ConflictDomain,
        layout: Layout,
        slots: &[CalendarSlot],
        action: Option<ScheduleAction>,
    ) -> Result<()> {
        let request = ConflictCheckRequest {
            domain,
            layout,
            dates: collect_dates(slots),
            action,
        };

        let response: ConflictCheckResponse = self
            .client
            .authenticated_endpoint(CONFLICTS_PATH)
            .post(&request)
            .await?;

        if response.allowed {
            Ok(())
        } else {
            Err(HubError::EventConflict(response.reason.unwrap_or_else(
                || format!("{domain} events overlap the requested dates"),
            )))
        }
    }
}
