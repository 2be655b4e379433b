//! Mock conflict checker.

use crate::error::{HubError, Result};
use crate::providers::{ConflictChecker, ConflictDomain};
use crate::scheduling::request::collect_dates;
use crate::scheduling::{CalendarSlot, Layout, ScheduleAction};
use chrono::NaiveDate;
use std::sync::{Arc, Mutex};

/// One recorded call to the mock checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictCall {
    /// Conflict domain of the call.
    pub domain: ConflictDomain,
    /// Layout of the call.
    pub layout: Layout,
    /// Dates derived from the passed slots.
    pub dates: Vec<NaiveDate>,
    /// Action of the call.
    pub action: Option<ScheduleAction>,
}

#[derive(Debug, Default)]
struct Inner {
    rejection: Option<String>,
    calls: Vec<ConflictCall>,
}

/// Mock conflict checker.
///
/// Accepts every request by default; configure a rejection to simulate a
/// domain-level conflict. Every call is recorded for assertions.
#[derive(Debug, Clone, Default)]
pub struct MockConflictChecker {
    inner: Arc<Mutex<Inner>>,
}

impl MockConflictChecker {
    /// Create a checker that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a checker that rejects every request with the given reason.
    #[must_use]
    pub fn rejecting(reason: impl Into<String>) -> Self {
        let checker = Self::new();
        if let Ok(mut inner) = checker.inner.lock() {
            inner.rejection = Some(reason.into());
        }
        checker
    }

    /// All calls made so far.
    #[must_use]
    pub fn calls(&self) -> Vec<ConflictCall> {
        self.inner.lock().map(|i| i.calls.clone()).unwrap_or_default()
    }
}

impl ConflictChecker for MockConflictChecker {
    async fn process_existing_events(
        &self,
        domain: ConflictDomain,
        layout: Layout,
        slots: &[CalendarSlot],
        action: Option<ScheduleAction>,
    ) -> Result<()> {
        let rejection = {
            let mut inner = self
                .inner
                .lock()
                .map_err(|_| HubError::EventConflict("mock checker poisoned".to_string()))?;
            inner.calls.push(ConflictCall {
                domain,
                layout,
                dates: collect_dates(slots),
                action,
            });
            inner.rejection.clone()
        };
        match rejection {
            Some(reason) => Err(HubError::EventConflict(reason)),
            None => Ok(()),
        }
    }
}
