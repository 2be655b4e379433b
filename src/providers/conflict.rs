//! Conflict checker contract.

use crate::error::Result;
use crate::scheduling::{CalendarSlot, Layout, ScheduleAction};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;

/// Logical event grouping used to scope overlap checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictDomain {
    /// Testing events.
    Testing,
    /// Training camps.
    Camp,
    /// Competitions.
    Competition,
}

impl ConflictDomain {
    /// String representation used on the wire and in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Testing => "testing",
            Self::Camp => "camp",
            Self::Competition => "competition",
        }
    }
}

impl fmt::Display for ConflictDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain-level event conflict validation.
///
/// The checker owns the cross-domain overlap policy (camps, competitions,
/// other event kinds). The scheduling writer does not interpret its
/// internals: success means "proceed", an error aborts the transaction
/// and propagates unchanged.
pub trait ConflictChecker: Send + Sync {
    /// Validate the requested calendar slots against existing events in
    /// the given conflict domain.
    ///
    /// Side-effect-free on success.
    ///
    /// # Errors
    ///
    /// Returns an error when the domain policy rejects the requested
    /// slots for this layout/action combination.
    fn process_existing_events(
        &self,
        domain: ConflictDomain,
        layout: Layout,
        slots: &[CalendarSlot],
        action: Option<ScheduleAction>,
    ) -> impl Future<Output = Result<()>> + Send;
}
