//! Persisted testing records and their identifiers.

use crate::scheduling::layout::Layout;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of a testing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub Uuid);

impl RecordId {
    /// Generate a fresh record id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier of an athlete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AthleteId(pub Uuid);

impl AthleteId {
    /// Generate a fresh athlete id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AthleteId {
    fn default() -> Self {
        Self::new()
    }
}

/// A persisted testing scheduling record.
///
/// Invariant maintained by the write path: no two visible records of an
/// active athlete share a layout-scoped date unless the caller explicitly
/// replaced the older one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestingRecord {
    /// Store-assigned unique id.
    pub id: RecordId,

    /// Owning athlete.
    pub athlete: AthleteId,

    /// Scheduling state of the record.
    pub layout: Layout,

    /// Date of the testing.
    pub date: Option<NaiveDate>,

    /// Start time of the testing.
    pub time: Option<NaiveTime>,

    /// Where the testing takes place.
    pub place: Option<String>,

    /// Free-form note.
    pub note: Option<String>,

    /// Outcome of a completed testing (`done` layout).
    pub outcome: Option<String>,

    /// Soft-delete flag; superseded records become invisible instead of
    /// being removed.
    pub visible: bool,
}

impl TestingRecord {
    /// Create a new visible record for an athlete on a layout.
    #[must_use]
    pub const fn new(athlete: AthleteId, layout: Layout, id: RecordId) -> Self {
        Self {
            id,
            athlete,
            layout,
            date: None,
            time: None,
            place: None,
            note: None,
            outcome: None,
            visible: true,
        }
    }
}
