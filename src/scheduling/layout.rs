//! Scheduling layouts and request actions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scheduling state of a testing record.
///
/// Layouts drive which persistence path a create/update takes:
/// `available` and `planned` are slot-based, `done` carries outcome data,
/// and anything unrecognized deserializes to [`Layout::Unknown`], which is
/// a deliberate no-op branch in the writer (unrecognized layouts are
/// persisted by nobody until product says otherwise).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// An open slot an athlete may book.
    Available,
    /// A booked, upcoming testing.
    Planned,
    /// A completed testing with outcome fields.
    Done,
    /// Any layout value outside the known set.
    #[serde(other)]
    Unknown,
}

impl Layout {
    /// Database/string representation of the layout.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Planned => "planned",
            Self::Done => "done",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a layout from its string representation.
    ///
    /// Unrecognized values map to [`Layout::Unknown`]; this is total on
    /// purpose so stored rows with a newer layout still load.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "available" => Self::Available,
            "planned" => Self::Planned,
            "done" => Self::Done,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested conflict-resolution action on a schedule write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScheduleAction {
    /// Soft-delete overlapping records and take their slots.
    Replace,
    /// Any other action value; treated as "do not replace".
    #[serde(other)]
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_known_layouts() {
        for layout in [Layout::Available, Layout::Planned, Layout::Done] {
            assert_eq!(Layout::parse(layout.as_str()), layout);
        }
    }

    #[test]
    fn parse_maps_unrecognized_to_unknown() {
        assert_eq!(Layout::parse("cancelled"), Layout::Unknown);
        assert_eq!(Layout::parse(""), Layout::Unknown);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn unknown_action_deserializes_to_other() {
        let action: ScheduleAction = serde_json::from_str("\"MERGE\"").unwrap();
        assert_eq!(action, ScheduleAction::Other);
        let action: ScheduleAction = serde_json::from_str("\"REPLACE\"").unwrap();
        assert_eq!(action, ScheduleAction::Replace);
    }
}
