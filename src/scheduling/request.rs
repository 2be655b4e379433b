//! Schedule write request payloads.

use crate::scheduling::layout::ScheduleAction;
use crate::scheduling::record::AthleteId;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// One calendar entry in a schedule request.
///
/// A slot carries either a single `date` or a `dates` list (multi-day
/// availability), plus the slot-specific fields for that testing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSlot {
    /// Single date of the slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    /// Multiple dates for the slot; takes precedence over `date` when a
    /// single date has to be derived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dates: Option<Vec<NaiveDate>>,

    /// Start time of the testing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,

    /// Where the testing takes place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,

    /// Free-form note attached to the slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// Outcome of a completed testing (`done` layout only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
}

impl CalendarSlot {
    /// A slot on a single date.
    #[must_use]
    pub const fn on(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            dates: None,
            time: None,
            place: None,
            note: None,
            outcome: None,
        }
    }

    /// All dates this slot occupies, `dates` list first, then `date`.
    #[must_use]
    pub fn occupied_dates(&self) -> Vec<NaiveDate> {
        let mut out: Vec<NaiveDate> = self.dates.clone().unwrap_or_default();
        if let Some(date) = self.date {
            if !out.contains(&date) {
                out.push(date);
            }
        }
        out
    }
}

/// Input payload for a schedule create/update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// Athlete whose calendar is being written.
    pub athlete: AthleteId,

    /// Ordered calendar slots of the request.
    #[serde(default)]
    pub calendar: Vec<CalendarSlot>,

    /// Conflict-resolution action; absent means "reject on overlap".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ScheduleAction>,
}

impl ScheduleRequest {
    /// Create a request with no action set.
    #[must_use]
    pub const fn new(athlete: AthleteId, calendar: Vec<CalendarSlot>) -> Self {
        Self {
            athlete,
            calendar,
            action: None,
        }
    }

    /// Set the conflict-resolution action.
    #[must_use]
    pub const fn with_action(mut self, action: ScheduleAction) -> Self {
        self.action = Some(action);
        self
    }

    /// All dates requested across every calendar slot, in request order.
    #[must_use]
    pub fn requested_dates(&self) -> Vec<NaiveDate> {
        collect_dates(&self.calendar)
    }

    /// Whether the caller asked to replace overlapping records.
    #[must_use]
    pub fn wants_replace(&self) -> bool {
        self.action == Some(ScheduleAction::Replace)
    }
}

/// All dates occupied by a slot sequence, deduplicated, in slot order.
#[must_use]
pub fn collect_dates(slots: &[CalendarSlot]) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    for slot in slots {
        for date in slot.occupied_dates() {
            if !out.contains(&date) {
                out.push(date);
            }
        }
    }
    out
}

/// Partial update derived from the first calendar slot of an update
/// request.
///
/// When the slot carries a `dates` list it collapses to a single `date`,
/// first element winning: the earliest-listed date is authoritative and
/// any additional slots in the request are discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotPatch {
    /// New date, if the slot carried one.
    pub date: Option<NaiveDate>,
    /// New start time.
    pub time: Option<NaiveTime>,
    /// New place.
    pub place: Option<String>,
    /// New note.
    pub note: Option<String>,
}

impl SlotPatch {
    /// Build the patch from one calendar slot, collapsing `dates` to the
    /// first listed date.
    #[must_use]
    pub fn from_slot(slot: &CalendarSlot) -> Self {
        let date = slot
            .dates
            .as_ref()
            .and_then(|dates| dates.first().copied())
            .or(slot.date);
        Self {
            date,
            time: slot.time,
            place: slot.place.clone(),
            note: slot.note.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn occupied_dates_merges_date_and_dates() {
        let slot = CalendarSlot {
            date: Some(d("2024-01-05")),
            dates: Some(vec![d("2024-01-05"), d("2024-01-06")]),
            ..CalendarSlot::default()
        };
        assert_eq!(slot.occupied_dates(), vec![d("2024-01-05"), d("2024-01-06")]);
    }

    #[test]
    fn patch_collapses_dates_to_first_listed() {
        let slot = CalendarSlot {
            dates: Some(vec![d("2024-01-05"), d("2024-01-06")]),
            ..CalendarSlot::default()
        };
        assert_eq!(SlotPatch::from_slot(&slot).date, Some(d("2024-01-05")));
    }

    #[test]
    fn patch_falls_back_to_single_date() {
        let slot = CalendarSlot::on(d("2024-02-01"));
        assert_eq!(SlotPatch::from_slot(&slot).date, Some(d("2024-02-01")));
    }
}
