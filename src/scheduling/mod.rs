//! Testing scheduling: request payloads, records, and the transactional
//! write path.

pub mod layout;
pub mod record;
pub mod request;
pub mod writer;

pub use layout::{Layout, ScheduleAction};
pub use record::{AthleteId, RecordId, TestingRecord};
pub use request::{CalendarSlot, ScheduleRequest, SlotPatch};
pub use writer::ScheduledEventWriter;
