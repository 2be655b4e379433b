//! # Athlete Hub backend glue
//!
//! Thin, well-typed glue layers for the Athlete Hub coaching platform:
//!
//! - **Scheduling** ([`scheduling`]): the conflict-aware transactional
//!   write path for testing records. [`ScheduledEventWriter`] validates
//!   requested calendar slots against overlapping events, applies a
//!   replace-or-reject policy, and persists through one atomic
//!   transaction per call.
//! - **Endpoints** ([`endpoints`]): a typed JSON endpoint layer over the
//!   platform API, including the event-service conflict checker.
//! - **Mail** ([`mail`]): typed email messages rendered to HTML and
//!   dispatched asynchronously through a job queue and worker.
//!
//! Collaborators are injected through the traits in [`providers`]; mock
//! implementations live in [`mocks`] (enabled by the default
//! `test-utils` feature) and the `PostgreSQL` store in [`stores`]
//! (behind the `postgres` feature).
//!
//! ## Example: wiring the writer
//!
//! ```rust
//! use athlete_hub::mocks::{InMemoryTestingStore, MockConflictChecker};
//! use athlete_hub::{AthleteId, CalendarSlot, Layout, ScheduleRequest, ScheduledEventWriter};
//!
//! # async fn example() -> athlete_hub::Result<()> {
//! let store = InMemoryTestingStore::new();
//! let athlete = AthleteId::new();
//! store.activate_athlete(athlete);
//!
//! let writer = ScheduledEventWriter::new(MockConflictChecker::new(), store.clone());
//! let request = ScheduleRequest::new(
//!     athlete,
//!     vec![CalendarSlot::on("2024-03-10".parse().map_err(|_| {
//!         athlete_hub::HubError::DatabaseError("bad date".into())
//!     })?)],
//! );
//! writer.create_by_layout(&request, Layout::Planned).await?;
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

pub mod config;
pub mod endpoints;
pub mod error;
pub mod mail;
#[cfg(feature = "test-utils")]
pub mod mocks;
pub mod providers;
pub mod scheduling;
#[cfg(feature = "postgres")]
pub mod stores;

pub use config::{ApiConfig, SmtpConfig};
pub use error::{HubError, Result};
pub use scheduling::{
    AthleteId, CalendarSlot, Layout, RecordId, ScheduleAction, ScheduleRequest,
    ScheduledEventWriter, SlotPatch, TestingRecord,
};
