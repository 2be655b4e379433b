//! Record store and transaction contracts.

use crate::error::Result;
use crate::scheduling::{
    AthleteId, CalendarSlot, Layout, RecordId, ScheduleRequest, SlotPatch, TestingRecord,
};
use std::future::Future;

/// Typed CRUD for testing records.
///
/// The store exclusively owns persistence; the writer only orchestrates.
/// All read paths are restricted to visible records of active athletes.
pub trait TestingStore: Send + Sync {
    /// Validate layout-scoped overlap for the records about to be
    /// created and soft-delete superseded ones.
    ///
    /// Contract owned by the store: overlapping visible records on the
    /// requested dates are hidden when the request carries the `REPLACE`
    /// action, otherwise the call fails with a slot conflict.
    ///
    /// # Errors
    ///
    /// Returns [`crate::HubError::SlotConflict`] on non-replaced overlap,
    /// or a database error.
    fn check_and_replace_existing(
        &self,
        request: &ScheduleRequest,
        layout: Layout,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Visible records of the active athlete occupying any of the
    /// requested slots under the given layout.
    ///
    /// # Errors
    ///
    /// Returns a database error if the lookup fails.
    fn existing_events(
        &self,
        athlete: AthleteId,
        slots: &[CalendarSlot],
        layout: Layout,
    ) -> impl Future<Output = Result<Vec<TestingRecord>>> + Send;

    /// Persist one new record per slot date for a slot-based layout
    /// (`available` or `planned`).
    ///
    /// # Errors
    ///
    /// Returns a database error if any insert fails.
    fn create_by_slot(
        &self,
        athlete: AthleteId,
        layout: Layout,
        slots: &[CalendarSlot],
    ) -> impl Future<Output = Result<()>> + Send;

    /// Persist completed testing records, carrying outcome fields rather
    /// than a future slot.
    ///
    /// # Errors
    ///
    /// Returns a database error if any insert fails.
    fn create_done(
        &self,
        athlete: AthleteId,
        slots: &[CalendarSlot],
    ) -> impl Future<Output = Result<()>> + Send;

    /// Apply a partial slot update to an existing record.
    ///
    /// # Errors
    ///
    /// Returns a database error if the update fails.
    fn apply_slot_patch(
        &self,
        record: &TestingRecord,
        patch: &SlotPatch,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Merge the calendar payload of a completed testing (outcome data)
    /// into an existing record.
    ///
    /// # Errors
    ///
    /// Returns a database error if the update fails.
    fn update_done(
        &self,
        record: &TestingRecord,
        slots: &[CalendarSlot],
    ) -> impl Future<Output = Result<()>> + Send;

    /// Soft-delete the given records, restricted to visible records of
    /// active athletes under the given layout.
    ///
    /// # Errors
    ///
    /// Returns a database error if the update fails.
    fn hide_events(
        &self,
        ids: &[RecordId],
        layout: Layout,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Scoped atomic transaction control.
///
/// One transaction per write call: `begin` before the first store
/// operation, `commit` only when every step succeeded, `rollback`
/// otherwise. The transaction is the sole concurrency-control mechanism;
/// isolation is the underlying store's guarantee.
pub trait TransactionManager: Send + Sync {
    /// Open a transaction for the current write call.
    ///
    /// # Errors
    ///
    /// Returns a transaction error if one cannot be opened.
    fn begin(&self) -> impl Future<Output = Result<()>> + Send;

    /// Commit the open transaction.
    ///
    /// # Errors
    ///
    /// Returns a transaction error if the commit fails or no transaction
    /// is open.
    fn commit(&self) -> impl Future<Output = Result<()>> + Send;

    /// Roll the open transaction back, discarding every mutation made
    /// since `begin`.
    ///
    /// # Errors
    ///
    /// Returns a transaction error if the rollback fails.
    fn rollback(&self) -> impl Future<Output = Result<()>> + Send;
}
