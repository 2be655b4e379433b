//! In-memory testing store with a transaction journal and failure
//! injection.

use crate::error::{HubError, Result};
use crate::providers::{TestingStore, TransactionManager};
use crate::scheduling::request::collect_dates;
use crate::scheduling::{
    AthleteId, CalendarSlot, Layout, RecordId, ScheduleRequest, SlotPatch, TestingRecord,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// Store operation at which an injected failure fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    /// Fail `check_and_replace_existing`.
    CheckAndReplace,
    /// Fail `existing_events`.
    ExistingEvents,
    /// Fail `create_by_slot`.
    CreateBySlot,
    /// Fail `create_done`.
    CreateDone,
    /// Fail `apply_slot_patch`.
    ApplySlotPatch,
    /// Fail `update_done`.
    UpdateDone,
    /// Fail `hide_events`.
    HideEvents,
    /// Fail `commit`.
    Commit,
}

/// Transaction operations as seen by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxOp {
    /// A transaction was opened.
    Begin,
    /// The open transaction committed.
    Commit,
    /// The open transaction rolled back.
    Rollback,
}

#[derive(Debug, Default)]
struct Inner {
    records: Vec<TestingRecord>,
    active_athletes: HashSet<AthleteId>,
    snapshot: Option<Vec<TestingRecord>>,
    fail_on: Option<FailPoint>,
    tx_log: Vec<TxOp>,
}

/// In-memory [`TestingStore`] + [`TransactionManager`].
///
/// `begin` snapshots the records; `rollback` restores the snapshot, which
/// makes atomicity observable in tests. An optional [`FailPoint`] turns
/// one operation into an injected database error.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTestingStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryTestingStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| HubError::DatabaseError("mock store poisoned".to_string()))
    }

    fn trip(inner: &Inner, point: FailPoint) -> Result<()> {
        if inner.fail_on == Some(point) {
            return Err(HubError::DatabaseError(format!(
                "injected failure at {point:?}"
            )));
        }
        Ok(())
    }

    /// Mark an athlete as active; inactive athletes are invisible to
    /// every read and soft-delete path.
    pub fn activate_athlete(&self, athlete: AthleteId) {
        if let Ok(mut inner) = self.lock() {
            inner.active_athletes.insert(athlete);
        }
    }

    /// Insert a record directly, bypassing the write path.
    pub fn seed_record(&self, record: TestingRecord) {
        if let Ok(mut inner) = self.lock() {
            inner.records.push(record);
        }
    }

    /// Inject a failure at the given operation.
    pub fn fail_on(&self, point: FailPoint) {
        if let Ok(mut inner) = self.lock() {
            inner.fail_on = Some(point);
        }
    }

    /// Every record, visible or not.
    #[must_use]
    pub fn records(&self) -> Vec<TestingRecord> {
        self.lock().map(|i| i.records.clone()).unwrap_or_default()
    }

    /// Visible records only.
    #[must_use]
    pub fn visible_records(&self) -> Vec<TestingRecord> {
        self.records().into_iter().filter(|r| r.visible).collect()
    }

    /// Look one record up by id.
    #[must_use]
    pub fn record(&self, id: RecordId) -> Option<TestingRecord> {
        self.records().into_iter().find(|r| r.id == id)
    }

    /// Transaction operations in call order.
    #[must_use]
    pub fn transaction_log(&self) -> Vec<TxOp> {
        self.lock().map(|i| i.tx_log.clone()).unwrap_or_default()
    }

    fn overlapping_ids(
        inner: &Inner,
        athlete: AthleteId,
        layout: Layout,
        slots: &[CalendarSlot],
    ) -> Vec<RecordId> {
        let dates = collect_dates(slots);
        inner
            .records
            .iter()
            .filter(|r| {
                r.visible
                    && r.athlete == athlete
                    && r.layout == layout
                    && inner.active_athletes.contains(&r.athlete)
                    && r.date.is_some_and(|d| dates.contains(&d))
            })
            .map(|r| r.id)
            .collect()
    }

    fn hide(inner: &mut Inner, ids: &[RecordId], layout: Layout) {
        let active = inner.active_athletes.clone();
        for record in &mut inner.records {
            if ids.contains(&record.id)
                && record.layout == layout
                && record.visible
                && active.contains(&record.athlete)
            {
                record.visible = false;
            }
        }
    }

    fn insert_from_slot(
        inner: &mut Inner,
        athlete: AthleteId,
        layout: Layout,
        slot: &CalendarSlot,
    ) {
        let dates = slot.occupied_dates();
        let dates = if dates.is_empty() {
            vec![None]
        } else {
            dates.into_iter().map(Some).collect()
        };
        for date in dates {
            let mut record = TestingRecord::new(athlete, layout, RecordId::new());
            record.date = date;
            record.time = slot.time;
            record.place = slot.place.clone();
            record.note = slot.note.clone();
            record.outcome = slot.outcome.clone();
            inner.records.push(record);
        }
    }
}

impl TestingStore for InMemoryTestingStore {
    async fn check_and_replace_existing(
        &self,
        request: &ScheduleRequest,
        layout: Layout,
    ) -> Result<()> {
        let mut inner = self.lock()?;
        Self::trip(&inner, FailPoint::CheckAndReplace)?;

        let overlapping = Self::overlapping_ids(&inner, request.athlete, layout, &request.calendar);
        if overlapping.is_empty() {
            return Ok(());
        }
        if !request.wants_replace() {
            return Err(HubError::SlotConflict);
        }
        Self::hide(&mut inner, &overlapping, layout);
        Ok(())
    }

    async fn existing_events(
        &self,
        athlete: AthleteId,
        slots: &[CalendarSlot],
        layout: Layout,
    ) -> Result<Vec<TestingRecord>> {
        let inner = self.lock()?;
        Self::trip(&inner, FailPoint::ExistingEvents)?;

        let dates = collect_dates(slots);
        Ok(inner
            .records
            .iter()
            .filter(|r| {
                r.visible
                    && r.athlete == athlete
                    && r.layout == layout
                    && inner.active_athletes.contains(&r.athlete)
                    && r.date.is_some_and(|d| dates.contains(&d))
            })
            .cloned()
            .collect())
    }

    async fn create_by_slot(
        &self,
        athlete: AthleteId,
        layout: Layout,
        slots: &[CalendarSlot],
    ) -> Result<()> {
        let mut inner = self.lock()?;
        Self::trip(&inner, FailPoint::CreateBySlot)?;
        for slot in slots {
            Self::insert_from_slot(&mut inner, athlete, layout, slot);
        }
        Ok(())
    }

    async fn create_done(&self, athlete: AthleteId, slots: &[CalendarSlot]) -> Result<()> {
        let mut inner = self.lock()?;
        Self::trip(&inner, FailPoint::CreateDone)?;
        for slot in slots {
            Self::insert_from_slot(&mut inner, athlete, Layout::Done, slot);
        }
        Ok(())
    }

    async fn apply_slot_patch(&self, record: &TestingRecord, patch: &SlotPatch) -> Result<()> {
        let mut inner = self.lock()?;
        Self::trip(&inner, FailPoint::ApplySlotPatch)?;
        if let Some(stored) = inner.records.iter_mut().find(|r| r.id == record.id) {
            if patch.date.is_some() {
                stored.date = patch.date;
            }
            if patch.time.is_some() {
                stored.time = patch.time;
            }
            if patch.place.is_some() {
                stored.place = patch.place.clone();
            }
            if patch.note.is_some() {
                stored.note = patch.note.clone();
            }
        }
        Ok(())
    }

    async fn update_done(&self, record: &TestingRecord, slots: &[CalendarSlot]) -> Result<()> {
        let mut inner = self.lock()?;
        Self::trip(&inner, FailPoint::UpdateDone)?;
        let Some(slot) = slots.first() else {
            return Ok(());
        };
        let patch = SlotPatch::from_slot(slot);
        if let Some(stored) = inner.records.iter_mut().find(|r| r.id == record.id) {
            if patch.date.is_some() {
                stored.date = patch.date;
            }
            if patch.time.is_some() {
                stored.time = patch.time;
            }
            if patch.place.is_some() {
                stored.place = patch.place;
            }
            if patch.note.is_some() {
                stored.note = patch.note;
            }
            if slot.outcome.is_some() {
                stored.outcome = slot.outcome.clone();
            }
        }
        Ok(())
    }

    async fn hide_events(&self, ids: &[RecordId], layout: Layout) -> Result<()> {
        let mut inner = self.lock()?;
        Self::trip(&inner, FailPoint::HideEvents)?;
        Self::hide(&mut inner, ids, layout);
        Ok(())
    }
}

impl TransactionManager for InMemoryTestingStore {
    async fn begin(&self) -> Result<()> {
        let mut inner = self.lock()?;
        let snapshot = inner.records.clone();
        inner.snapshot = Some(snapshot);
        inner.tx_log.push(TxOp::Begin);
        Ok(())
    }

    async fn commit(&self) -> Result<()> {
        let mut inner = self.lock()?;
        Self::trip(&inner, FailPoint::Commit)?;
        inner.snapshot = None;
        inner.tx_log.push(TxOp::Commit);
        Ok(())
    }

    async fn rollback(&self) -> Result<()> {
        let mut inner = self.lock()?;
        if let Some(snapshot) = inner.snapshot.take() {
            inner.records = snapshot;
        }
        inner.tx_log.push(TxOp::Rollback);
        Ok(())
    }
}
