//! `PostgreSQL` testing store.
//!
//! One [`PostgresTestingStore`] is a request-scoped unit of work: it
//! implements both [`TestingStore`] and [`TransactionManager`] so that
//! every query between `begin` and `commit`/`rollback` runs on the same
//! open transaction. Outside a transaction, queries run directly on the
//! pool.

use crate::error::{HubError, Result};
use crate::providers::{TestingStore, TransactionManager};
use crate::scheduling::request::collect_dates;
use crate::scheduling::{
    AthleteId, CalendarSlot, Layout, RecordId, ScheduleRequest, SlotPatch, TestingRecord,
};
use chrono::{NaiveDate, NaiveTime};
use sqlx::{PgPool, Postgres, Transaction};
use tokio::sync::Mutex;
use uuid::Uuid;

/// Runs one query on the open transaction when there is one, otherwise
/// on the pool. The query expression is evaluated once per arm because
/// the two executors have different types.
macro_rules! run_query {
    ($self:ident, $query:expr, $verb:ident) => {{
        let mut guard = $self.tx.lock().await;
        match guard.as_mut() {
            Some(tx) => $query.$verb(&mut **tx).await,
            None => $query.$verb(&$self.pool).await,
        }
    }};
}

/// `PostgreSQL`-backed testing store and transaction manager.
pub struct PostgresTestingStore {
    pool: PgPool,
    tx: Mutex<Option<Transaction<'static, Postgres>>>,
}

#[derive(sqlx::FromRow)]
struct TestingRow {
    id: Uuid,
    athlete_id: Uuid,
    layout: String,
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
    place: Option<String>,
    note: Option<String>,
    outcome: Option<String>,
    visible: bool,
}

impl From<TestingRow> for TestingRecord {
    fn from(row: TestingRow) -> Self {
        Self {
            id: RecordId(row.id),
            athlete: AthleteId(row.athlete_id),
            layout: Layout::parse(&row.layout),
            date: row.date,
            time: row.time,
            place: row.place,
            note: row.note,
            outcome: row.outcome,
            visible: row.visible,
        }
    }
}

fn db_err(context: &str, e: &sqlx::Error) -> HubError {
    HubError::DatabaseError(format!("{context}: {e}"))
}

impl PostgresTestingStore {
    /// Create a unit of work on a connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            tx: Mutex::new(None),
        }
    }

    /// Run database migrations.
    ///
    /// # Errors
    ///
    /// Returns a database error if migrations fail.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| HubError::DatabaseError(format!("Migration failed: {e}")))?;
        Ok(())
    }

    /// Ids of visible, active-athlete records on any of the given dates.
    async fn conflicting_ids(
        &self,
        athlete: AthleteId,
        layout: Layout,
        dates: &[NaiveDate],
    ) -> Result<Vec<Uuid>> {
        if dates.is_empty() {
            return Ok(Vec::new());
        }
        let query = sqlx::query_as::<_, (Uuid,)>(
            r"
            SELECT t.id
            FROM testings t
            JOIN athletes a ON a.id = t.athlete_id
            WHERE t.athlete_id = $1
              AND t.layout = $2
              AND t.visible
              AND a.active
              AND t.date = ANY($3)
            ",
        )
        .bind(athlete.0)
        .bind(layout.as_str())
        .bind(dates.to_vec());

        let rows =
            run_query!(self, query, fetch_all).map_err(|e| db_err("conflict lookup", &e))?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    async fn insert_record(
        &self,
        athlete: AthleteId,
        layout: Layout,
        date: Option<NaiveDate>,
        slot: &CalendarSlot,
    ) -> Result<()> {
        let query = sqlx::query(
            r"
            INSERT INTO testings (id, athlete_id, layout, date, time, place, note, outcome, visible)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE)
            ",
        )
        .bind(Uuid::new_v4())
        .bind(athlete.0)
        .bind(layout.as_str())
        .bind(date)
        .bind(slot.time)
        .bind(slot.place.clone())
        .bind(slot.note.clone())
        .bind(slot.outcome.clone());

        run_query!(self, query, execute).map_err(|e| db_err("insert testing", &e))?;
        metrics::counter!("scheduling.testing.created", "layout" => layout.as_str()).increment(1);
        Ok(())
    }

    async fn insert_slots(
        &self,
        athlete: AthleteId,
        layout: Layout,
        slots: &[CalendarSlot],
    ) -> Result<()> {
        for slot in slots {
            let dates = slot.occupied_dates();
            if dates.is_empty() {
                self.insert_record(athlete, layout, None, slot).await?;
            } else {
                for date in dates {
                    self.insert_record(athlete, layout, Some(date), slot).await?;
                }
            }
        }
        Ok(())
    }
}

impl TestingStore for PostgresTestingStore {
    async fn check_and_replace_existing(
        &self,
        request: &ScheduleRequest,
        layout: Layout,
    ) -> Result<()> {
        let conflicting = self
            .conflicting_ids(request.athlete, layout, &request.requested_dates())
            .await?;
        if conflicting.is_empty() {
            return Ok(());
        }
        if !request.wants_replace() {
            return Err(HubError::SlotConflict);
        }

        let ids: Vec<RecordId> = conflicting.into_iter().map(RecordId).collect();
        tracing::info!(
            replaced = ids.len(),
            layout = %layout,
            "replacing existing testings before create"
        );
        self.hide_events(&ids, layout).await
    }

    async fn existing_events(
        &self,
        athlete: AthleteId,
        slots: &[CalendarSlot],
        layout: Layout,
    ) -> Result<Vec<TestingRecord>> {
        let dates = collect_dates(slots);
        if dates.is_empty() {
            return Ok(Vec::new());
        }
        let query = sqlx::query_as::<_, TestingRow>(
            r"
            SELECT t.id, t.athlete_id, t.layout, t.date, t.time,
                   t.place, t.note, t.outcome, t.visible
            FROM testings t
            JOIN athletes a ON a.id = t.athlete_id
            WHERE t.athlete_id = $1
              AND t.layout = $2
              AND t.visible
              AND a.active
              AND t.date = ANY($3)
            ORDER BY t.date
            ",
        )
        .bind(athlete.0)
        .bind(layout.as_str())
        .bind(dates);

        let rows =
            run_query!(self, query, fetch_all).map_err(|e| db_err("existing events", &e))?;
        Ok(rows.into_iter().map(TestingRecord::from).collect())
    }

    async fn create_by_slot(
        &self,
        athlete: AthleteId,
        layout: Layout,
        slots: &[CalendarSlot],
    ) -> Result<()> {
        self.insert_slots(athlete, layout, slots).await
    }

    async fn create_done(&self, athlete: AthleteId, slots: &[CalendarSlot]) -> Result<()> {
        self.insert_slots(athlete, Layout::Done, slots).await
    }

    async fn apply_slot_patch(&self, record: &TestingRecord, patch: &SlotPatch) -> Result<()> {
        let query = sqlx::query(
            r"
            UPDATE testings
            SET date  = COALESCE($2, date),
                time  = COALESCE($3, time),
                place = COALESCE($4, place),
                note  = COALESCE($5, note)
            WHERE id = $1
            ",
        )
        .bind(record.id.0)
        .bind(patch.date)
        .bind(patch.time)
        .bind(patch.place.clone())
        .bind(patch.note.clone());

        run_query!(self, query, execute).map_err(|e| db_err("apply slot patch", &e))?;
        Ok(())
    }

    async fn update_done(&self, record: &TestingRecord, slots: &[CalendarSlot]) -> Result<()> {
        let Some(slot) = slots.first() else {
            return Ok(());
        };
        let patch = SlotPatch::from_slot(slot);
        let query = sqlx::query(
            r"
            UPDATE testings
            SET date    = COALESCE($2, date),
                time    = COALESCE($3, time),
                place   = COALESCE($4, place),
                note    = COALESCE($5, note),
                outcome = COALESCE($6, outcome)
            WHERE id = $1
            ",
        )
        .bind(record.id.0)
        .bind(patch.date)
        .bind(patch.time)
        .bind(patch.place)
        .bind(patch.note)
        .bind(slot.outcome.clone());

        run_query!(self, query, execute).map_err(|e| db_err("update done", &e))?;
        Ok(())
    }

    async fn hide_events(&self, ids: &[RecordId], layout: Layout) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let raw_ids: Vec<Uuid> = ids.iter().map(|id| id.0).collect();
        let query = sqlx::query(
            r"
            UPDATE testings
            SET visible = FALSE
            WHERE id = ANY($1)
              AND layout = $2
              AND visible
              AND athlete_id IN (SELECT id FROM athletes WHERE active)
            ",
        )
        .bind(raw_ids)
        .bind(layout.as_str());

        let result = run_query!(self, query, execute).map_err(|e| db_err("hide events", &e))?;
        metrics::counter!("scheduling.testing.replaced", "layout" => layout.as_str())
            .increment(result.rows_affected());
        Ok(())
    }
}

impl TransactionManager for PostgresTestingStore {
    async fn begin(&self) -> Result<()> {
        let mut guard = self.tx.lock().await;
        if guard.is_some() {
            return Err(HubError::TransactionError(
                "a transaction is already open".to_string(),
            ));
        }
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| HubError::TransactionError(e.to_string()))?;
        *guard = Some(tx);
        Ok(())
    }

    async fn commit(&self) -> Result<()> {
        let tx = self.tx.lock().await.take().ok_or_else(|| {
            HubError::TransactionError("commit without an open transaction".to_string())
        })?;
        tx.commit()
            .await
            .map_err(|e| HubError::TransactionError(e.to_string()))
    }

    async fn rollback(&self) -> Result<()> {
        // Idempotent: rolling back with no open transaction is a no-op.
        let Some(tx) = self.tx.lock().await.take() else {
            return Ok(());
        };
        tx.rollback()
            .await
            .map_err(|e| HubError::TransactionError(e.to_string()))
    }
}
