//! Integration tests for the conflict-aware scheduling write path.

#![allow(clippy::unwrap_used)]

use athlete_hub::mocks::{FailPoint, InMemoryTestingStore, MockConflictChecker, TxOp};
use athlete_hub::providers::ConflictDomain;
use athlete_hub::{
    AthleteId, CalendarSlot, HubError, Layout, RecordId, ScheduleAction, ScheduleRequest,
    ScheduledEventWriter, TestingRecord,
};
use chrono::NaiveDate;

fn d(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

/// Store with one active athlete, plus a writer over it.
fn setup() -> (
    ScheduledEventWriter<MockConflictChecker, InMemoryTestingStore>,
    MockConflictChecker,
    InMemoryTestingStore,
    AthleteId,
) {
    let store = InMemoryTestingStore::new();
    let checker = MockConflictChecker::new();
    let athlete = AthleteId::new();
    store.activate_athlete(athlete);
    let writer = ScheduledEventWriter::new(checker.clone(), store.clone());
    (writer, checker, store, athlete)
}

fn seed(store: &InMemoryTestingStore, athlete: AthleteId, layout: Layout, date: &str) -> TestingRecord {
    let mut record = TestingRecord::new(athlete, layout, RecordId::new());
    record.date = Some(d(date));
    store.seed_record(record.clone());
    record
}

#[tokio::test]
async fn create_persists_one_record_per_slot_date() {
    let (writer, _, store, athlete) = setup();
    let request = ScheduleRequest::new(
        athlete,
        vec![CalendarSlot {
            dates: Some(vec![d("2024-01-05"), d("2024-01-06")]),
            place: Some("Track A".to_string()),
            ..CalendarSlot::default()
        }],
    );

    writer
        .create_by_layout(&request, Layout::Available)
        .await
        .unwrap();

    let records = store.visible_records();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.layout == Layout::Available));
    assert!(records.iter().all(|r| r.place.as_deref() == Some("Track A")));
    assert_eq!(store.transaction_log(), vec![TxOp::Begin, TxOp::Commit]);
}

#[tokio::test]
async fn create_done_marks_outcome_fields() {
    let (writer, _, store, athlete) = setup();
    let request = ScheduleRequest::new(
        athlete,
        vec![CalendarSlot {
            date: Some(d("2024-02-01")),
            outcome: Some("VO2max 61".to_string()),
            ..CalendarSlot::default()
        }],
    );

    writer.create_by_layout(&request, Layout::Done).await.unwrap();

    let records = store.visible_records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].layout, Layout::Done);
    assert_eq!(records[0].outcome.as_deref(), Some("VO2max 61"));
}

// Property 1: any failure leaves no observable mutation behind.
#[tokio::test]
async fn failed_create_rolls_back_every_mutation() {
    let (writer, _, store, athlete) = setup();
    seed(&store, athlete, Layout::Planned, "2024-01-04");
    store.fail_on(FailPoint::CreateBySlot);

    let request = ScheduleRequest::new(athlete, vec![CalendarSlot::on(d("2024-01-05"))]);
    let err = writer
        .create_by_layout(&request, Layout::Planned)
        .await
        .unwrap_err();

    assert!(matches!(err, HubError::DatabaseError(_)));
    assert_eq!(store.records().len(), 1, "seeded record only");
    assert_eq!(store.transaction_log(), vec![TxOp::Begin, TxOp::Rollback]);
}

#[tokio::test]
async fn failed_commit_rolls_back_and_surfaces_the_error() {
    let (writer, _, store, athlete) = setup();
    store.fail_on(FailPoint::Commit);

    let request = ScheduleRequest::new(athlete, vec![CalendarSlot::on(d("2024-01-05"))]);
    let err = writer
        .create_by_layout(&request, Layout::Planned)
        .await
        .unwrap_err();

    assert!(matches!(err, HubError::DatabaseError(_)));
    assert!(store.records().is_empty());
    assert_eq!(store.transaction_log(), vec![TxOp::Begin, TxOp::Rollback]);
}

// Property 2: overlap without REPLACE is rejected, existing record intact.
#[tokio::test]
async fn create_overlap_without_replace_is_a_slot_conflict() {
    let (writer, _, store, athlete) = setup();
    let existing = seed(&store, athlete, Layout::Planned, "2024-01-05");

    let request = ScheduleRequest::new(athlete, vec![CalendarSlot::on(d("2024-01-05"))]);
    let err = writer
        .create_by_layout(&request, Layout::Planned)
        .await
        .unwrap_err();

    assert_eq!(err, HubError::SlotConflict);
    assert_eq!(err.to_string(), "On this date(s) testing already exist");
    assert_eq!(store.records(), vec![existing]);
    assert_eq!(store.transaction_log(), vec![TxOp::Begin, TxOp::Rollback]);
}

#[tokio::test]
async fn update_overlap_without_replace_is_a_slot_conflict() {
    let (writer, _, store, athlete) = setup();
    let other = seed(&store, athlete, Layout::Planned, "2024-01-05");
    let record = seed(&store, athlete, Layout::Planned, "2024-01-10");

    let request = ScheduleRequest::new(athlete, vec![CalendarSlot::on(d("2024-01-05"))]);
    let err = writer.update_by_layout(&request, &record).await.unwrap_err();

    assert_eq!(err, HubError::SlotConflict);
    let stored_other = store.record(other.id).unwrap();
    assert!(stored_other.visible);
    let stored = store.record(record.id).unwrap();
    assert_eq!(stored.date, Some(d("2024-01-10")), "update rolled back");
}

// Property 3: REPLACE soft-deletes the overlap and applies the write.
#[tokio::test]
async fn create_with_replace_hides_superseded_records() {
    let (writer, _, store, athlete) = setup();
    let existing = seed(&store, athlete, Layout::Planned, "2024-01-05");

    let request = ScheduleRequest::new(athlete, vec![CalendarSlot::on(d("2024-01-05"))])
        .with_action(ScheduleAction::Replace);
    writer
        .create_by_layout(&request, Layout::Planned)
        .await
        .unwrap();

    let superseded = store.record(existing.id).unwrap();
    assert!(!superseded.visible, "prior record is soft-deleted");
    let visible = store.visible_records();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].date, Some(d("2024-01-05")));
}

#[tokio::test]
async fn update_with_replace_hides_other_records_and_applies_patch() {
    let (writer, _, store, athlete) = setup();
    let other = seed(&store, athlete, Layout::Planned, "2024-01-05");
    let record = seed(&store, athlete, Layout::Planned, "2024-01-10");

    let request = ScheduleRequest::new(athlete, vec![CalendarSlot::on(d("2024-01-05"))])
        .with_action(ScheduleAction::Replace);
    writer.update_by_layout(&request, &record).await.unwrap();

    assert!(!store.record(other.id).unwrap().visible);
    assert_eq!(store.record(record.id).unwrap().date, Some(d("2024-01-05")));
}

// Property 4: a record never conflicts with itself.
#[tokio::test]
async fn update_excludes_the_record_itself_from_the_overlap_set() {
    let (writer, _, store, athlete) = setup();
    let record = seed(&store, athlete, Layout::Planned, "2024-01-05");

    let request = ScheduleRequest::new(
        athlete,
        vec![CalendarSlot {
            date: Some(d("2024-01-05")),
            note: Some("moved indoors".to_string()),
            ..CalendarSlot::default()
        }],
    );
    writer.update_by_layout(&request, &record).await.unwrap();

    let stored = store.record(record.id).unwrap();
    assert!(stored.visible);
    assert_eq!(stored.note.as_deref(), Some("moved indoors"));
}

// Property 5: a dates list collapses to its first element on update.
#[tokio::test]
async fn update_collapses_dates_list_to_first_element() {
    let (writer, _, store, athlete) = setup();
    let record = seed(&store, athlete, Layout::Planned, "2024-01-01");

    let request = ScheduleRequest::new(
        athlete,
        vec![CalendarSlot {
            dates: Some(vec![d("2024-01-05"), d("2024-01-06")]),
            ..CalendarSlot::default()
        }],
    );
    writer.update_by_layout(&request, &record).await.unwrap();

    assert_eq!(store.record(record.id).unwrap().date, Some(d("2024-01-05")));
}

#[tokio::test]
async fn update_applies_only_the_first_calendar_slot() {
    let (writer, _, store, athlete) = setup();
    let record = seed(&store, athlete, Layout::Planned, "2024-01-01");

    let request = ScheduleRequest::new(
        athlete,
        vec![
            CalendarSlot::on(d("2024-02-01")),
            CalendarSlot::on(d("2024-03-01")),
        ],
    );
    writer.update_by_layout(&request, &record).await.unwrap();

    assert_eq!(store.record(record.id).unwrap().date, Some(d("2024-02-01")));
    assert_eq!(store.records().len(), 1, "no extra record from second slot");
}

// Property 6: unknown layout performs no persistence and still commits.
#[tokio::test]
async fn unknown_layout_is_a_silent_no_op() {
    let (writer, _, store, athlete) = setup();

    let request = ScheduleRequest::new(athlete, vec![CalendarSlot::on(d("2024-01-05"))]);
    writer
        .create_by_layout(&request, Layout::Unknown)
        .await
        .unwrap();

    assert!(store.records().is_empty());
    assert_eq!(store.transaction_log(), vec![TxOp::Begin, TxOp::Commit]);
}

#[tokio::test]
async fn update_on_done_merges_outcome_data() {
    let (writer, _, store, athlete) = setup();
    let record = seed(&store, athlete, Layout::Done, "2024-01-05");

    let request = ScheduleRequest::new(
        athlete,
        vec![CalendarSlot {
            date: Some(d("2024-01-05")),
            outcome: Some("10k in 31:40".to_string()),
            ..CalendarSlot::default()
        }],
    );
    writer.update_by_layout(&request, &record).await.unwrap();

    let stored = store.record(record.id).unwrap();
    assert_eq!(stored.outcome.as_deref(), Some("10k in 31:40"));
    assert_eq!(stored.layout, Layout::Done);
}

// Checker failures abort before any store write and propagate unchanged.
#[tokio::test]
async fn checker_rejection_aborts_before_store_writes() {
    let store = InMemoryTestingStore::new();
    let checker = MockConflictChecker::rejecting("competition on 2024-01-05");
    let athlete = AthleteId::new();
    store.activate_athlete(athlete);
    let writer = ScheduledEventWriter::new(checker.clone(), store.clone());

    let request = ScheduleRequest::new(athlete, vec![CalendarSlot::on(d("2024-01-05"))]);
    let err = writer
        .create_by_layout(&request, Layout::Planned)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        HubError::EventConflict("competition on 2024-01-05".to_string())
    );
    assert!(store.records().is_empty());
    assert_eq!(store.transaction_log(), vec![TxOp::Begin, TxOp::Rollback]);
}

// The stored record's layout governs the update, not the request.
#[tokio::test]
async fn update_checks_conflicts_under_the_record_layout() {
    let (writer, checker, store, athlete) = setup();
    let record = seed(&store, athlete, Layout::Done, "2024-01-05");

    let request = ScheduleRequest::new(athlete, vec![CalendarSlot::on(d("2024-01-05"))]);
    writer.update_by_layout(&request, &record).await.unwrap();

    let calls = checker.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].domain, ConflictDomain::Testing);
    assert_eq!(calls[0].layout, Layout::Done);
    assert_eq!(calls[0].dates, vec![d("2024-01-05")]);
}

// Inactive athletes are outside the conflict scope entirely.
#[tokio::test]
async fn records_of_inactive_athletes_do_not_conflict() {
    let (writer, _, store, athlete) = setup();
    let inactive = AthleteId::new();
    seed(&store, inactive, Layout::Planned, "2024-01-05");

    let request = ScheduleRequest::new(athlete, vec![CalendarSlot::on(d("2024-01-05"))]);
    writer
        .create_by_layout(&request, Layout::Planned)
        .await
        .unwrap();

    assert_eq!(store.visible_records().len(), 2);
}
