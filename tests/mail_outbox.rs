//! Integration tests for the outbox → queue → worker mail flow.

#![allow(clippy::unwrap_used)]

use athlete_hub::mail::{MailMessage, Outbox, TokioMailQueue, spawn_mail_worker};
use athlete_hub::mocks::{MockMailQueue, MockMailer};
use chrono::NaiveDate;

fn d(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

#[test]
fn outbox_captures_the_request_base_url_into_the_job() {
    let queue = MockMailQueue::new();
    let outbox = Outbox::new(queue.clone());

    outbox
        .testing_scheduled("ada@example.com", "Ada", d("2024-03-10"), "https://hub.example.com")
        .unwrap();

    let jobs = queue.jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].to, "ada@example.com");
    assert_eq!(jobs[0].base_url, "https://hub.example.com");
    assert_eq!(
        jobs[0].message,
        MailMessage::TestingScheduled {
            athlete_name: "Ada".to_string(),
            date: d("2024-03-10"),
        }
    );
}

#[tokio::test]
async fn worker_renders_and_delivers_queued_jobs() {
    let (queue, receiver) = TokioMailQueue::channel();
    let mailer = MockMailer::new();
    let worker = spawn_mail_worker(receiver, mailer.clone());

    let outbox = Outbox::new(queue);
    outbox
        .testing_results(
            "ada@example.com",
            "Ada",
            d("2024-03-10"),
            "VO2max 61",
            "https://hub.example.com",
        )
        .unwrap();
    drop(outbox); // close the queue so the worker drains and exits

    worker.await.unwrap();

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Your testing results from 2024-03-10");
    assert!(sent[0].html.contains("https://hub.example.com/results"));
    assert!(sent[0].html.contains("VO2max 61"));
}

#[tokio::test]
async fn delivery_failure_does_not_stop_the_worker() {
    let (queue, receiver) = TokioMailQueue::channel();
    let mailer = MockMailer::new();
    mailer.fail_next(1);
    let worker = spawn_mail_worker(receiver, mailer.clone());

    let outbox = Outbox::new(queue);
    outbox
        .testing_scheduled("first@example.com", "First", d("2024-03-10"), "https://hub.example.com")
        .unwrap();
    outbox
        .schedule_replaced(
            "second@example.com",
            "Second",
            vec![d("2024-03-11")],
            "https://hub.example.com",
        )
        .unwrap();
    drop(outbox);

    worker.await.unwrap();

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1, "first job failed, second still delivered");
    assert_eq!(sent[0].to, "second@example.com");
}

#[tokio::test]
async fn enqueue_after_worker_shutdown_is_a_queue_error() {
    let (queue, receiver) = TokioMailQueue::channel();
    drop(receiver);

    let outbox = Outbox::new(queue);
    let err = outbox
        .testing_scheduled("ada@example.com", "Ada", d("2024-03-10"), "https://hub.example.com")
        .unwrap_err();

    assert!(matches!(err, athlete_hub::HubError::QueueError(_)));
}
