//! Mock provider implementations for testing.
//!
//! In-memory, deterministic implementations of the provider traits, with
//! failure injection for exercising rollback paths.

pub mod conflict;
pub mod mail;
pub mod store;

pub use conflict::{ConflictCall, MockConflictChecker};
pub use mail::{MockMailQueue, MockMailer, SentEmail};
pub use store::{FailPoint, InMemoryTestingStore, TxOp};
