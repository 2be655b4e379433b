//! Provider contracts for external collaborators.
//!
//! Providers are **interfaces**, not implementations. The scheduling
//! writer and the mail outbox depend on these traits and receive concrete
//! implementations by construction — never from ambient global state.
//!
//! This enables:
//! - **Testing**: in-memory mocks with failure injection (see [`crate::mocks`])
//! - **Production**: PostgreSQL store, event-service HTTP client, SMTP mailer
//! - **Development**: console mailer, logging wrappers

pub mod conflict;
pub mod mail;
pub mod store;

pub use conflict::{ConflictChecker, ConflictDomain};
pub use mail::{MailQueue, Mailer};
pub use store::{TestingStore, TransactionManager};
