//! Persistent store implementations.

pub mod postgres;

pub use postgres::PostgresTestingStore;
