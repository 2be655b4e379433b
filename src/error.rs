//! Error types for scheduling, mail, and API endpoint operations.

use thiserror::Error;

/// Result type alias for Athlete Hub operations.
pub type Result<T> = std::result::Result<T, HubError>;

/// Error taxonomy for the platform glue layers.
///
/// Collaborator failures (conflict checker, record store, mail transport)
/// are carried through unchanged; the scheduling writer itself only ever
/// raises [`HubError::SlotConflict`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HubError {
    // ═══════════════════════════════════════════════════════════
    // Scheduling Errors
    // ═══════════════════════════════════════════════════════════

    /// Another visible testing record already occupies the requested
    /// date(s) and the caller did not ask for replacement.
    #[error("On this date(s) testing already exist")]
    SlotConflict,

    /// The event service rejected the requested calendar slots for the
    /// conflict domain (e.g. a camp or competition occupies them).
    #[error("Event conflict: {0}")]
    EventConflict(String),

    // ═══════════════════════════════════════════════════════════
    // Store Errors
    // ═══════════════════════════════════════════════════════════

    /// Database operation failed.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Transaction begin/commit/rollback failed.
    #[error("Transaction error: {0}")]
    TransactionError(String),

    // ═══════════════════════════════════════════════════════════
    // Endpoint Errors
    // ═══════════════════════════════════════════════════════════

    /// An API request failed or returned an unusable response.
    #[error("API {method} request to '{endpoint}' failed: {message}")]
    ApiError {
        /// HTTP method of the failed request.
        method: String,
        /// Endpoint path the request targeted.
        endpoint: String,
        /// Underlying failure description.
        message: String,
    },

    // ═══════════════════════════════════════════════════════════
    // Mail Errors
    // ═══════════════════════════════════════════════════════════

    /// Email composition or delivery failed.
    #[error("Email error: {0}")]
    EmailError(String),

    /// A mail job could not be enqueued for asynchronous delivery.
    #[error("Mail queue unavailable: {0}")]
    QueueError(String),
}

impl HubError {
    /// Returns `true` if this error should surface to the end user as a
    /// scheduling conflict rather than a server fault.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::SlotConflict | Self::EventConflict(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_conflict_message_is_user_facing() {
        assert_eq!(
            HubError::SlotConflict.to_string(),
            "On this date(s) testing already exist"
        );
    }

    #[test]
    fn conflict_classification() {
        assert!(HubError::SlotConflict.is_conflict());
        assert!(HubError::EventConflict("camp on 2024-01-05".into()).is_conflict());
        assert!(!HubError::DatabaseError("boom".into()).is_conflict());
    }
}
