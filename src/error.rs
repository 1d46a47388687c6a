//! Engine error types.
//!
//! [`EngineError`] is the central error type for the engine. Every variant
//! is a structured kind carrying enough context (ids, dates, codes) for
//! callers to branch on; user-facing presentation is the caller's concern.

use chrono::NaiveDate;

use crate::domain::{BookingId, BookingStatus, GuestId, HotelId, RoomId};

/// Convenience alias used throughout the engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// Structured engine error.
///
/// # Error Kinds
///
/// | Variant              | Raised by                                      |
/// |----------------------|------------------------------------------------|
/// | `InvalidDateRange`   | any date-ranged operation, before any query    |
/// | `RoomNotFound`       | room / room-type lookups                       |
/// | `HotelNotFound`      | hotel directory lookups                        |
/// | `RoomUnavailable`    | `create_booking` overlap conflict              |
/// | `BookingNotFound`    | lifecycle, payment, feedback, offer operations |
/// | `GuestNotFound`      | guest directory lookups                        |
/// | `InvalidTransition`  | illegal booking lifecycle move                 |
/// | `InvalidOfferCode`   | unknown offer code                             |
/// | `InvalidRating`      | rating outside `[1.0, 5.0]` or not a half step |
/// | `StorageFailure`     | non-timeout storage gateway errors             |
/// | `StorageTimeout`     | pool acquire / statement timeouts              |
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Check-out date is not strictly after check-in date.
    #[error("invalid date range: check-in {check_in} must precede check-out {check_out}")]
    InvalidDateRange {
        /// Requested check-in date.
        check_in: NaiveDate,
        /// Requested check-out date.
        check_out: NaiveDate,
    },

    /// Room (or its room type) does not exist.
    #[error("room not found: {0}")]
    RoomNotFound(RoomId),

    /// Hotel does not exist.
    #[error("hotel not found: {0}")]
    HotelNotFound(HotelId),

    /// Room has a conflicting booking for the requested date range.
    #[error("room {room_id} unavailable for [{check_in}, {check_out})")]
    RoomUnavailable {
        /// Room that was requested.
        room_id: RoomId,
        /// Requested check-in date.
        check_in: NaiveDate,
        /// Requested check-out date.
        check_out: NaiveDate,
    },

    /// Booking does not exist.
    #[error("booking not found: {0}")]
    BookingNotFound(BookingId),

    /// Guest does not exist.
    #[error("guest not found: {0}")]
    GuestNotFound(GuestId),

    /// Requested lifecycle move is not allowed from the current status.
    #[error("invalid transition: booking {booking_id} is {from}, cannot become {attempted}")]
    InvalidTransition {
        /// Booking the move was attempted on.
        booking_id: BookingId,
        /// Current booking status.
        from: BookingStatus,
        /// Status the caller attempted to reach.
        attempted: BookingStatus,
    },

    /// Offer code is not present in the registry.
    #[error("invalid offer code: {0}")]
    InvalidOfferCode(String),

    /// Rating is outside `[1.0, 5.0]` or not a half step.
    #[error("invalid rating: {0} (must be between 1.0 and 5.0 in 0.5 steps)")]
    InvalidRating(f64),

    /// Storage gateway failure (wraps the underlying database error).
    #[error("storage failure: {0}")]
    StorageFailure(String),

    /// Storage gateway timed out acquiring a connection or running a statement.
    #[error("storage timeout: {0}")]
    StorageTimeout(String),
}

impl From<sqlx::Error> for EngineError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::PoolTimedOut => Self::StorageTimeout(err.to_string()),
            sqlx::Error::Database(db) if db.code().as_deref() == Some("57014") => {
                // Postgres `query_canceled`, raised by statement_timeout
                Self::StorageTimeout(err.to_string())
            }
            _ => Self::StorageFailure(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for EngineError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Self::StorageFailure(err.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn pool_timeout_classifies_as_storage_timeout() {
        let err = EngineError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, EngineError::StorageTimeout(_)));
    }

    #[test]
    fn row_not_found_classifies_as_storage_failure() {
        // Absence of rows is handled per-operation; a leaked RowNotFound is
        // still a storage failure, never a panic.
        let err = EngineError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, EngineError::StorageFailure(_)));
    }

    #[test]
    fn display_carries_context() {
        let Some(check_in) = NaiveDate::from_ymd_opt(2024, 6, 5) else {
            panic!("valid date");
        };
        let Some(check_out) = NaiveDate::from_ymd_opt(2024, 6, 1) else {
            panic!("valid date");
        };
        let err = EngineError::InvalidDateRange {
            check_in,
            check_out,
        };
        let msg = err.to_string();
        assert!(msg.contains("2024-06-05"));
        assert!(msg.contains("2024-06-01"));
    }
}
