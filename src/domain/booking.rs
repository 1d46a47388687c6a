//! Booking entity, lifecycle state machine, and stay date-range rules.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{BookingId, GuestId, RoomId};
use crate::error::{EngineError, EngineResult};

/// Lifecycle status of a booking.
///
/// Legal moves: `Confirmed → CheckedIn → CheckedOut` and
/// `Confirmed | CheckedIn → Cancelled`. `CheckedOut` and `Cancelled`
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
    /// Created and holding its date range.
    Confirmed,
    /// Guest is in the room.
    CheckedIn,
    /// Stay completed (terminal).
    CheckedOut,
    /// Booking voided (terminal).
    Cancelled,
}

impl BookingStatus {
    /// Returns the storage representation of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::CheckedIn => "checked-in",
            Self::CheckedOut => "checked-out",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether this status still blocks the room's date range.
    ///
    /// Only active bookings participate in the overlap predicate and in
    /// the dynamic-pricing demand count.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Confirmed | Self::CheckedIn)
    }

    /// Whether the lifecycle may move from `self` to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Confirmed, Self::CheckedIn)
                | (Self::CheckedIn, Self::CheckedOut)
                | (Self::Confirmed | Self::CheckedIn, Self::Cancelled)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for BookingStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "confirmed" => Ok(Self::Confirmed),
            "checked-in" => Ok(Self::CheckedIn),
            "checked-out" => Ok(Self::CheckedOut),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown booking status: {other}")),
        }
    }
}

/// A booking row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Booking {
    /// Database identifier.
    pub booking_id: BookingId,
    /// Guest who holds the booking.
    pub guest_id: GuestId,
    /// Booked room.
    pub room_id: RoomId,
    /// First night of the stay.
    pub check_in_date: NaiveDate,
    /// Day of departure; the room is free to re-let from this date.
    pub check_out_date: NaiveDate,
    /// Adults staying.
    pub num_adults: i32,
    /// Children staying.
    pub num_children: i32,
    /// Total price for the stay; rewritten when offers are applied.
    pub total_amount: f64,
    /// Lifecycle status.
    #[sqlx(try_from = "String")]
    pub status: BookingStatus,
    /// Free-text requests; offer applications append audit notes here.
    pub special_requests: Option<String>,
    /// Timestamp of the actual check-in, once it happened.
    pub actual_check_in: Option<DateTime<Utc>>,
    /// Timestamp of the actual check-out, once it happened.
    pub actual_check_out: Option<DateTime<Utc>>,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Validates a requested stay range and returns the number of nights.
///
/// Stay ranges are half-open `[check_in, check_out)`: a booking checking
/// out on day `D` does not conflict with one checking in on day `D`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidDateRange`] when `check_out` is not
/// strictly after `check_in`. This fires before any storage access.
pub fn validate_stay(check_in: NaiveDate, check_out: NaiveDate) -> EngineResult<i64> {
    let nights = (check_out - check_in).num_days();
    if nights <= 0 {
        return Err(EngineError::InvalidDateRange {
            check_in,
            check_out,
        });
    }
    Ok(nights)
}

/// Half-open interval overlap predicate over two stay ranges.
///
/// Mirrors the SQL `check_in_date < $check_out AND check_out_date >
/// $check_in` conflict test used by the availability queries.
#[must_use]
pub fn stays_overlap(
    a_check_in: NaiveDate,
    a_check_out: NaiveDate,
    b_check_in: NaiveDate,
    b_check_out: NaiveDate,
) -> bool {
    a_check_in < b_check_out && a_check_out > b_check_in
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        let Some(date) = NaiveDate::from_ymd_opt(y, m, d) else {
            panic!("valid date");
        };
        date
    }

    #[test]
    fn transition_table_allows_only_legal_moves() {
        use BookingStatus::*;
        let all = [Confirmed, CheckedIn, CheckedOut, Cancelled];
        for from in all {
            for to in all {
                let legal = matches!(
                    (from, to),
                    (Confirmed, CheckedIn)
                        | (CheckedIn, CheckedOut)
                        | (Confirmed, Cancelled)
                        | (CheckedIn, Cancelled)
                );
                assert_eq!(from.can_transition_to(to), legal, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn terminal_states_reject_everything() {
        use BookingStatus::*;
        for from in [CheckedOut, Cancelled] {
            for to in [Confirmed, CheckedIn, CheckedOut, Cancelled] {
                assert!(!from.can_transition_to(to));
            }
        }
    }

    #[test]
    fn only_confirmed_and_checked_in_are_active() {
        assert!(BookingStatus::Confirmed.is_active());
        assert!(BookingStatus::CheckedIn.is_active());
        assert!(!BookingStatus::CheckedOut.is_active());
        assert!(!BookingStatus::Cancelled.is_active());
    }

    #[test]
    fn status_round_trips_storage_form() {
        use BookingStatus::*;
        for status in [Confirmed, CheckedIn, CheckedOut, Cancelled] {
            let parsed = BookingStatus::try_from(status.as_str().to_string());
            assert_eq!(parsed, Ok(status));
        }
    }

    #[test]
    fn validate_stay_counts_nights() {
        let nights = validate_stay(date(2024, 6, 1), date(2024, 6, 5));
        assert!(matches!(nights, Ok(4)));
    }

    #[test]
    fn validate_stay_rejects_inverted_and_zero_length() {
        assert!(validate_stay(date(2024, 6, 5), date(2024, 6, 1)).is_err());
        assert!(validate_stay(date(2024, 6, 5), date(2024, 6, 5)).is_err());
    }

    #[test]
    fn overlap_is_half_open() {
        // Existing stay [2024-06-01, 2024-06-05)
        let (s, e) = (date(2024, 6, 1), date(2024, 6, 5));

        // Checkout day equals new check-in day: no conflict.
        assert!(!stays_overlap(date(2024, 6, 5), date(2024, 6, 10), s, e));
        // Fully before: no conflict.
        assert!(!stays_overlap(date(2024, 5, 20), date(2024, 6, 1), s, e));
        // Any interior contact conflicts.
        assert!(stays_overlap(date(2024, 6, 4), date(2024, 6, 6), s, e));
        assert!(stays_overlap(date(2024, 5, 30), date(2024, 6, 2), s, e));
        assert!(stays_overlap(date(2024, 6, 2), date(2024, 6, 3), s, e));
        assert!(stays_overlap(date(2024, 5, 1), date(2024, 7, 1), s, e));
    }
}
