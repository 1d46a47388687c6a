//! Dynamic pricing engine.
//!
//! A quote is a pure function of the room-type base price, the hotel-wide
//! demand proxy (count of active bookings sharing the check-in date), and
//! the weekday of check-in. The demand count is a live read, so quotes
//! may differ between calls as bookings change; given identical inputs
//! the result is deterministic.

use chrono::{Datelike, NaiveDate, Weekday};
use sqlx::PgPool;

use crate::domain::{RoomId, round_money};
use crate::error::EngineResult;

/// Occupancy-pressure multiplier derived from the demand proxy.
///
/// More than 8 same-date active bookings pushes prices up 25%, more
/// than 5 up 15%; quiet dates are discounted 10%.
#[must_use]
pub fn occupancy_multiplier(same_date_bookings: i64) -> f64 {
    if same_date_bookings > 8 {
        1.25
    } else if same_date_bookings > 5 {
        1.15
    } else {
        0.90
    }
}

/// Whether the check-in date attracts the weekend surcharge (Friday or
/// Saturday arrivals).
#[must_use]
pub fn is_weekend_check_in(check_in: NaiveDate) -> bool {
    matches!(check_in.weekday(), Weekday::Fri | Weekday::Sat)
}

/// Computes a nightly quote from base price, demand, and date.
#[must_use]
pub fn quote(base_price: f64, same_date_bookings: i64, check_in: NaiveDate) -> f64 {
    let mut price = base_price * occupancy_multiplier(same_date_bookings);
    if is_weekend_check_in(check_in) {
        price *= 1.20;
    }
    round_money(price)
}

/// Dynamic pricing over live booking demand.
#[derive(Debug, Clone)]
pub struct PricingService {
    pool: PgPool,
}

impl PricingService {
    /// Creates a new pricing service over the given pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Quotes the dynamic nightly rate for a room on a check-in date.
    ///
    /// The demand proxy is hotel-wide: the count of confirmed or
    /// checked-in bookings (on any room) whose check-in equals the
    /// requested date. An unknown room yields a `0.0` quote rather than
    /// an error so booking flows stay non-blocking; the miss is logged.
    ///
    /// # Errors
    ///
    /// Storage errors only.
    pub async fn dynamic_price(&self, room_id: RoomId, check_in: NaiveDate) -> EngineResult<f64> {
        let base_price = sqlx::query_scalar::<_, f64>(
            r#"
            SELECT rt.base_price
            FROM rooms r
            JOIN room_types rt ON r.type_id = rt.type_id
            WHERE r.room_id = $1
            "#,
        )
        .bind(room_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(base_price) = base_price else {
            tracing::warn!(%room_id, "dynamic price requested for unknown room");
            return Ok(0.0);
        };

        let same_date_bookings = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM bookings
            WHERE check_in_date = $1
              AND status IN ('confirmed', 'checked-in')
            "#,
        )
        .bind(check_in)
        .fetch_one(&self.pool)
        .await?;

        Ok(quote(base_price, same_date_bookings, check_in))
    }
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
    fn multiplier_bands_have_exact_boundaries() {
        assert!((occupancy_multiplier(0) - 0.90).abs() < f64::EPSILON);
        assert!((occupancy_multiplier(5) - 0.90).abs() < f64::EPSILON);
        assert!((occupancy_multiplier(6) - 1.15).abs() < f64::EPSILON);
        assert!((occupancy_multiplier(8) - 1.15).abs() < f64::EPSILON);
        assert!((occupancy_multiplier(9) - 1.25).abs() < f64::EPSILON);
    }

    #[test]
    fn surcharge_applies_to_friday_and_saturday_only() {
        // 2024-06-03 is a Monday.
        let monday = date(2024, 6, 3);
        for offset in 0..7 {
            let day = monday + chrono::Days::new(offset);
            let expected = matches!(day.weekday(), Weekday::Fri | Weekday::Sat);
            assert_eq!(is_weekend_check_in(day), expected, "{day}");
        }
    }

    #[test]
    fn saturday_peak_scenario() {
        // Base 2000, 9 same-date bookings, Saturday check-in:
        // 2000 * 1.25 * 1.20 = 3000.00
        let saturday = date(2024, 6, 8);
        assert!((quote(2000.0, 9, saturday) - 3000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn quiet_weekday_is_discounted() {
        let tuesday = date(2024, 6, 4);
        assert!((quote(1000.0, 2, tuesday) - 900.0).abs() < f64::EPSILON);
    }

    #[test]
    fn quote_is_deterministic_for_identical_inputs() {
        let friday = date(2024, 6, 7);
        assert!((quote(1234.56, 7, friday) - quote(1234.56, 7, friday)).abs() < f64::EPSILON);
    }

    #[test]
    fn quote_rounds_to_two_decimals() {
        let tuesday = date(2024, 6, 4);
        // 333.33 * 0.90 = 299.997 -> 300.00
        assert!((quote(333.33, 0, tuesday) - 300.0).abs() < f64::EPSILON);
    }
}
