//! Read-only operational analytics.
//!
//! Every aggregation here is side-effect-free and tolerant of empty
//! data: missing rows produce zeroed or defaulted structures, never an
//! error. Reads may run concurrently with writes and reflect whatever
//! snapshot the storage gateway serves.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::domain::{BookingId, RoomStatus, round_money};
use crate::error::{EngineError, EngineResult};

/// Per-room-type occupancy breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccupancyRow {
    /// Room category name.
    pub type_name: String,
    /// Rooms of this type.
    pub total_rooms: i64,
    /// Currently occupied.
    pub occupied: i64,
    /// Currently available.
    pub available: i64,
    /// Currently in maintenance.
    pub in_maintenance: i64,
    /// `occupied / total * 100`, 0 when the type has no rooms.
    pub occupancy_rate: f64,
}

/// Completed-payment revenue summary, optionally date-bounded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueReport {
    /// Number of completed payments.
    pub total_transactions: i64,
    /// Sum of completed payments.
    pub total_revenue: f64,
    /// Mean completed payment, 0 when there are none.
    pub average_transaction: f64,
}

/// Key performance indicators over the current state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsDashboard {
    /// Completed-payment revenue in the current calendar month.
    pub monthly_revenue: f64,
    /// Completed payments in the current calendar month.
    pub monthly_transactions: i64,
    /// Mean completed payment this month.
    pub avg_transaction: f64,
    /// Hotel-wide `occupied / total * 100`.
    pub occupancy_rate: f64,
    /// Total rooms across all hotels.
    pub total_rooms: i64,
    /// Rooms currently occupied.
    pub occupied_rooms: i64,
    /// Room type with the highest completed-payment revenue, `"N/A"`
    /// when no payments exist.
    pub top_room_type: String,
    /// Revenue of the top room type.
    pub top_room_revenue: f64,
    /// `returning_guests / total_guests * 100` among guests with at
    /// least one checked-out booking.
    pub retention_rate: f64,
    /// Guests with two or more checked-out bookings.
    pub returning_guests: i64,
    /// Guests with at least one checked-out booking.
    pub total_guests: i64,
}

/// Cleaning urgency, ordered most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CleaningPriority {
    /// Room is in maintenance or has not been cleaned for over 3 days.
    High,
    /// Not cleaned for over a day.
    Medium,
    /// Recently cleaned, or never cleaned at all (no staleness signal
    /// exists for such rooms, so neither threshold fires).
    Low,
}

impl CleaningPriority {
    /// Derives the priority from room status and days since the last
    /// clean (`None` = never cleaned).
    #[must_use]
    pub fn assess(status: RoomStatus, days_since_cleaned: Option<i64>) -> Self {
        match (status, days_since_cleaned) {
            (RoomStatus::Maintenance, _) => Self::High,
            (_, Some(days)) if days > 3 => Self::High,
            (_, Some(days)) if days > 1 => Self::Medium,
            _ => Self::Low,
        }
    }
}

/// A room on the housekeeping schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HousekeepingRoom {
    /// Door number shown to guests.
    pub room_number: String,
    /// Room category name.
    pub type_name: String,
    /// Floor the room is on.
    pub floor: i32,
    /// Current lifecycle status.
    pub status: RoomStatus,
    /// Days since the last clean, `None` when never cleaned.
    pub days_since_cleaned: Option<i64>,
    /// Derived cleaning urgency.
    pub priority: CleaningPriority,
}

/// A guest due to check out today, with their outstanding balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutReminder {
    /// Booking due out today.
    pub booking_id: BookingId,
    /// Guest full name.
    pub guest_name: String,
    /// Guest phone number.
    pub phone: String,
    /// Guest email.
    pub email: String,
    /// Room door number.
    pub room_number: String,
    /// Booking total.
    pub total_amount: f64,
    /// Sum of completed payments.
    pub paid_amount: f64,
    /// `total_amount - paid_amount`.
    pub pending_amount: f64,
}

/// Aggregate guest-rating summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingSummary {
    /// Mean rating across all feedback, 0 when there is none.
    pub average_rating: f64,
    /// Number of feedback entries.
    pub total_reviews: i64,
}

/// Percentage of `part` in `total`, 0 when `total` is 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percentage(part: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    round_money(part as f64 / total as f64 * 100.0)
}

/// Read-only analytics over the current state.
#[derive(Debug, Clone)]
pub struct AnalyticsService {
    pool: PgPool,
}

impl AnalyticsService {
    /// Creates a new analytics service over the given pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Per-room-type occupancy breakdown.
    ///
    /// # Errors
    ///
    /// Storage errors only; an empty inventory yields an empty list.
    pub async fn occupancy_by_room_type(&self) -> EngineResult<Vec<OccupancyRow>> {
        let rows = sqlx::query_as::<_, (String, i64, i64, i64, i64)>(
            r#"
            SELECT rt.type_name,
                   COUNT(r.room_id),
                   COUNT(r.room_id) FILTER (WHERE r.status = 'occupied'),
                   COUNT(r.room_id) FILTER (WHERE r.status = 'available'),
                   COUNT(r.room_id) FILTER (WHERE r.status = 'maintenance')
            FROM rooms r
            JOIN room_types rt ON r.type_id = rt.type_id
            GROUP BY rt.type_name
            ORDER BY rt.type_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(type_name, total_rooms, occupied, available, in_maintenance)| OccupancyRow {
                    type_name,
                    total_rooms,
                    occupied,
                    available,
                    in_maintenance,
                    occupancy_rate: percentage(occupied, total_rooms),
                },
            )
            .collect())
    }

    /// Completed-payment revenue summary, optionally bounded to payment
    /// dates within `[start, end]`.
    ///
    /// # Errors
    ///
    /// Storage errors only; no payments yields a zeroed report.
    pub async fn revenue_report(
        &self,
        window: Option<(NaiveDate, NaiveDate)>,
    ) -> EngineResult<RevenueReport> {
        let row = if let Some((start, end)) = window {
            sqlx::query_as::<_, (i64, f64, f64)>(
                r#"
                SELECT COUNT(*), COALESCE(SUM(amount), 0), COALESCE(AVG(amount), 0)
                FROM payments
                WHERE payment_status = 'completed'
                  AND payment_date::date BETWEEN $1 AND $2
                "#,
            )
            .bind(start)
            .bind(end)
            .fetch_one(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, (i64, f64, f64)>(
                r#"
                SELECT COUNT(*), COALESCE(SUM(amount), 0), COALESCE(AVG(amount), 0)
                FROM payments
                WHERE payment_status = 'completed'
                "#,
            )
            .fetch_one(&self.pool)
            .await?
        };

        Ok(RevenueReport {
            total_transactions: row.0,
            total_revenue: round_money(row.1),
            average_transaction: round_money(row.2),
        })
    }

    /// Current KPIs: monthly revenue, hotel-wide occupancy, top room
    /// type by revenue, and guest retention.
    ///
    /// # Errors
    ///
    /// Storage errors only; empty data yields zeroed metrics and an
    /// `"N/A"` top room type.
    pub async fn dashboard(&self) -> EngineResult<AnalyticsDashboard> {
        let (monthly_transactions, monthly_revenue, avg_transaction) =
            sqlx::query_as::<_, (i64, f64, f64)>(
                r#"
                SELECT COUNT(*), COALESCE(SUM(amount), 0), COALESCE(AVG(amount), 0)
                FROM payments
                WHERE payment_status = 'completed'
                  AND date_trunc('month', payment_date) = date_trunc('month', now())
                "#,
            )
            .fetch_one(&self.pool)
            .await?;

        let (total_rooms, occupied_rooms) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT COUNT(*), COUNT(*) FILTER (WHERE status = 'occupied')
            FROM rooms
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let top_room = sqlx::query_as::<_, (String, f64)>(
            r#"
            SELECT rt.type_name, SUM(p.amount) AS revenue
            FROM payments p
            JOIN bookings b ON p.booking_id = b.booking_id
            JOIN rooms r ON b.room_id = r.room_id
            JOIN room_types rt ON r.type_id = rt.type_id
            WHERE p.payment_status = 'completed'
            GROUP BY rt.type_name
            ORDER BY revenue DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        let (total_guests, returning_guests) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT COUNT(*), COUNT(*) FILTER (WHERE booking_count > 1)
            FROM (
                SELECT guest_id, COUNT(*) AS booking_count
                FROM bookings
                WHERE status = 'checked-out'
                GROUP BY guest_id
            ) AS guest_stats
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let (top_room_type, top_room_revenue) = match top_room {
            Some((type_name, revenue)) => (type_name, round_money(revenue)),
            None => ("N/A".to_string(), 0.0),
        };

        Ok(AnalyticsDashboard {
            monthly_revenue: round_money(monthly_revenue),
            monthly_transactions,
            avg_transaction: round_money(avg_transaction),
            occupancy_rate: percentage(occupied_rooms, total_rooms),
            total_rooms,
            occupied_rooms,
            top_room_type,
            top_room_revenue,
            retention_rate: percentage(returning_guests, total_guests),
            returning_guests,
            total_guests,
        })
    }

    /// Prioritized housekeeping schedule over available and maintenance
    /// rooms, most urgent first, then by floor and room number.
    ///
    /// # Errors
    ///
    /// Storage errors only.
    pub async fn cleaning_schedule(&self) -> EngineResult<Vec<HousekeepingRoom>> {
        let rows = sqlx::query_as::<
            _,
            (
                String,
                String,
                i32,
                String,
                Option<chrono::DateTime<Utc>>,
            ),
        >(
            r#"
            SELECT r.room_number, rt.type_name, r.floor, r.status, r.last_cleaned
            FROM rooms r
            JOIN room_types rt ON r.type_id = rt.type_id
            WHERE r.status IN ('available', 'maintenance')
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let now = Utc::now();
        let mut schedule = Vec::with_capacity(rows.len());
        for (room_number, type_name, floor, status, last_cleaned) in rows {
            let status = RoomStatus::try_from(status).map_err(EngineError::StorageFailure)?;
            let days_since_cleaned = last_cleaned.map(|ts| (now - ts).num_days());
            schedule.push(HousekeepingRoom {
                priority: CleaningPriority::assess(status, days_since_cleaned),
                room_number,
                type_name,
                floor,
                status,
                days_since_cleaned,
            });
        }

        schedule.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then(a.floor.cmp(&b.floor))
                .then(a.room_number.cmp(&b.room_number))
        });
        Ok(schedule)
    }

    /// Bookings still checked in whose check-out date is today, with
    /// the outstanding balance per booking.
    ///
    /// # Errors
    ///
    /// Storage errors only.
    pub async fn checkout_reminders(&self) -> EngineResult<Vec<CheckoutReminder>> {
        let rows = sqlx::query_as::<_, (BookingId, String, String, String, String, f64, f64)>(
            r#"
            SELECT b.booking_id,
                   g.first_name || ' ' || g.last_name AS guest_name,
                   g.phone, g.email, r.room_number, b.total_amount,
                   COALESCE(SUM(p.amount), 0) AS paid_amount
            FROM bookings b
            JOIN guests g ON b.guest_id = g.guest_id
            JOIN rooms r ON b.room_id = r.room_id
            LEFT JOIN payments p
                ON b.booking_id = p.booking_id AND p.payment_status = 'completed'
            WHERE b.check_out_date = CURRENT_DATE
              AND b.status = 'checked-in'
            GROUP BY b.booking_id, g.first_name, g.last_name, g.phone, g.email,
                     r.room_number, b.total_amount
            ORDER BY r.room_number
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(booking_id, guest_name, phone, email, room_number, total_amount, paid_amount)| {
                    CheckoutReminder {
                        booking_id,
                        guest_name,
                        phone,
                        email,
                        room_number,
                        total_amount,
                        paid_amount,
                        pending_amount: round_money(total_amount - paid_amount),
                    }
                },
            )
            .collect())
    }

    /// Mean guest rating across all feedback.
    ///
    /// # Errors
    ///
    /// Storage errors only; no feedback yields a zeroed summary.
    pub async fn average_rating(&self) -> EngineResult<RatingSummary> {
        let (average_rating, total_reviews) = sqlx::query_as::<_, (f64, i64)>(
            "SELECT COALESCE(AVG(rating), 0), COUNT(*) FROM feedback",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(RatingSummary {
            average_rating: round_money(average_rating),
            total_reviews,
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn percentage_never_divides_by_zero() {
        assert!((percentage(3, 0) - 0.0).abs() < f64::EPSILON);
        assert!((percentage(0, 0) - 0.0).abs() < f64::EPSILON);
        assert!((percentage(1, 4) - 25.0).abs() < f64::EPSILON);
        assert!((percentage(2, 3) - 66.67).abs() < f64::EPSILON);
    }

    #[test]
    fn maintenance_rooms_are_always_high_priority() {
        assert_eq!(
            CleaningPriority::assess(RoomStatus::Maintenance, Some(0)),
            CleaningPriority::High
        );
        assert_eq!(
            CleaningPriority::assess(RoomStatus::Maintenance, None),
            CleaningPriority::High
        );
    }

    #[test]
    fn staleness_thresholds() {
        assert_eq!(
            CleaningPriority::assess(RoomStatus::Available, Some(4)),
            CleaningPriority::High
        );
        assert_eq!(
            CleaningPriority::assess(RoomStatus::Available, Some(2)),
            CleaningPriority::Medium
        );
        assert_eq!(
            CleaningPriority::assess(RoomStatus::Available, Some(1)),
            CleaningPriority::Low
        );
        assert_eq!(
            CleaningPriority::assess(RoomStatus::Available, Some(0)),
            CleaningPriority::Low
        );
    }

    #[test]
    fn never_cleaned_room_has_no_staleness_signal() {
        // Without a last-cleaned timestamp neither day threshold can
        // fire, so a non-maintenance room ranks Low.
        assert_eq!(
            CleaningPriority::assess(RoomStatus::Available, None),
            CleaningPriority::Low
        );
        // Maintenance still dominates.
        assert_eq!(
            CleaningPriority::assess(RoomStatus::Maintenance, None),
            CleaningPriority::High
        );
    }

    #[test]
    fn priority_ordering_sorts_high_first() {
        let mut priorities = vec![
            CleaningPriority::Low,
            CleaningPriority::High,
            CleaningPriority::Medium,
        ];
        priorities.sort();
        assert_eq!(
            priorities,
            vec![
                CleaningPriority::High,
                CleaningPriority::Medium,
                CleaningPriority::Low,
            ]
        );
    }
}
