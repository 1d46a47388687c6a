//! Booking lifecycle manager: creation, lifecycle transitions, payments,
//! and feedback.
//!
//! Every mutating operation runs as one transaction: the booking write
//! and the room-status write commit together or not at all. Dropping an
//! uncommitted `sqlx` transaction rolls it back, so every early-return
//! error path leaves the prior state untouched.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::{
    Booking, BookingId, BookingStatus, Feedback, FeedbackId, GuestId, Payment, PaymentId,
    PaymentMethod, PaymentStatus, Rating, RoomId, RoomStatus, round_money, validate_stay,
};
use crate::error::{EngineError, EngineResult};

/// Input record for creating a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBooking {
    /// Guest holding the booking.
    pub guest_id: GuestId,
    /// Room to book.
    pub room_id: RoomId,
    /// First night of the stay.
    pub check_in_date: NaiveDate,
    /// Day of departure (exclusive).
    pub check_out_date: NaiveDate,
    /// Adults staying.
    pub num_adults: i32,
    /// Children staying.
    pub num_children: i32,
    /// Free-text requests.
    #[serde(default)]
    pub special_requests: Option<String>,
}

/// A booking joined with its guest and room for display.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BookingDetails {
    /// The booking row.
    #[sqlx(flatten)]
    pub booking: Booking,
    /// Guest given name.
    pub first_name: String,
    /// Guest family name.
    pub last_name: String,
    /// Guest phone number.
    pub phone: String,
    /// Guest email.
    pub email: String,
    /// Room door number.
    pub room_number: String,
    /// Room category name.
    pub type_name: String,
}

/// Full financial and feedback statement for one booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingStatement {
    /// Booking with guest and room context.
    pub details: BookingDetails,
    /// All payments, oldest first.
    pub payments: Vec<Payment>,
    /// Sum of completed payments.
    pub total_paid: f64,
    /// `total_amount - total_paid`.
    pub balance: f64,
    /// All feedback entries, newest first.
    pub feedback: Vec<Feedback>,
    /// Mean feedback rating, 0.0 when there is none.
    pub average_rating: f64,
    /// Number of feedback entries.
    pub feedback_count: i64,
}

/// Booking lifecycle manager.
///
/// Owns the `confirmed → checked-in → checked-out` state machine (with
/// `cancelled` reachable from the two non-terminal states) and keeps the
/// room-status cache in step with it.
#[derive(Debug, Clone)]
pub struct BookingService {
    pool: PgPool,
}

impl BookingService {
    /// Creates a new booking service over the given pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a booking in `confirmed` status and marks the room
    /// `reserved`.
    ///
    /// The room row is locked for the duration of the transaction, so
    /// two concurrent calls for the same room serialize and the second
    /// observes the first's booking in the overlap re-check. The total
    /// is `base_price * nights`.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidDateRange`] before any storage access;
    /// [`EngineError::RoomNotFound`] / [`EngineError::GuestNotFound`]
    /// on dangling references; [`EngineError::RoomUnavailable`] when the
    /// requested range overlaps an active booking on the room.
    pub async fn create_booking(&self, request: &NewBooking) -> EngineResult<BookingId> {
        let nights = validate_stay(request.check_in_date, request.check_out_date)?;

        let mut tx = self.pool.begin().await?;

        // Lock the room row first: concurrent creates for the same room
        // queue here, making the overlap re-check below race-free.
        let base_price = sqlx::query_scalar::<_, f64>(
            r#"
            SELECT rt.base_price
            FROM rooms r
            JOIN room_types rt ON r.type_id = rt.type_id
            WHERE r.room_id = $1
            FOR UPDATE OF r
            "#,
        )
        .bind(request.room_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(EngineError::RoomNotFound(request.room_id))?;

        let guest_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM guests WHERE guest_id = $1)",
        )
        .bind(request.guest_id)
        .fetch_one(&mut *tx)
        .await?;
        if !guest_exists {
            return Err(EngineError::GuestNotFound(request.guest_id));
        }

        let conflict = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM bookings
                WHERE room_id = $1
                  AND status IN ('confirmed', 'checked-in')
                  AND check_in_date < $2
                  AND check_out_date > $3
            )
            "#,
        )
        .bind(request.room_id)
        .bind(request.check_out_date)
        .bind(request.check_in_date)
        .fetch_one(&mut *tx)
        .await?;
        if conflict {
            return Err(EngineError::RoomUnavailable {
                room_id: request.room_id,
                check_in: request.check_in_date,
                check_out: request.check_out_date,
            });
        }

        #[allow(clippy::cast_precision_loss)]
        let total_amount = round_money(base_price * nights as f64);

        let booking_id = sqlx::query_scalar::<_, BookingId>(
            r#"
            INSERT INTO bookings (guest_id, room_id, check_in_date, check_out_date,
                                  num_adults, num_children, total_amount, status,
                                  special_requests)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'confirmed', $8)
            RETURNING booking_id
            "#,
        )
        .bind(request.guest_id)
        .bind(request.room_id)
        .bind(request.check_in_date)
        .bind(request.check_out_date)
        .bind(request.num_adults)
        .bind(request.num_children)
        .bind(total_amount)
        .bind(&request.special_requests)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE rooms SET status = 'reserved' WHERE room_id = $1")
            .bind(request.room_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            %booking_id,
            room_id = %request.room_id,
            guest_id = %request.guest_id,
            total_amount,
            "booking created"
        );
        Ok(booking_id)
    }

    /// Checks a guest in: booking → `checked-in`, room → `occupied`,
    /// actual check-in timestamp recorded.
    ///
    /// # Errors
    ///
    /// [`EngineError::BookingNotFound`] when missing;
    /// [`EngineError::InvalidTransition`] unless the booking is
    /// `confirmed`.
    pub async fn check_in(&self, booking_id: BookingId) -> EngineResult<()> {
        self.transition(booking_id, BookingStatus::CheckedIn, RoomStatus::Occupied)
            .await
    }

    /// Checks a guest out: booking → `checked-out`, room →
    /// `maintenance`, actual check-out timestamp recorded.
    ///
    /// The room goes to `maintenance`, not `available`: housekeeping has
    /// to clear it before it can be re-let.
    ///
    /// # Errors
    ///
    /// [`EngineError::BookingNotFound`] when missing;
    /// [`EngineError::InvalidTransition`] unless the booking is
    /// `checked-in`.
    pub async fn check_out(&self, booking_id: BookingId) -> EngineResult<()> {
        self.transition(booking_id, BookingStatus::CheckedOut, RoomStatus::Maintenance)
            .await
    }

    /// Cancels a booking: booking → `cancelled`, room → `available`.
    ///
    /// # Errors
    ///
    /// [`EngineError::BookingNotFound`] when missing;
    /// [`EngineError::InvalidTransition`] from `checked-out` or
    /// `cancelled` (terminal states), with no state change.
    pub async fn cancel(&self, booking_id: BookingId) -> EngineResult<()> {
        self.transition(booking_id, BookingStatus::Cancelled, RoomStatus::Available)
            .await
    }

    /// Shared lifecycle move: validates the transition under a row lock,
    /// then writes the booking and room rows in one transaction.
    async fn transition(
        &self,
        booking_id: BookingId,
        next: BookingStatus,
        room_status: RoomStatus,
    ) -> EngineResult<()> {
        let mut tx = self.pool.begin().await?;

        let (current, room_id) = lock_booking(&mut tx, booking_id).await?;
        if !current.can_transition_to(next) {
            return Err(EngineError::InvalidTransition {
                booking_id,
                from: current,
                attempted: next,
            });
        }

        let update_sql = match next {
            BookingStatus::CheckedIn => {
                "UPDATE bookings SET status = $1, actual_check_in = now() WHERE booking_id = $2"
            }
            BookingStatus::CheckedOut => {
                "UPDATE bookings SET status = $1, actual_check_out = now() WHERE booking_id = $2"
            }
            BookingStatus::Confirmed | BookingStatus::Cancelled => {
                "UPDATE bookings SET status = $1 WHERE booking_id = $2"
            }
        };
        sqlx::query(update_sql)
            .bind(next.as_str())
            .bind(booking_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE rooms SET status = $1 WHERE room_id = $2")
            .bind(room_status.as_str())
            .bind(room_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(%booking_id, %room_id, from = %current, to = %next, "booking transitioned");
        Ok(())
    }

    /// Fetches a booking joined with its guest and room.
    ///
    /// # Errors
    ///
    /// [`EngineError::BookingNotFound`] when missing; storage errors
    /// otherwise.
    pub async fn booking(&self, booking_id: BookingId) -> EngineResult<BookingDetails> {
        sqlx::query_as::<_, BookingDetails>(
            r#"
            SELECT b.*, g.first_name, g.last_name, g.phone, g.email,
                   r.room_number, rt.type_name
            FROM bookings b
            JOIN guests g ON b.guest_id = g.guest_id
            JOIN rooms r ON b.room_id = r.room_id
            JOIN room_types rt ON r.type_id = rt.type_id
            WHERE b.booking_id = $1
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(EngineError::BookingNotFound(booking_id))
    }

    /// Fetches the full statement for a booking: details, payment
    /// history with totals, and feedback with the running average.
    ///
    /// # Errors
    ///
    /// [`EngineError::BookingNotFound`] when missing; storage errors
    /// otherwise.
    pub async fn booking_statement(&self, booking_id: BookingId) -> EngineResult<BookingStatement> {
        let details = self.booking(booking_id).await?;

        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT payment_id, booking_id, amount, payment_method,
                   transaction_id, payment_status, payment_date
            FROM payments
            WHERE booking_id = $1
            ORDER BY payment_date ASC
            "#,
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;

        let total_paid = sqlx::query_scalar::<_, f64>(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM payments
            WHERE booking_id = $1 AND payment_status = 'completed'
            "#,
        )
        .bind(booking_id)
        .fetch_one(&self.pool)
        .await?;

        let feedback = sqlx::query_as::<_, Feedback>(
            r#"
            SELECT feedback_id, booking_id, rating, comment, feedback_date
            FROM feedback
            WHERE booking_id = $1
            ORDER BY feedback_date DESC
            "#,
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;

        let (average_rating, feedback_count) = sqlx::query_as::<_, (f64, i64)>(
            "SELECT COALESCE(AVG(rating), 0), COUNT(*) FROM feedback WHERE booking_id = $1",
        )
        .bind(booking_id)
        .fetch_one(&self.pool)
        .await?;

        let total_paid = round_money(total_paid);
        let balance = round_money(details.booking.total_amount - total_paid);

        Ok(BookingStatement {
            details,
            payments,
            total_paid,
            balance,
            feedback,
            average_rating: round_money(average_rating),
            feedback_count,
        })
    }

    /// Lists all bookings currently in `checked-in`, ordered by room
    /// number.
    ///
    /// # Errors
    ///
    /// Storage errors only.
    pub async fn current_check_ins(&self) -> EngineResult<Vec<BookingDetails>> {
        let rows = sqlx::query_as::<_, BookingDetails>(
            r#"
            SELECT b.*, g.first_name, g.last_name, g.phone, g.email,
                   r.room_number, rt.type_name
            FROM bookings b
            JOIN guests g ON b.guest_id = g.guest_id
            JOIN rooms r ON b.room_id = r.room_id
            JOIN room_types rt ON r.type_id = rt.type_id
            WHERE b.status = 'checked-in'
            ORDER BY r.room_number
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Records a payment against a booking.
    ///
    /// Payments are append-only; the booking's paid total is derived
    /// from its `completed` rows.
    ///
    /// # Errors
    ///
    /// [`EngineError::BookingNotFound`] when missing; storage errors
    /// otherwise.
    pub async fn add_payment(
        &self,
        booking_id: BookingId,
        amount: f64,
        method: PaymentMethod,
        transaction_id: Option<&str>,
        status: PaymentStatus,
    ) -> EngineResult<PaymentId> {
        let mut tx = self.pool.begin().await?;

        booking_exists(&mut tx, booking_id).await?;

        let payment_id = sqlx::query_scalar::<_, PaymentId>(
            r#"
            INSERT INTO payments (booking_id, amount, payment_method, transaction_id,
                                  payment_status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING payment_id
            "#,
        )
        .bind(booking_id)
        .bind(round_money(amount))
        .bind(method.as_str())
        .bind(transaction_id)
        .bind(status.as_str())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(%payment_id, %booking_id, amount, %method, %status, "payment recorded");
        Ok(payment_id)
    }

    /// Lists a booking's completed payments, newest first.
    ///
    /// # Errors
    ///
    /// Storage errors only.
    pub async fn payments(&self, booking_id: BookingId) -> EngineResult<Vec<Payment>> {
        let rows = sqlx::query_as::<_, Payment>(
            r#"
            SELECT payment_id, booking_id, amount, payment_method,
                   transaction_id, payment_status, payment_date
            FROM payments
            WHERE booking_id = $1 AND payment_status = 'completed'
            ORDER BY payment_date DESC
            "#,
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Records guest feedback against a booking.
    ///
    /// Ratings are validated at the type level ([`Rating`]), before any
    /// transaction is opened.
    ///
    /// # Errors
    ///
    /// [`EngineError::BookingNotFound`] when missing; storage errors
    /// otherwise.
    pub async fn add_feedback(
        &self,
        booking_id: BookingId,
        rating: Rating,
        comment: Option<&str>,
    ) -> EngineResult<FeedbackId> {
        let mut tx = self.pool.begin().await?;

        booking_exists(&mut tx, booking_id).await?;

        let feedback_id = sqlx::query_scalar::<_, FeedbackId>(
            "INSERT INTO feedback (booking_id, rating, comment) VALUES ($1, $2, $3) \
             RETURNING feedback_id",
        )
        .bind(booking_id)
        .bind(rating.get())
        .bind(comment)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(%feedback_id, %booking_id, %rating, "feedback recorded");
        Ok(feedback_id)
    }
}

/// Locks a booking row and returns its current status and room.
async fn lock_booking(
    tx: &mut Transaction<'_, Postgres>,
    booking_id: BookingId,
) -> EngineResult<(BookingStatus, RoomId)> {
    let row = sqlx::query_as::<_, (String, RoomId)>(
        "SELECT status, room_id FROM bookings WHERE booking_id = $1 FOR UPDATE",
    )
    .bind(booking_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or(EngineError::BookingNotFound(booking_id))?;

    let status = BookingStatus::try_from(row.0).map_err(EngineError::StorageFailure)?;
    Ok((status, row.1))
}

/// Asserts a booking exists inside the current transaction.
async fn booking_exists(
    tx: &mut Transaction<'_, Postgres>,
    booking_id: BookingId,
) -> EngineResult<()> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM bookings WHERE booking_id = $1)",
    )
    .bind(booking_id)
    .fetch_one(&mut **tx)
    .await?;
    if exists {
        Ok(())
    } else {
        Err(EngineError::BookingNotFound(booking_id))
    }
}
