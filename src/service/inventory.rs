//! Inventory service: room availability and hotel/room listings.

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::domain::{
    AvailableRoom, Hotel, HotelId, Room, RoomId, RoomStatus, RoomSummary, validate_stay,
};
use crate::error::{EngineError, EngineResult};

/// Optional narrowing of an availability query.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityFilter {
    /// Restrict to one hotel.
    pub hotel_id: Option<HotelId>,
    /// Restrict to one room-type name.
    pub room_type: Option<String>,
}

/// Read-side access to the room inventory.
///
/// Availability is decided by the half-open overlap predicate against
/// active bookings; the room `status` column only pre-filters rooms that
/// are administratively out of service or mid-lifecycle.
#[derive(Debug, Clone)]
pub struct InventoryService {
    pool: PgPool,
}

impl InventoryService {
    /// Creates a new inventory service over the given pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Whether the room can host a stay over `[check_in, check_out)`.
    ///
    /// True iff no booking on the room with status in
    /// {confirmed, checked-in} satisfies `check_in_date < check_out AND
    /// check_out_date > check_in`. A checkout on day `D` does not
    /// conflict with a check-in on day `D`.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidDateRange`] before any query when the range
    /// is inverted or empty; [`EngineError::RoomNotFound`] when the room
    /// does not exist; storage errors otherwise.
    pub async fn is_available(
        &self,
        room_id: RoomId,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> EngineResult<bool> {
        validate_stay(check_in, check_out)?;

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM rooms WHERE room_id = $1)",
        )
        .bind(room_id)
        .fetch_one(&self.pool)
        .await?;
        if !exists {
            return Err(EngineError::RoomNotFound(room_id));
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
        .bind(room_id)
        .bind(check_out)
        .bind(check_in)
        .fetch_one(&self.pool)
        .await?;

        Ok(!conflict)
    }

    /// Lists rooms that can host a stay over `[check_in, check_out)`,
    /// optionally narrowed by hotel and room type.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidDateRange`] before any query; storage errors
    /// otherwise.
    pub async fn available_rooms(
        &self,
        check_in: NaiveDate,
        check_out: NaiveDate,
        filter: &AvailabilityFilter,
    ) -> EngineResult<Vec<AvailableRoom>> {
        validate_stay(check_in, check_out)?;

        let mut sql = String::from(
            r#"
            SELECT r.room_id, r.room_number, rt.type_name, rt.base_price,
                   rt.capacity, r.floor, h.hotel_name, h.location, h.city
            FROM rooms r
            JOIN room_types rt ON r.type_id = rt.type_id
            JOIN hotels h ON r.hotel_id = h.hotel_id
            WHERE r.status = 'available'
              AND NOT EXISTS (
                  SELECT 1 FROM bookings b
                  WHERE b.room_id = r.room_id
                    AND b.status IN ('confirmed', 'checked-in')
                    AND b.check_in_date < $1
                    AND b.check_out_date > $2
              )
            "#,
        );

        let mut bind_idx = 3;
        if filter.hotel_id.is_some() {
            sql.push_str(&format!(" AND r.hotel_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.room_type.is_some() {
            sql.push_str(&format!(" AND rt.type_name = ${bind_idx}"));
        }
        sql.push_str(" ORDER BY h.hotel_name, r.room_number");

        let mut query = sqlx::query_as::<_, AvailableRoom>(&sql)
            .bind(check_out)
            .bind(check_in);
        if let Some(hotel_id) = filter.hotel_id {
            query = query.bind(hotel_id);
        }
        if let Some(ref type_name) = filter.room_type {
            query = query.bind(type_name);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Lists every room with its type and current status.
    ///
    /// # Errors
    ///
    /// Storage errors only.
    pub async fn list_rooms(&self) -> EngineResult<Vec<RoomSummary>> {
        let rooms = sqlx::query_as::<_, RoomSummary>(
            r#"
            SELECT r.room_id, r.room_number, rt.type_name, rt.base_price,
                   r.floor, r.status
            FROM rooms r
            JOIN room_types rt ON r.type_id = rt.type_id
            ORDER BY r.room_number
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rooms)
    }

    /// Fetches a single room.
    ///
    /// # Errors
    ///
    /// [`EngineError::RoomNotFound`] when missing; storage errors
    /// otherwise.
    pub async fn room(&self, room_id: RoomId) -> EngineResult<Room> {
        sqlx::query_as::<_, Room>(
            r#"
            SELECT room_id, hotel_id, type_id, room_number, floor, status, last_cleaned
            FROM rooms WHERE room_id = $1
            "#,
        )
        .bind(room_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(EngineError::RoomNotFound(room_id))
    }

    /// Lists all hotel properties, alphabetically.
    ///
    /// # Errors
    ///
    /// Storage errors only.
    pub async fn list_hotels(&self) -> EngineResult<Vec<Hotel>> {
        let hotels = sqlx::query_as::<_, Hotel>(
            r#"
            SELECT hotel_id, hotel_name, location, address, city, state, country,
                   phone, email, rating, description
            FROM hotels
            ORDER BY hotel_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(hotels)
    }

    /// Fetches a single hotel.
    ///
    /// # Errors
    ///
    /// [`EngineError::HotelNotFound`] when missing; storage errors
    /// otherwise.
    pub async fn hotel(&self, hotel_id: HotelId) -> EngineResult<Hotel> {
        sqlx::query_as::<_, Hotel>(
            r#"
            SELECT hotel_id, hotel_name, location, address, city, state, country,
                   phone, email, rating, description
            FROM hotels WHERE hotel_id = $1
            "#,
        )
        .bind(hotel_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(EngineError::HotelNotFound(hotel_id))
    }

    /// Administrative override of a room's status (e.g. pulling a room
    /// into maintenance outside the booking lifecycle).
    ///
    /// # Errors
    ///
    /// [`EngineError::RoomNotFound`] when missing; storage errors
    /// otherwise.
    pub async fn set_room_status(&self, room_id: RoomId, status: RoomStatus) -> EngineResult<()> {
        let result = sqlx::query("UPDATE rooms SET status = $1 WHERE room_id = $2")
            .bind(status.as_str())
            .bind(room_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(EngineError::RoomNotFound(room_id));
        }
        tracing::info!(%room_id, %status, "room status overridden");
        Ok(())
    }
}
