//! Inventory entities: hotels, room types, and rooms.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{HotelId, RoomId, RoomTypeId};

/// Lifecycle status of a physical room.
///
/// Status is a derived cache of the latest booking transition for the
/// room and is only written together with that transition (same
/// transaction). The authoritative availability signal is the booking
/// overlap predicate, not this field: a room carrying several future
/// non-overlapping bookings stays `Reserved` while still being bookable
/// for other date ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    /// Ready to be let.
    Available,
    /// Holds at least one confirmed future booking.
    Reserved,
    /// A guest is currently checked in.
    Occupied,
    /// Waiting for housekeeping; not lettable until cleaned.
    Maintenance,
}

impl RoomStatus {
    /// Returns the storage representation of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Reserved => "reserved",
            Self::Occupied => "occupied",
            Self::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for RoomStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "available" => Ok(Self::Available),
            "reserved" => Ok(Self::Reserved),
            "occupied" => Ok(Self::Occupied),
            "maintenance" => Ok(Self::Maintenance),
            other => Err(format!("unknown room status: {other}")),
        }
    }
}

/// A hotel property.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Hotel {
    /// Database identifier.
    pub hotel_id: HotelId,
    /// Display name.
    pub hotel_name: String,
    /// Neighbourhood / area label.
    pub location: String,
    /// Street address.
    pub address: String,
    /// City.
    pub city: String,
    /// State or region.
    pub state: String,
    /// Country.
    pub country: String,
    /// Contact phone number.
    pub phone: String,
    /// Contact email.
    pub email: String,
    /// Aggregate star rating (0.0 when unrated).
    pub rating: f64,
    /// Free-text description.
    pub description: Option<String>,
}

/// A room category carrying the nightly pricing anchor.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RoomType {
    /// Database identifier.
    pub type_id: RoomTypeId,
    /// Category name (e.g. `"Deluxe"`).
    pub type_name: String,
    /// Base nightly price; all dynamic pricing multiplies this.
    pub base_price: f64,
    /// Maximum occupancy.
    pub capacity: i32,
}

/// A physical room.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Room {
    /// Database identifier.
    pub room_id: RoomId,
    /// Owning hotel.
    pub hotel_id: HotelId,
    /// Room category.
    pub type_id: RoomTypeId,
    /// Door number shown to guests.
    pub room_number: String,
    /// Floor the room is on.
    pub floor: i32,
    /// Current lifecycle status.
    #[sqlx(try_from = "String")]
    pub status: RoomStatus,
    /// When housekeeping last cleaned the room, if ever.
    pub last_cleaned: Option<DateTime<Utc>>,
}

/// A room returned by the availability query, joined with its type and
/// hotel for display.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AvailableRoom {
    /// Database identifier.
    pub room_id: RoomId,
    /// Door number shown to guests.
    pub room_number: String,
    /// Room category name.
    pub type_name: String,
    /// Base nightly price.
    pub base_price: f64,
    /// Maximum occupancy.
    pub capacity: i32,
    /// Floor the room is on.
    pub floor: i32,
    /// Owning hotel name.
    pub hotel_name: String,
    /// Hotel area label.
    pub location: String,
    /// Hotel city.
    pub city: String,
}

/// Flat room listing row (inventory overview).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RoomSummary {
    /// Database identifier.
    pub room_id: RoomId,
    /// Door number shown to guests.
    pub room_number: String,
    /// Room category name.
    pub type_name: String,
    /// Base nightly price.
    pub base_price: f64,
    /// Floor the room is on.
    pub floor: i32,
    /// Current lifecycle status.
    #[sqlx(try_from = "String")]
    pub status: RoomStatus,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_storage_form() {
        for status in [
            RoomStatus::Available,
            RoomStatus::Reserved,
            RoomStatus::Occupied,
            RoomStatus::Maintenance,
        ] {
            let parsed = RoomStatus::try_from(status.as_str().to_string());
            assert_eq!(parsed, Ok(status));
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(RoomStatus::try_from("haunted".to_string()).is_err());
    }
}
