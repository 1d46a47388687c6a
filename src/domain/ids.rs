//! Type-safe entity identifiers.
//!
//! Every entity id is a newtype over `i64` (PostgreSQL `BIGSERIAL`,
//! assigned by the database on insert). The wrappers exist purely so a
//! `BookingId` can never be passed where a `RoomId` is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            Serialize, Deserialize, sqlx::Type,
        )]
        #[serde(transparent)]
        #[sqlx(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw database identifier.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the raw `i64` value.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

entity_id!(
    /// Identifier of a hotel property.
    HotelId
);
entity_id!(
    /// Identifier of a room type (pricing anchor).
    RoomTypeId
);
entity_id!(
    /// Identifier of a physical room.
    RoomId
);
entity_id!(
    /// Identifier of a guest record.
    GuestId
);
entity_id!(
    /// Identifier of a booking.
    BookingId
);
entity_id!(
    /// Identifier of a payment row.
    PaymentId
);
entity_id!(
    /// Identifier of a feedback entry.
    FeedbackId
);

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_raw_value() {
        let id = RoomId::new(17);
        assert_eq!(id.get(), 17);
        assert_eq!(i64::from(id), 17);
        assert_eq!(RoomId::from(17), id);
    }

    #[test]
    fn display_is_plain_integer() {
        let id = BookingId::new(42);
        assert_eq!(format!("{id}"), "42");
    }

    #[test]
    fn serde_is_transparent() {
        let id = GuestId::new(7);
        let json = serde_json::to_string(&id).ok();
        assert_eq!(json.as_deref(), Some("7"));
        let Some(json) = json else {
            panic!("serialization failed");
        };
        let back: Option<GuestId> = serde_json::from_str(&json).ok();
        assert_eq!(back, Some(id));
    }

    #[test]
    fn hash_works_in_hashmap() {
        use std::collections::HashMap;
        let id = PaymentId::new(3);
        let mut map = HashMap::new();
        map.insert(id, "recorded");
        assert_eq!(map.get(&id), Some(&"recorded"));
    }
}
