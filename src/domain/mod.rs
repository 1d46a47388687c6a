//! Domain layer: typed entities and pure reservation logic.
//!
//! This module holds the explicit, typed records the engine works with
//! (hotels, rooms, guests, bookings, payments, feedback) plus the pure
//! rules that need no storage access: the booking lifecycle state
//! machine, the half-open stay overlap predicate, rating validation,
//! and the offer catalogue.

pub mod booking;
pub mod feedback;
pub mod guest;
pub mod ids;
pub mod offer;
pub mod payment;
pub mod room;

pub use booking::{Booking, BookingStatus, stays_overlap, validate_stay};
pub use feedback::{Feedback, Rating};
pub use guest::{Guest, NewGuest};
pub use ids::{BookingId, FeedbackId, GuestId, HotelId, PaymentId, RoomId, RoomTypeId};
pub use offer::{Offer, OfferRegistry};
pub use payment::{Payment, PaymentMethod, PaymentStatus};
pub use room::{AvailableRoom, Hotel, Room, RoomStatus, RoomSummary, RoomType};

/// Rounds a monetary amount to 2 decimal places.
///
/// Applied at every computation boundary (stay totals, discounts,
/// aggregate sums) so persisted amounts stay consistent.
#[must_use]
pub fn round_money(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::round_money;

    #[test]
    fn rounds_to_two_decimals() {
        assert!((round_money(719.999_4) - 720.0).abs() < f64::EPSILON);
        assert!((round_money(123.455) - 123.46).abs() < f64::EPSILON);
        assert!((round_money(0.0) - 0.0).abs() < f64::EPSILON);
    }
}
