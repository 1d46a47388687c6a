//! Loyalty tiers, offer codes, and room recommendations.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::domain::{
    BookingId, GuestId, OfferRegistry, RoomId, round_money, validate_stay,
};
use crate::error::{EngineError, EngineResult};

/// Guest loyalty classification derived from completed-stay history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoyaltyTier {
    /// Default tier.
    Bronze,
    /// ≥2 completed stays or ≥20000 spent.
    Silver,
    /// ≥5 completed stays or ≥50000 spent.
    Gold,
    /// ≥10 completed stays or ≥100000 spent.
    Platinum,
}

impl fmt::Display for LoyaltyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
            Self::Platinum => "Platinum",
        };
        f.write_str(name)
    }
}

/// A guest's loyalty standing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoyaltyProfile {
    /// Derived tier.
    pub tier: LoyaltyTier,
    /// Discount percentage the tier grants.
    pub discount_pct: f64,
    /// Tier benefits, as shown to the guest.
    pub benefits: String,
    /// Number of checked-out bookings.
    pub total_bookings: i64,
    /// Total spent across checked-out bookings.
    pub total_spent: f64,
}

/// Outcome of applying an offer code to a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferOutcome {
    /// Offer description from the registry.
    pub description: String,
    /// Booking total before the discount.
    pub original_amount: f64,
    /// Amount deducted.
    pub discount_amount: f64,
    /// Persisted new booking total.
    pub new_amount: f64,
}

/// A scored room suggestion for a guest.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RoomRecommendation {
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
    /// Recommendation score out of 100.
    pub recommendation_score: i32,
}

/// Derives a loyalty standing from completed-stay aggregates.
///
/// Thresholds are evaluated top-down with OR semantics over bookings
/// and spend. A guest with no completed stays at all gets Bronze with a
/// 0% discount — distinct from the earned default Bronze at 5%.
#[must_use]
pub fn loyalty_profile(total_bookings: i64, total_spent: f64) -> LoyaltyProfile {
    if total_bookings == 0 {
        return LoyaltyProfile {
            tier: LoyaltyTier::Bronze,
            discount_pct: 0.0,
            benefits: "Standard benefits".to_string(),
            total_bookings: 0,
            total_spent: 0.0,
        };
    }

    let (tier, discount_pct, benefits) = if total_bookings >= 10 || total_spent >= 100_000.0 {
        (
            LoyaltyTier::Platinum,
            20.0,
            "Free room upgrade, Late checkout, 20% discount",
        )
    } else if total_bookings >= 5 || total_spent >= 50_000.0 {
        (
            LoyaltyTier::Gold,
            15.0,
            "Priority check-in, Late checkout, 15% discount",
        )
    } else if total_bookings >= 2 || total_spent >= 20_000.0 {
        (LoyaltyTier::Silver, 10.0, "Priority support, 10% discount")
    } else {
        (LoyaltyTier::Bronze, 5.0, "Standard benefits, 5% discount")
    };

    LoyaltyProfile {
        tier,
        discount_pct,
        benefits: benefits.to_string(),
        total_bookings,
        total_spent,
    }
}

/// Loyalty and offer engine.
#[derive(Debug, Clone)]
pub struct LoyaltyService {
    pool: PgPool,
    offers: OfferRegistry,
}

impl LoyaltyService {
    /// Creates a new loyalty service with an explicit offer catalogue.
    #[must_use]
    pub fn new(pool: PgPool, offers: OfferRegistry) -> Self {
        Self { pool, offers }
    }

    /// Derives a guest's loyalty standing from their checked-out
    /// bookings.
    ///
    /// A guest with no completed stays (including an id that was never
    /// registered) reports the no-history Bronze/0% profile.
    ///
    /// # Errors
    ///
    /// Storage errors only.
    pub async fn loyalty_tier(&self, guest_id: GuestId) -> EngineResult<LoyaltyProfile> {
        let (total_bookings, total_spent) = sqlx::query_as::<_, (i64, f64)>(
            r#"
            SELECT COUNT(*), COALESCE(SUM(total_amount), 0)
            FROM bookings
            WHERE guest_id = $1 AND status = 'checked-out'
            "#,
        )
        .bind(guest_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(loyalty_profile(total_bookings, round_money(total_spent)))
    }

    /// Applies a named offer code to a booking, rewriting its total.
    ///
    /// The discount is computed from the booking's *current* total, so
    /// repeated applications compound. An audit note
    /// (`" | Offer: CODE"`) is appended to the booking's free-text
    /// requests in the same transaction as the amount rewrite.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidOfferCode`] for unknown codes (checked
    /// before any transaction); [`EngineError::BookingNotFound`] when
    /// the booking is missing. Either failure leaves the booking
    /// untouched.
    pub async fn apply_offer(
        &self,
        booking_id: BookingId,
        code: &str,
    ) -> EngineResult<OfferOutcome> {
        let offer = self.offers.get(code)?.clone();

        let mut tx = self.pool.begin().await?;

        let original_amount = sqlx::query_scalar::<_, f64>(
            "SELECT total_amount FROM bookings WHERE booking_id = $1 FOR UPDATE",
        )
        .bind(booking_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(EngineError::BookingNotFound(booking_id))?;

        let (discount_amount, new_amount) = offer.apply(original_amount);

        sqlx::query(
            r#"
            UPDATE bookings
            SET total_amount = $1,
                special_requests = COALESCE(special_requests, '') || ' | Offer: ' || $2
            WHERE booking_id = $3
            "#,
        )
        .bind(new_amount)
        .bind(code)
        .bind(booking_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(%booking_id, code, original_amount, new_amount, "offer applied");
        Ok(OfferOutcome {
            description: offer.description,
            original_amount,
            discount_amount,
            new_amount,
        })
    }

    /// Suggests up to five conflict-free rooms for a stay, preferring
    /// the guest's most-booked room type, then higher floors.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidDateRange`] before any query; storage
    /// errors otherwise.
    pub async fn recommend_rooms(
        &self,
        guest_id: GuestId,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> EngineResult<Vec<RoomRecommendation>> {
        validate_stay(check_in, check_out)?;

        let preferred_type = sqlx::query_scalar::<_, String>(
            r#"
            SELECT rt.type_name
            FROM bookings b
            JOIN rooms r ON b.room_id = r.room_id
            JOIN room_types rt ON r.type_id = rt.type_id
            WHERE b.guest_id = $1 AND b.status = 'checked-out'
            GROUP BY rt.type_name
            ORDER BY COUNT(*) DESC
            LIMIT 1
            "#,
        )
        .bind(guest_id)
        .fetch_optional(&self.pool)
        .await?;

        let recommendations = sqlx::query_as::<_, RoomRecommendation>(
            r#"
            SELECT r.room_id, r.room_number, rt.type_name, rt.base_price,
                   rt.capacity, r.floor,
                   CASE
                       WHEN rt.type_name = $1 THEN 100
                       WHEN r.floor >= 2 THEN 80
                       ELSE 60
                   END AS recommendation_score
            FROM rooms r
            JOIN room_types rt ON r.type_id = rt.type_id
            WHERE r.status = 'available'
              AND NOT EXISTS (
                  SELECT 1 FROM bookings b
                  WHERE b.room_id = r.room_id
                    AND b.status IN ('confirmed', 'checked-in')
                    AND b.check_in_date < $2
                    AND b.check_out_date > $3
              )
            ORDER BY recommendation_score DESC, rt.base_price ASC
            LIMIT 5
            "#,
        )
        .bind(preferred_type)
        .bind(check_out)
        .bind(check_in)
        .fetch_all(&self.pool)
        .await?;

        Ok(recommendations)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn no_history_is_bronze_without_discount() {
        let profile = loyalty_profile(0, 0.0);
        assert_eq!(profile.tier, LoyaltyTier::Bronze);
        assert!((profile.discount_pct - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn one_cheap_stay_earns_default_bronze_discount() {
        let profile = loyalty_profile(1, 3_000.0);
        assert_eq!(profile.tier, LoyaltyTier::Bronze);
        assert!((profile.discount_pct - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn booking_count_thresholds_win_without_spend() {
        let platinum = loyalty_profile(10, 0.0);
        assert_eq!(platinum.tier, LoyaltyTier::Platinum);
        assert!((platinum.discount_pct - 20.0).abs() < f64::EPSILON);

        assert_eq!(loyalty_profile(5, 0.0).tier, LoyaltyTier::Gold);
        assert_eq!(loyalty_profile(2, 0.0).tier, LoyaltyTier::Silver);
        assert_eq!(loyalty_profile(9, 0.0).tier, LoyaltyTier::Gold);
    }

    #[test]
    fn spend_thresholds_win_without_count() {
        assert_eq!(loyalty_profile(1, 100_000.0).tier, LoyaltyTier::Platinum);
        assert_eq!(loyalty_profile(1, 50_000.0).tier, LoyaltyTier::Gold);
        assert_eq!(loyalty_profile(1, 20_000.0).tier, LoyaltyTier::Silver);
        assert_eq!(loyalty_profile(1, 19_999.99).tier, LoyaltyTier::Bronze);
    }
}
