//! Promotional offer codes.
//!
//! The registry is an immutable lookup table injected into the loyalty
//! service at construction, so alternative catalogues can be substituted
//! without touching engine logic.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::round_money;
use crate::error::{EngineError, EngineResult};

/// A named discount offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    /// Discount percentage applied to the booking total.
    pub discount_pct: f64,
    /// Human-readable description of the offer.
    pub description: String,
}

impl Offer {
    /// Applies the discount to the given amount, returning
    /// `(discount_amount, new_amount)`, each rounded to 2 decimals.
    ///
    /// The input is always the *current* amount, so applying a second
    /// offer discounts the already-discounted total.
    #[must_use]
    pub fn apply(&self, amount: f64) -> (f64, f64) {
        let discount_amount = round_money(amount * self.discount_pct / 100.0);
        let new_amount = round_money(amount - discount_amount);
        (discount_amount, new_amount)
    }
}

/// Immutable code → offer lookup table.
#[derive(Debug, Clone)]
pub struct OfferRegistry {
    offers: HashMap<String, Offer>,
}

impl OfferRegistry {
    /// Builds a registry from an explicit catalogue.
    #[must_use]
    pub fn new(offers: HashMap<String, Offer>) -> Self {
        Self { offers }
    }

    /// Looks up an offer by code.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidOfferCode`] for unknown codes.
    pub fn get(&self, code: &str) -> EngineResult<&Offer> {
        self.offers
            .get(code)
            .ok_or_else(|| EngineError::InvalidOfferCode(code.to_string()))
    }
}

impl Default for OfferRegistry {
    /// The standard catalogue.
    fn default() -> Self {
        let catalogue = [
            ("WEEKEND20", 20.0, "20% off on weekend bookings"),
            ("FIRSTTIME", 15.0, "15% off for first-time guests"),
            ("LOYALTY10", 10.0, "10% loyalty discount"),
            ("EARLYBIRD", 12.0, "12% off for advance bookings"),
        ];
        Self::new(
            catalogue
                .into_iter()
                .map(|(code, discount_pct, description)| {
                    (
                        code.to_string(),
                        Offer {
                            discount_pct,
                            description: description.to_string(),
                        },
                    )
                })
                .collect(),
        )
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn default_catalogue_has_all_codes() {
        let registry = OfferRegistry::default();
        for (code, pct) in [
            ("WEEKEND20", 20.0),
            ("FIRSTTIME", 15.0),
            ("LOYALTY10", 10.0),
            ("EARLYBIRD", 12.0),
        ] {
            let Ok(offer) = registry.get(code) else {
                panic!("{code} should exist");
            };
            assert!((offer.discount_pct - pct).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn unknown_code_is_rejected() {
        let registry = OfferRegistry::default();
        assert!(matches!(
            registry.get("NOTACODE"),
            Err(EngineError::InvalidOfferCode(_))
        ));
    }

    #[test]
    fn codes_are_case_sensitive() {
        let registry = OfferRegistry::default();
        assert!(registry.get("weekend20").is_err());
    }

    #[test]
    fn repeated_offers_compound_from_current_total() {
        let registry = OfferRegistry::default();
        let Ok(weekend) = registry.get("WEEKEND20") else {
            panic!("WEEKEND20 should exist");
        };
        let (first_discount, after_first) = weekend.apply(1000.0);
        assert!((first_discount - 200.0).abs() < f64::EPSILON);
        assert!((after_first - 800.0).abs() < f64::EPSILON);

        // The second offer sees the already-discounted total.
        let Ok(loyalty) = registry.get("LOYALTY10") else {
            panic!("LOYALTY10 should exist");
        };
        let (second_discount, after_second) = loyalty.apply(after_first);
        assert!((second_discount - 80.0).abs() < f64::EPSILON);
        assert!((after_second - 720.0).abs() < f64::EPSILON);
    }

    #[test]
    fn applied_amounts_are_rounded_to_two_decimals() {
        let offer = Offer {
            discount_pct: 15.0,
            description: String::new(),
        };
        // 999.99 * 0.15 = 149.9985 -> 150.00; remainder 849.99.
        let (discount, remaining) = offer.apply(999.99);
        assert!((discount - 150.0).abs() < f64::EPSILON);
        assert!((remaining - 849.99).abs() < f64::EPSILON);
    }
}
