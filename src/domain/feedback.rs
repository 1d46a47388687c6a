//! Guest feedback entities and rating validation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookingId, FeedbackId};
use crate::error::{EngineError, EngineResult};

/// A validated guest rating: half-integer steps between 1.0 and 5.0
/// inclusive (1.0, 1.5, ..., 5.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rating(f64);

impl Rating {
    /// Validates and wraps a raw rating value.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRating`] when the value is outside
    /// `[1.0, 5.0]` or not aligned to a 0.5 step.
    pub fn new(value: f64) -> EngineResult<Self> {
        let doubled = value * 2.0;
        let is_half_step = (doubled - doubled.round()).abs() < f64::EPSILON;
        if !(1.0..=5.0).contains(&value) || !is_half_step {
            return Err(EngineError::InvalidRating(value));
        }
        Ok(Self(value))
    }

    /// Returns the raw rating value.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

/// A feedback row. Append-only; a booking may accumulate many entries.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Feedback {
    /// Database identifier.
    pub feedback_id: FeedbackId,
    /// Booking the feedback refers to.
    pub booking_id: BookingId,
    /// Guest rating in half steps, `[1.0, 5.0]`.
    pub rating: f64,
    /// Free-text comment, if any.
    pub comment: Option<String>,
    /// When the feedback was recorded.
    pub feedback_date: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn accepts_whole_and_half_steps() {
        for value in [1.0, 1.5, 2.0, 3.5, 4.5, 5.0] {
            assert!(Rating::new(value).is_ok(), "{value} should be valid");
        }
    }

    #[test]
    fn rejects_out_of_range() {
        for value in [0.0, 0.5, 5.5, -3.0, 100.0] {
            assert!(
                matches!(Rating::new(value), Err(EngineError::InvalidRating(_))),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_off_step_values() {
        for value in [1.2, 3.75, 4.99] {
            assert!(
                matches!(Rating::new(value), Err(EngineError::InvalidRating(_))),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn display_shows_one_decimal() {
        let Ok(rating) = Rating::new(4.5) else {
            panic!("valid rating");
        };
        assert_eq!(format!("{rating}"), "4.5");
    }
}
