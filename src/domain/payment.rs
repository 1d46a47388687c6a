//! Payment entities. Payments are append-only: a booking's paid total is
//! always the sum of its `completed` payments, never a mutated field.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookingId, PaymentId};

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash at the desk.
    Cash,
    /// Credit card.
    CreditCard,
    /// Debit card.
    DebitCard,
    /// UPI transfer.
    Upi,
    /// Net banking transfer.
    NetBanking,
}

impl PaymentMethod {
    /// Returns the storage representation of this method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::CreditCard => "credit_card",
            Self::DebitCard => "debit_card",
            Self::Upi => "upi",
            Self::NetBanking => "net_banking",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for PaymentMethod {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "cash" => Ok(Self::Cash),
            "credit_card" => Ok(Self::CreditCard),
            "debit_card" => Ok(Self::DebitCard),
            "upi" => Ok(Self::Upi),
            "net_banking" => Ok(Self::NetBanking),
            other => Err(format!("unknown payment method: {other}")),
        }
    }
}

/// Settlement status of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Initiated but not settled; does not count toward the paid total.
    Pending,
    /// Settled; counts toward the paid total.
    Completed,
    /// Rejected or reversed; does not count toward the paid total.
    Failed,
}

impl PaymentStatus {
    /// Returns the storage representation of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for PaymentStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown payment status: {other}")),
        }
    }
}

/// A payment row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Payment {
    /// Database identifier.
    pub payment_id: PaymentId,
    /// Booking the payment settles.
    pub booking_id: BookingId,
    /// Amount paid.
    pub amount: f64,
    /// How the payment was made.
    #[sqlx(try_from = "String")]
    pub payment_method: PaymentMethod,
    /// External transaction reference, if any.
    pub transaction_id: Option<String>,
    /// Settlement status.
    #[sqlx(try_from = "String")]
    pub payment_status: PaymentStatus,
    /// When the payment was recorded.
    pub payment_date: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn method_round_trips_storage_form() {
        use PaymentMethod::*;
        for method in [Cash, CreditCard, DebitCard, Upi, NetBanking] {
            let parsed = PaymentMethod::try_from(method.as_str().to_string());
            assert_eq!(parsed, Ok(method));
        }
    }

    #[test]
    fn status_round_trips_storage_form() {
        use PaymentStatus::*;
        for status in [Pending, Completed, Failed] {
            let parsed = PaymentStatus::try_from(status.as_str().to_string());
            assert_eq!(parsed, Ok(status));
        }
    }
}
