//! Guest directory entities.

use serde::{Deserialize, Serialize};

use super::GuestId;

/// A registered guest. Guest rows are never deleted; bookings reference
/// them for the lifetime of the system.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Guest {
    /// Database identifier.
    pub guest_id: GuestId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Street address, if provided.
    pub address: Option<String>,
    /// City, if provided.
    pub city: Option<String>,
    /// Country, if provided.
    pub country: Option<String>,
    /// Identity proof document kind (e.g. passport), if provided.
    pub id_proof_type: Option<String>,
    /// Identity proof document number, if provided.
    pub id_proof_number: Option<String>,
}

/// Input record for registering a new guest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGuest {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Street address.
    #[serde(default)]
    pub address: Option<String>,
    /// City.
    #[serde(default)]
    pub city: Option<String>,
    /// Country.
    #[serde(default)]
    pub country: Option<String>,
    /// Identity proof document kind.
    #[serde(default)]
    pub id_proof_type: Option<String>,
    /// Identity proof document number.
    #[serde(default)]
    pub id_proof_number: Option<String>,
}
