//! Guest directory service.

use sqlx::PgPool;

use crate::domain::{Guest, GuestId, NewGuest};
use crate::error::{EngineError, EngineResult};

/// Registration and lookup of guest records. Guests are never deleted.
#[derive(Debug, Clone)]
pub struct GuestService {
    pool: PgPool,
}

impl GuestService {
    /// Creates a new guest service over the given pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Registers a new guest and returns the assigned id.
    ///
    /// # Errors
    ///
    /// Storage errors only.
    pub async fn create_guest(&self, guest: &NewGuest) -> EngineResult<GuestId> {
        let guest_id = sqlx::query_scalar::<_, GuestId>(
            r#"
            INSERT INTO guests (first_name, last_name, email, phone, address,
                                city, country, id_proof_type, id_proof_number)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING guest_id
            "#,
        )
        .bind(&guest.first_name)
        .bind(&guest.last_name)
        .bind(&guest.email)
        .bind(&guest.phone)
        .bind(&guest.address)
        .bind(&guest.city)
        .bind(&guest.country)
        .bind(&guest.id_proof_type)
        .bind(&guest.id_proof_number)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(%guest_id, "guest registered");
        Ok(guest_id)
    }

    /// Fetches a guest by id.
    ///
    /// # Errors
    ///
    /// [`EngineError::GuestNotFound`] when missing; storage errors
    /// otherwise.
    pub async fn guest(&self, guest_id: GuestId) -> EngineResult<Guest> {
        sqlx::query_as::<_, Guest>("SELECT * FROM guests WHERE guest_id = $1")
            .bind(guest_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(EngineError::GuestNotFound(guest_id))
    }

    /// Searches guests by substring over name, email, and phone.
    ///
    /// # Errors
    ///
    /// Storage errors only.
    pub async fn search_guests(&self, term: &str) -> EngineResult<Vec<Guest>> {
        let pattern = format!("%{term}%");
        let guests = sqlx::query_as::<_, Guest>(
            r#"
            SELECT * FROM guests
            WHERE first_name ILIKE $1 OR last_name ILIKE $1
               OR email ILIKE $1 OR phone ILIKE $1
            ORDER BY guest_id
            "#,
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(guests)
    }
}
