//! Service layer: business logic orchestration.
//!
//! Each service wraps the shared [`sqlx::PgPool`] and owns one slice of
//! the reservation workflow. Mutating operations run inside a single
//! transaction; read operations tolerate empty data.

pub mod analytics;
pub mod booking;
pub mod guests;
pub mod inventory;
pub mod loyalty;
pub mod pricing;

pub use analytics::{
    AnalyticsDashboard, AnalyticsService, CheckoutReminder, CleaningPriority, HousekeepingRoom,
    OccupancyRow, RatingSummary, RevenueReport,
};
pub use booking::{BookingDetails, BookingService, BookingStatement, NewBooking};
pub use guests::GuestService;
pub use inventory::{AvailabilityFilter, InventoryService};
pub use loyalty::{LoyaltyProfile, LoyaltyService, LoyaltyTier, OfferOutcome, RoomRecommendation};
pub use pricing::PricingService;
