//! # hotel-engine
//!
//! Reservation and availability engine for multi-hotel room inventory.
//!
//! This crate manages room inventory, the booking lifecycle, payments,
//! demand-based pricing, loyalty tiers and offers, and operational
//! analytics. All state lives in PostgreSQL; the engine is a
//! coordination layer whose invariants (date validity, non-overlapping
//! stays, legal status transitions) are enforced inside transactions.
//!
//! ## Architecture
//!
//! ```text
//! Callers (embedding application)
//!     │
//!     ├── InventoryService / GuestService (service/)
//!     ├── BookingService / PricingService
//!     ├── LoyaltyService / AnalyticsService
//!     │
//!     ├── Domain model (domain/)
//!     │
//!     └── PostgreSQL Persistence (persistence/, migrations/)
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
