//! # Solara PMS
//!
//! Reservation booking and availability core for a hotel property
//! management system.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Rooms, clients, reservations; the transition table and
//!   repository traits
//! - **application**: Availability search, pricing, client resolution,
//!   the reservation lifecycle and the booking pipeline
//! - **infrastructure**: Storage adapters (in-memory and SeaORM/SQLite)
//! - **api**: REST API with Swagger documentation
//! - **shared**: Error taxonomy, pagination, validation helpers

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use config::{default_config_path, AppConfig, BookingPolicy};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig};

// Re-export API router
pub use api::{create_api_router, AppState};
