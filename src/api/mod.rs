//! REST API module
//!
//! HTTP endpoints for room inventory, availability search, price preview,
//! the booking pipeline and the reservation lifecycle.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod router;

pub use extract::ValidatedJson;
pub use handlers::AppState;
pub use router::{create_api_router, ApiDoc};
