//! Application services

pub mod availability;
pub mod booking;
pub mod clients;
pub mod lifecycle;
pub mod pricing;

pub use availability::AvailabilityService;
pub use booking::{BookingOrchestrator, BookingWorkflow, WorkflowStage};
pub use clients::{CandidateProfile, ClientResolver, ResolvedClient};
pub use lifecycle::ReservationLifecycle;
pub use pricing::{BookingCartItem, PricingCalculator, StayQuote};
