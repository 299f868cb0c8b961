//! Business logic: the booking and availability use cases

pub mod ports;
pub mod services;

pub use services::availability::AvailabilityService;
pub use services::booking::{BookingOrchestrator, BookingWorkflow, WorkflowStage};
pub use services::clients::{CandidateProfile, ClientResolver, ResolvedClient};
pub use services::lifecycle::ReservationLifecycle;
pub use services::pricing::{BookingCartItem, PricingCalculator, StayQuote};
