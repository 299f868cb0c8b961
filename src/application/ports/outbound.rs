//! Outbound ports: collaborators this core calls but does not own
//!
//! Notification and invoicing are fire-and-forget: they run after a
//! successful transition and their failures are logged, never propagated
//! back into the state change.

use async_trait::async_trait;

use crate::domain::Reservation;

/// Guest-facing notification and invoicing hooks
#[async_trait]
pub trait NotificationPort: Send + Sync {
    /// Guests have checked out; invoicing may start.
    async fn reservation_checked_out(&self, reservation: &Reservation);

    /// Stay finalized; feedback prompt and invoice delivery are now eligible.
    async fn reservation_completed(&self, reservation: &Reservation);

    /// Reservation was canceled (admin reject or guest self-service).
    async fn reservation_canceled(&self, reservation: &Reservation, reason: Option<&str>);
}

/// Default no-op implementation used in tests and when no delivery channel
/// is configured.
#[derive(Debug, Default, Clone)]
pub struct NoopNotifier;

#[async_trait]
impl NotificationPort for NoopNotifier {
    async fn reservation_checked_out(&self, _reservation: &Reservation) {}

    async fn reservation_completed(&self, _reservation: &Reservation) {}

    async fn reservation_canceled(&self, _reservation: &Reservation, _reason: Option<&str>) {}
}
