//! Reservation repository interface
//!
//! The two `*_checked` operations are the commit points that close the
//! search-to-commit race: implementations must re-run the half-open overlap
//! test against non-terminal reservations inside the same transaction that
//! writes the row, and fail with `RoomUnavailable` when it trips.

use async_trait::async_trait;

use super::model::{NewReservation, Reservation, ReservationStatus, StayRange};
use crate::shared::types::errors::BookingResult;
use crate::shared::types::pagination::{PaginatedResult, PaginationParams};

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Insert a reservation after re-checking room availability atomically.
    ///
    /// The initial status comes from `NewReservation::source`.
    async fn create_checked(&self, reservation: NewReservation) -> BookingResult<Reservation>;

    /// Find reservation by ID
    async fn find_by_id(&self, id: i32) -> BookingResult<Option<Reservation>>;

    /// Non-terminal reservations whose interval overlaps `stay`, optionally
    /// ignoring one reservation (the caller's own hold during an edit).
    async fn find_overlapping(
        &self,
        stay: &StayRange,
        exclude: Option<i32>,
    ) -> BookingResult<Vec<Reservation>>;

    /// Apply a status change under an optimistic version check.
    ///
    /// Fails with `StaleVersion` when `expected_version` no longer matches,
    /// so concurrent transition attempts serialize instead of interleaving.
    async fn transition(
        &self,
        id: i32,
        expected_version: i32,
        new_status: ReservationStatus,
        reason: Option<String>,
    ) -> BookingResult<Reservation>;

    /// Atomically replace the stay interval, guest split and price after
    /// re-checking availability (excluding this reservation's own hold)
    /// inside the same transaction. CAS on `expected_version`.
    async fn update_interval_checked(
        &self,
        id: i32,
        expected_version: i32,
        stay: StayRange,
        adults: u32,
        children: u32,
        total_price: rust_decimal::Decimal,
    ) -> BookingResult<Reservation>;

    /// Paginated listing, newest first, optionally filtered by status
    async fn list(
        &self,
        pagination: PaginationParams,
        status: Option<ReservationStatus>,
    ) -> BookingResult<PaginatedResult<Reservation>>;

    /// All reservations belonging to a client, newest first
    async fn find_for_client(&self, client_id: i32) -> BookingResult<Vec<Reservation>>;
}
