//! Booking orchestration
//!
//! The 4-stage pipeline: capture dates → pick rooms → resolve client →
//! commit. All intermediate state lives in [`BookingWorkflow`], a plain
//! serializable value passed between stages, so nothing is persisted until
//! commit and abandoning a workflow has no side effects.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::availability::AvailabilityService;
use super::clients::{CandidateProfile, ClientResolver, ResolvedClient};
use super::lifecycle::ReservationLifecycle;
use super::pricing::{BookingCartItem, PricingCalculator};
use crate::domain::{
    BookingError, BookingResult, ClientRepository, NewClient, NewReservation, Reservation,
    ReservationSource, Room, RoomFilters, RoomSort, StayRange,
};
use crate::shared::validations::validate_stay_request;

/// Where a workflow currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStage {
    CollectDates,
    SelectRoom,
    ResolveClient,
    ReadyToCommit,
}

/// Client slot of a workflow: an existing identity or a staged profile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkflowClient {
    Existing { client_id: i32 },
    Staged { profile: NewClient },
}

/// Serializable in-flight booking state. Discarded wholesale on abort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingWorkflow {
    pub id: Uuid,
    pub stage: WorkflowStage,
    pub stay: Option<StayRange>,
    pub adults: u32,
    pub children: u32,
    pub cart: Vec<BookingCartItem>,
    pub client: Option<WorkflowClient>,
}

impl BookingWorkflow {
    fn stay(&self) -> BookingResult<StayRange> {
        self.stay.ok_or_else(|| {
            BookingError::InvalidInput("no dates captured for this booking yet".to_string())
        })
    }
}

pub struct BookingOrchestrator {
    availability: AvailabilityService,
    resolver: ClientResolver,
    lifecycle: Arc<ReservationLifecycle>,
    clients: Arc<dyn ClientRepository>,
    pricing: PricingCalculator,
    rooms: Arc<dyn crate::domain::RoomRepository>,
}

impl BookingOrchestrator {
    pub fn new(
        availability: AvailabilityService,
        resolver: ClientResolver,
        lifecycle: Arc<ReservationLifecycle>,
        clients: Arc<dyn ClientRepository>,
        rooms: Arc<dyn crate::domain::RoomRepository>,
    ) -> Self {
        let pricing = lifecycle.pricing().clone();
        Self {
            availability,
            resolver,
            lifecycle,
            clients,
            pricing,
            rooms,
        }
    }

    /// Stage 0: a fresh, empty workflow.
    pub fn begin(&self) -> BookingWorkflow {
        let wf = BookingWorkflow {
            id: Uuid::new_v4(),
            stage: WorkflowStage::CollectDates,
            stay: None,
            adults: 0,
            children: 0,
            cart: Vec::new(),
            client: None,
        };
        debug!(workflow = %wf.id, "booking workflow started");
        wf
    }

    /// Stage 1: capture dates and party size. Re-capturing resets any
    /// previously selected rooms, since their quotes no longer apply.
    pub fn capture_stay(
        &self,
        wf: BookingWorkflow,
        check_in: NaiveDate,
        check_out: NaiveDate,
        adults: u32,
        children: u32,
    ) -> BookingResult<BookingWorkflow> {
        self.capture_stay_at(wf, check_in, check_out, adults, children, Utc::now().date_naive())
    }

    pub fn capture_stay_at(
        &self,
        mut wf: BookingWorkflow,
        check_in: NaiveDate,
        check_out: NaiveDate,
        adults: u32,
        children: u32,
        today: NaiveDate,
    ) -> BookingResult<BookingWorkflow> {
        validate_stay_request(check_in, check_out, adults, today)?;
        wf.stay = Some(StayRange::new(check_in, check_out)?);
        wf.adults = adults;
        wf.children = children;
        wf.cart.clear();
        wf.stage = WorkflowStage::SelectRoom;
        Ok(wf)
    }

    /// Stage 2a: search rooms for the captured stay.
    pub async fn search_rooms(
        &self,
        wf: &BookingWorkflow,
        filters: &RoomFilters,
        sort: RoomSort,
    ) -> BookingResult<Vec<Room>> {
        self.search_rooms_at(wf, filters, sort, Utc::now().date_naive())
            .await
    }

    pub async fn search_rooms_at(
        &self,
        wf: &BookingWorkflow,
        filters: &RoomFilters,
        sort: RoomSort,
        today: NaiveDate,
    ) -> BookingResult<Vec<Room>> {
        let stay = wf.stay()?;
        self.availability
            .find_available_rooms_at(&stay, wf.adults, wf.children, filters, sort, today)
            .await
    }

    /// Stage 2b: put a room into the cart with a fresh quote. May be called
    /// more than once for multi-room stays.
    pub async fn select_room(
        &self,
        mut wf: BookingWorkflow,
        room_id: i32,
    ) -> BookingResult<BookingWorkflow> {
        let stay = wf.stay()?;
        if wf.cart.iter().any(|item| item.room_id == room_id) {
            return Err(BookingError::InvalidInput(format!(
                "room {} is already in this booking",
                room_id
            )));
        }

        let room = self
            .rooms
            .find_by_id(room_id)
            .await?
            .filter(|r| r.is_active)
            .ok_or(BookingError::NotFound {
                entity: "Room",
                field: "id",
                value: room_id.to_string(),
            })?;

        // Advisory pre-check; the commit re-checks inside the transaction.
        if !self.availability.rooms_free_for(&[room_id], &stay, None).await? {
            return Err(BookingError::RoomUnavailable { room_id });
        }

        wf.cart
            .push(self.pricing.cart_item(&room, &stay, wf.adults, wf.children));
        wf.stage = WorkflowStage::ResolveClient;
        Ok(wf)
    }

    /// Stage 3: attach a client, existing or staged.
    pub async fn resolve_client(
        &self,
        mut wf: BookingWorkflow,
        email: &str,
        candidate: &CandidateProfile,
    ) -> BookingResult<BookingWorkflow> {
        if wf.cart.is_empty() {
            return Err(BookingError::InvalidInput(
                "select a room before resolving the client".to_string(),
            ));
        }
        wf.client = Some(match self.resolver.resolve(email, candidate).await? {
            ResolvedClient::Existing(client) => WorkflowClient::Existing {
                client_id: client.id,
            },
            ResolvedClient::Staged(profile) => WorkflowClient::Staged { profile },
        });
        wf.stage = WorkflowStage::ReadyToCommit;
        Ok(wf)
    }

    /// Stage 4: commit. Persists a staged client, then creates the
    /// reservation; the repository re-validates availability inside the same
    /// transaction, closing the race window opened at search time.
    pub async fn commit(
        &self,
        wf: BookingWorkflow,
        source: ReservationSource,
    ) -> BookingResult<Reservation> {
        self.commit_at(wf, source, Utc::now()).await
    }

    pub async fn commit_at(
        &self,
        wf: BookingWorkflow,
        source: ReservationSource,
        now: DateTime<Utc>,
    ) -> BookingResult<Reservation> {
        if wf.stage != WorkflowStage::ReadyToCommit {
            return Err(BookingError::InvalidInput(format!(
                "booking workflow {} is not ready to commit",
                wf.id
            )));
        }
        let stay = wf.stay()?;
        let client_id = match wf.client.as_ref().ok_or_else(|| {
            BookingError::InvalidInput("no client resolved for this booking".to_string())
        })? {
            WorkflowClient::Existing { client_id } => *client_id,
            // A concurrent signup may have claimed the email since staging;
            // the existing identity still wins.
            WorkflowClient::Staged { profile } => {
                match self.clients.find_by_email(&profile.email).await? {
                    Some(existing) => existing.id,
                    None => self.clients.create(profile.clone()).await?.id,
                }
            }
        };

        let reservation = self
            .lifecycle
            .create_at(
                NewReservation {
                    client_id,
                    room_ids: wf.cart.iter().map(|item| item.room_id).collect(),
                    stay,
                    adults: wf.adults,
                    children: wf.children,
                    total_price: self.pricing.cart_total(&wf.cart),
                    currency: self.pricing.currency().to_string(),
                    source,
                },
                now,
            )
            .await?;
        info!(
            workflow = %wf.id,
            reservation_id = reservation.id,
            status = %reservation.status,
            "booking committed"
        );
        Ok(reservation)
    }

    /// Abandon a workflow. Purely in-memory; nothing was persisted.
    pub fn abort(&self, wf: BookingWorkflow) {
        debug!(workflow = %wf.id, stage = ?wf.stage, "booking workflow aborted");
        drop(wf);
    }
}
