//! Reservation lifecycle service
//!
//! Owns create / transition / interval-edit on top of the transition rules
//! in the domain model. All writes go through the repository's checked
//! operations, so the overlap invariant and the optimistic version check
//! hold even under concurrent actors.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::pricing::PricingCalculator;
use crate::application::ports::NotificationPort;
use crate::config::BookingPolicy;
use crate::domain::{
    Actor, BookingError, BookingResult, NewReservation, Reservation, ReservationRepository,
    ReservationStatus, Room, RoomRepository, StayRange,
};
use crate::shared::validations::validate_stay_request;

pub struct ReservationLifecycle {
    reservations: Arc<dyn ReservationRepository>,
    rooms: Arc<dyn RoomRepository>,
    pricing: PricingCalculator,
    policy: BookingPolicy,
    notifier: Arc<dyn NotificationPort>,
}

impl ReservationLifecycle {
    pub fn new(
        reservations: Arc<dyn ReservationRepository>,
        rooms: Arc<dyn RoomRepository>,
        policy: BookingPolicy,
        notifier: Arc<dyn NotificationPort>,
    ) -> Self {
        let pricing = PricingCalculator::new(policy.tax_rate, policy.currency.clone());
        Self {
            reservations,
            rooms,
            pricing,
            policy,
            notifier,
        }
    }

    pub fn pricing(&self) -> &PricingCalculator {
        &self.pricing
    }

    /// Create a reservation. The initial status comes from the source
    /// (online → PENDING, agent-assisted → CONFIRMED); availability is
    /// re-checked atomically by the repository.
    pub async fn create(&self, new: NewReservation) -> BookingResult<Reservation> {
        self.create_at(new, Utc::now()).await
    }

    pub async fn create_at(
        &self,
        new: NewReservation,
        now: DateTime<Utc>,
    ) -> BookingResult<Reservation> {
        validate_stay_request(
            new.stay.check_in(),
            new.stay.check_out(),
            new.adults,
            now.date_naive(),
        )?;
        let rooms = self.load_bookable_rooms(&new.room_ids).await?;
        check_capacity(&rooms, new.adults + new.children)?;

        let created = self.reservations.create_checked(new).await?;
        info!(
            reservation_id = created.id,
            status = %created.status,
            stay = %created.stay,
            "reservation created"
        );
        Ok(created)
    }

    /// Apply a lifecycle transition on behalf of `actor`.
    pub async fn transition(
        &self,
        id: i32,
        requested: ReservationStatus,
        actor: Actor,
        reason: Option<String>,
    ) -> BookingResult<Reservation> {
        self.transition_at(id, requested, actor, reason, Utc::now())
            .await
    }

    pub async fn transition_at(
        &self,
        id: i32,
        requested: ReservationStatus,
        actor: Actor,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) -> BookingResult<Reservation> {
        let current = self.load(id).await?;
        current.authorize_transition(
            requested,
            actor,
            reason.as_deref(),
            now,
            self.policy.lockout(),
        )?;

        let updated = self
            .reservations
            .transition(id, current.version, requested, reason.clone())
            .await?;
        info!(
            reservation_id = id,
            from = %current.status,
            to = %updated.status,
            actor = %actor,
            "reservation transitioned"
        );

        if requested == ReservationStatus::Canceled {
            info!(
                reservation_id = id,
                stay = %updated.stay,
                "inventory released for canceled reservation"
            );
        }
        self.dispatch_notifications(&updated, reason.as_deref());
        Ok(updated)
    }

    /// Edit-in-place of dates and guest split: authorize, re-validate
    /// availability excluding this reservation's own hold, re-price, then
    /// atomically replace the interval.
    pub async fn update_interval(
        &self,
        id: i32,
        stay: StayRange,
        adults: u32,
        children: u32,
    ) -> BookingResult<Reservation> {
        self.update_interval_at(id, stay, adults, children, Utc::now())
            .await
    }

    pub async fn update_interval_at(
        &self,
        id: i32,
        stay: StayRange,
        adults: u32,
        children: u32,
        now: DateTime<Utc>,
    ) -> BookingResult<Reservation> {
        let current = self.load(id).await?;
        current.authorize_edit(now, self.policy.lockout())?;
        validate_stay_request(stay.check_in(), stay.check_out(), adults, now.date_naive())?;

        let rooms = self.load_bookable_rooms(&current.room_ids).await?;
        check_capacity(&rooms, adults + children)?;

        let total_price: rust_decimal::Decimal = rooms
            .iter()
            .map(|room| self.pricing.price_room(room, &stay).total)
            .sum();

        let updated = self
            .reservations
            .update_interval_checked(id, current.version, stay, adults, children, total_price)
            .await?;
        info!(
            reservation_id = id,
            stay = %updated.stay,
            total = %updated.total_price,
            "reservation interval updated"
        );
        Ok(updated)
    }

    async fn load(&self, id: i32) -> BookingResult<Reservation> {
        self.reservations
            .find_by_id(id)
            .await?
            .ok_or(BookingError::NotFound {
                entity: "Reservation",
                field: "id",
                value: id.to_string(),
            })
    }

    async fn load_bookable_rooms(&self, room_ids: &[i32]) -> BookingResult<Vec<Room>> {
        if room_ids.is_empty() {
            return Err(BookingError::InvalidInput(
                "a reservation needs at least one room".to_string(),
            ));
        }
        let rooms = self.rooms.find_by_ids(room_ids).await?;
        for id in room_ids {
            let room = rooms.iter().find(|r| r.id == *id);
            match room {
                None => {
                    return Err(BookingError::NotFound {
                        entity: "Room",
                        field: "id",
                        value: id.to_string(),
                    })
                }
                Some(r) if !r.is_active => {
                    return Err(BookingError::RoomUnavailable { room_id: r.id })
                }
                Some(_) => {}
            }
        }
        Ok(rooms)
    }

    /// Post-transition hooks are fire-and-forget: they run after the state
    /// change is durable and cannot roll it back.
    fn dispatch_notifications(&self, reservation: &Reservation, reason: Option<&str>) {
        if !matches!(
            reservation.status,
            ReservationStatus::CheckedOut
                | ReservationStatus::Completed
                | ReservationStatus::Canceled
        ) {
            return;
        }
        let notifier = Arc::clone(&self.notifier);
        let reservation = reservation.clone();
        let reason = reason.map(str::to_string);
        tokio::spawn(async move {
            match reservation.status {
                ReservationStatus::CheckedOut => {
                    notifier.reservation_checked_out(&reservation).await;
                }
                ReservationStatus::Completed => {
                    notifier.reservation_completed(&reservation).await;
                }
                ReservationStatus::Canceled => {
                    notifier
                        .reservation_canceled(&reservation, reason.as_deref())
                        .await;
                }
                _ => {}
            }
        });
    }
}

fn check_capacity(rooms: &[Room], guests: u32) -> BookingResult<()> {
    let capacity: u32 = rooms.iter().map(|r| r.max_guests).sum();
    if guests > capacity {
        return Err(BookingError::InvalidInput(format!(
            "{} guests exceed the combined room capacity of {}",
            guests, capacity
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use crate::application::ports::NoopNotifier;
    use crate::domain::{NewClient, NewRoom, ReservationSource, RoomType, RoomView};
    use crate::infrastructure::storage::InMemoryStorage;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn ts(s: &str) -> DateTime<Utc> {
        format!("{}Z", s).parse().unwrap()
    }

    fn stay(check_in: &str, check_out: &str) -> StayRange {
        StayRange::new(d(check_in), d(check_out)).unwrap()
    }

    // Far from the May 2026 stays used below.
    fn early() -> DateTime<Utc> {
        ts("2026-01-10T09:00:00")
    }

    async fn setup() -> (Arc<InMemoryStorage>, ReservationLifecycle) {
        let store = Arc::new(InMemoryStorage::new());
        for (number, guests) in [("101", 2u32), ("102", 3u32)] {
            crate::domain::RoomRepository::create(
                store.as_ref(),
                NewRoom {
                    number: number.into(),
                    room_type: RoomType::Double,
                    floor: 1,
                    nightly_rate: Decimal::from(100),
                    max_guests: guests,
                    view: RoomView::City,
                    features: vec![],
                    is_featured: false,
                },
            )
            .await
            .unwrap();
        }
        crate::domain::ClientRepository::create(
            store.as_ref(),
            NewClient {
                name: "Ada Lovelace".into(),
                email: "ada@example.com".into(),
                phone: None,
            },
        )
        .await
        .unwrap();

        let lifecycle = ReservationLifecycle::new(
            store.clone(),
            store.clone(),
            BookingPolicy::default(),
            Arc::new(NoopNotifier),
        );
        (store, lifecycle)
    }

    fn new_reservation(source: ReservationSource) -> NewReservation {
        NewReservation {
            client_id: 1,
            room_ids: vec![1],
            stay: stay("2026-05-10", "2026-05-13"),
            adults: 2,
            children: 0,
            total_price: Decimal::new(33000, 2),
            currency: "USD".into(),
            source,
        }
    }

    #[tokio::test]
    async fn online_booking_starts_pending_agent_confirmed() {
        let (_store, lifecycle) = setup().await;
        let online = lifecycle
            .create_at(new_reservation(ReservationSource::Online), early())
            .await
            .unwrap();
        assert_eq!(online.status, ReservationStatus::Pending);

        let mut agent = new_reservation(ReservationSource::Agent);
        agent.room_ids = vec![2];
        let assisted = lifecycle.create_at(agent, early()).await.unwrap();
        assert_eq!(assisted.status, ReservationStatus::Confirmed);
    }

    #[tokio::test]
    async fn create_rejects_party_over_capacity() {
        let (_store, lifecycle) = setup().await;
        let mut new = new_reservation(ReservationSource::Online);
        new.adults = 2;
        new.children = 1; // room 101 sleeps 2
        let err = lifecycle.create_at(new, early()).await.unwrap_err();
        assert!(matches!(err, BookingError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn create_rejects_unknown_room() {
        let (_store, lifecycle) = setup().await;
        let mut new = new_reservation(ReservationSource::Online);
        new.room_ids = vec![99];
        let err = lifecycle.create_at(new, early()).await.unwrap_err();
        assert!(matches!(err, BookingError::NotFound { .. }));
    }

    #[tokio::test]
    async fn create_detects_overlap_at_commit() {
        let (_store, lifecycle) = setup().await;
        lifecycle
            .create_at(new_reservation(ReservationSource::Online), early())
            .await
            .unwrap();

        // Search may have run before the first booking committed; the
        // commit-time re-check still refuses the overlap.
        let mut second = new_reservation(ReservationSource::Online);
        second.stay = stay("2026-05-12", "2026-05-15");
        let err = lifecycle.create_at(second, early()).await.unwrap_err();
        assert_eq!(err, BookingError::RoomUnavailable { room_id: 1 });
    }

    #[tokio::test]
    async fn admin_confirm_then_full_stay_flow() {
        let (_store, lifecycle) = setup().await;
        let r = lifecycle
            .create_at(new_reservation(ReservationSource::Online), early())
            .await
            .unwrap();

        let confirmed = lifecycle
            .transition_at(r.id, ReservationStatus::Confirmed, Actor::Admin, None, early())
            .await
            .unwrap();
        assert_eq!(confirmed.status, ReservationStatus::Confirmed);
        assert_eq!(confirmed.version, r.version + 1);

        let checked_in = lifecycle
            .transition_at(
                r.id,
                ReservationStatus::CheckedIn,
                Actor::Agent,
                None,
                ts("2026-05-10T15:00:00"),
            )
            .await
            .unwrap();
        assert_eq!(checked_in.status, ReservationStatus::CheckedIn);

        let checked_out = lifecycle
            .transition_at(
                r.id,
                ReservationStatus::CheckedOut,
                Actor::Agent,
                None,
                ts("2026-05-13T10:00:00"),
            )
            .await
            .unwrap();
        assert_eq!(checked_out.status, ReservationStatus::CheckedOut);

        let completed = lifecycle
            .transition_at(
                r.id,
                ReservationStatus::Completed,
                Actor::System,
                None,
                ts("2026-05-13T11:00:00"),
            )
            .await
            .unwrap();
        assert_eq!(completed.status, ReservationStatus::Completed);
    }

    #[tokio::test]
    async fn reject_requires_reason_and_records_it() {
        let (_store, lifecycle) = setup().await;
        let r = lifecycle
            .create_at(new_reservation(ReservationSource::Online), early())
            .await
            .unwrap();

        let err = lifecycle
            .transition_at(r.id, ReservationStatus::Canceled, Actor::Admin, None, early())
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::InvalidInput(_)));

        let rejected = lifecycle
            .transition_at(
                r.id,
                ReservationStatus::Canceled,
                Actor::Admin,
                Some("no availability".into()),
                early(),
            )
            .await
            .unwrap();
        assert_eq!(rejected.status, ReservationStatus::Canceled);
        assert_eq!(rejected.rejection_reason.as_deref(), Some("no availability"));
    }

    #[tokio::test]
    async fn cancel_releases_room_for_new_booking() {
        let (_store, lifecycle) = setup().await;
        let r = lifecycle
            .create_at(new_reservation(ReservationSource::Online), early())
            .await
            .unwrap();
        lifecycle
            .transition_at(
                r.id,
                ReservationStatus::Canceled,
                Actor::Admin,
                Some("overbooked".into()),
                early(),
            )
            .await
            .unwrap();

        // Same room, same dates: the hold is gone.
        let again = lifecycle
            .create_at(new_reservation(ReservationSource::Online), early())
            .await;
        assert!(again.is_ok());
    }

    #[tokio::test]
    async fn client_cancel_two_hours_before_check_in_is_locked() {
        let (_store, lifecycle) = setup().await;
        let r = lifecycle
            .create_at(new_reservation(ReservationSource::Agent), early())
            .await
            .unwrap();

        let err = lifecycle
            .transition_at(
                r.id,
                ReservationStatus::Canceled,
                Actor::Client,
                None,
                ts("2026-05-09T22:00:00"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::EditNotAllowed(_)));
    }

    #[tokio::test]
    async fn check_in_a_pending_reservation_fails() {
        let (_store, lifecycle) = setup().await;
        let r = lifecycle
            .create_at(new_reservation(ReservationSource::Online), early())
            .await
            .unwrap();
        let err = lifecycle
            .transition_at(
                r.id,
                ReservationStatus::CheckedIn,
                Actor::Agent,
                None,
                ts("2026-05-10T15:00:00"),
            )
            .await
            .unwrap_err();
        assert_eq!(
            err,
            BookingError::InvalidTransition {
                from: ReservationStatus::Pending,
                requested: ReservationStatus::CheckedIn,
            }
        );
    }

    #[tokio::test]
    async fn edit_to_free_range_reprices() {
        let (_store, lifecycle) = setup().await;
        let r = lifecycle
            .create_at(new_reservation(ReservationSource::Online), early())
            .await
            .unwrap();

        // 3 nights -> 2 nights at 100/night with 10% tax: 220.00.
        let updated = lifecycle
            .update_interval_at(r.id, stay("2026-06-01", "2026-06-03"), 2, 0, early())
            .await
            .unwrap();
        assert_eq!(updated.stay, stay("2026-06-01", "2026-06-03"));
        assert_eq!(updated.total_price, Decimal::new(22000, 2));
        assert_eq!(updated.version, r.version + 1);
    }

    #[tokio::test]
    async fn edit_to_same_range_is_idempotent() {
        let (_store, lifecycle) = setup().await;
        let r = lifecycle
            .create_at(new_reservation(ReservationSource::Online), early())
            .await
            .unwrap();

        let updated = lifecycle
            .update_interval_at(r.id, r.stay, r.adults, r.children, early())
            .await
            .unwrap();
        assert_eq!(updated.stay, r.stay);
        assert_eq!(updated.adults, r.adults);
        assert_eq!(updated.children, r.children);
        assert_eq!(updated.total_price, r.total_price);
        assert_eq!(updated.status, r.status);
        assert_eq!(updated.version, r.version + 1);
    }

    #[tokio::test]
    async fn edit_into_another_hold_is_room_unavailable() {
        let (_store, lifecycle) = setup().await;
        let first = lifecycle
            .create_at(new_reservation(ReservationSource::Online), early())
            .await
            .unwrap();

        let mut other = new_reservation(ReservationSource::Online);
        other.stay = stay("2026-05-20", "2026-05-23");
        let second = lifecycle.create_at(other, early()).await.unwrap();

        let err = lifecycle
            .update_interval_at(second.id, stay("2026-05-12", "2026-05-14"), 2, 0, early())
            .await
            .unwrap_err();
        assert_eq!(err, BookingError::RoomUnavailable { room_id: 1 });

        // The losing edit left the original interval untouched.
        assert!(first.stay.overlaps(&stay("2026-05-12", "2026-05-14")));
        let reloaded = lifecycle.load(second.id).await.unwrap();
        assert_eq!(reloaded.stay, stay("2026-05-20", "2026-05-23"));
        assert_eq!(reloaded.version, second.version);
    }

    #[tokio::test]
    async fn edit_after_check_in_is_refused() {
        let (_store, lifecycle) = setup().await;
        let r = lifecycle
            .create_at(new_reservation(ReservationSource::Agent), early())
            .await
            .unwrap();
        lifecycle
            .transition_at(
                r.id,
                ReservationStatus::CheckedIn,
                Actor::Agent,
                None,
                ts("2026-05-10T15:00:00"),
            )
            .await
            .unwrap();

        let err = lifecycle
            .update_interval_at(
                r.id,
                stay("2026-06-01", "2026-06-03"),
                2,
                0,
                ts("2026-05-11T09:00:00"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::EditNotAllowed(_)));
    }

    #[tokio::test]
    async fn transition_on_missing_reservation_is_not_found() {
        let (_store, lifecycle) = setup().await;
        let err = lifecycle
            .transition_at(42, ReservationStatus::Confirmed, Actor::Admin, None, early())
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::NotFound { .. }));
    }
}
