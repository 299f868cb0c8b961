//! In-memory storage implementation

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use crate::domain::{
    BookingError, BookingResult, Client, ClientRepository, NewClient, NewReservation, NewRoom,
    Reservation, ReservationRepository, ReservationStatus, Room, RoomRepository, StayRange,
};
use crate::shared::{PaginatedResult, PaginationParams};

/// In-memory storage for development and testing
pub struct InMemoryStorage {
    rooms: DashMap<i32, Room>,
    clients: DashMap<i32, Client>,
    reservations: DashMap<i32, Reservation>,
    room_counter: AtomicI32,
    client_counter: AtomicI32,
    reservation_counter: AtomicI32,
    /// Serializes availability re-checks with the writes that depend on them,
    /// standing in for the database transaction of the SQL backend.
    commit_lock: Mutex<()>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
            clients: DashMap::new(),
            reservations: DashMap::new(),
            room_counter: AtomicI32::new(1),
            client_counter: AtomicI32::new(1),
            reservation_counter: AtomicI32::new(1),
            commit_lock: Mutex::new(()),
        }
    }

    fn overlapping(&self, stay: &StayRange, exclude: Option<i32>) -> Vec<Reservation> {
        let mut hits: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|r| {
                Some(r.id) != exclude && r.holds_inventory() && r.stay.overlaps(stay)
            })
            .map(|r| r.clone())
            .collect();
        hits.sort_by_key(|r| r.id);
        hits
    }

    /// First requested room already held for an overlapping interval, if any.
    fn conflicting_room(
        &self,
        room_ids: &[i32],
        stay: &StayRange,
        exclude: Option<i32>,
    ) -> Option<i32> {
        let holds = self.overlapping(stay, exclude);
        room_ids
            .iter()
            .find(|id| holds.iter().any(|r| r.room_ids.contains(id)))
            .copied()
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRepository for InMemoryStorage {
    async fn create(&self, room: NewRoom) -> BookingResult<Room> {
        let id = self.room_counter.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let room = Room {
            id,
            number: room.number,
            room_type: room.room_type,
            floor: room.floor,
            nightly_rate: room.nightly_rate,
            max_guests: room.max_guests,
            view: room.view,
            features: room.features,
            is_featured: room.is_featured,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.rooms.insert(id, room.clone());
        Ok(room)
    }

    async fn find_by_id(&self, id: i32) -> BookingResult<Option<Room>> {
        Ok(self.rooms.get(&id).map(|r| r.clone()))
    }

    async fn find_by_ids(&self, ids: &[i32]) -> BookingResult<Vec<Room>> {
        let mut found: Vec<Room> = ids
            .iter()
            .filter_map(|id| self.rooms.get(id).map(|r| r.clone()))
            .collect();
        found.sort_by_key(|r| r.id);
        found.dedup_by_key(|r| r.id);
        Ok(found)
    }

    async fn find_active(&self) -> BookingResult<Vec<Room>> {
        let mut active: Vec<Room> = self
            .rooms
            .iter()
            .filter(|r| r.is_active)
            .map(|r| r.clone())
            .collect();
        active.sort_by_key(|r| r.id);
        Ok(active)
    }

    async fn list(&self, pagination: PaginationParams) -> BookingResult<PaginatedResult<Room>> {
        let mut all: Vec<Room> = self.rooms.iter().map(|r| r.clone()).collect();
        all.sort_by_key(|r| r.id);
        let total = all.len() as u64;
        let page: Vec<Room> = all
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.limit as usize)
            .collect();
        Ok(PaginatedResult::new(page, total, pagination.page, pagination.limit))
    }

    async fn update(&self, room: Room) -> BookingResult<Room> {
        let mut entry = self.rooms.get_mut(&room.id).ok_or(BookingError::NotFound {
            entity: "Room",
            field: "id",
            value: room.id.to_string(),
        })?;
        let mut room = room;
        room.updated_at = Utc::now();
        *entry = room.clone();
        Ok(room)
    }

    async fn deactivate(&self, id: i32) -> BookingResult<()> {
        let mut entry = self.rooms.get_mut(&id).ok_or(BookingError::NotFound {
            entity: "Room",
            field: "id",
            value: id.to_string(),
        })?;
        entry.is_active = false;
        entry.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl ClientRepository for InMemoryStorage {
    async fn find_by_email(&self, email: &str) -> BookingResult<Option<Client>> {
        Ok(self
            .clients
            .iter()
            .find(|c| c.email_matches(email))
            .map(|c| c.clone()))
    }

    async fn find_by_id(&self, id: i32) -> BookingResult<Option<Client>> {
        Ok(self.clients.get(&id).map(|c| c.clone()))
    }

    async fn create(&self, profile: NewClient) -> BookingResult<Client> {
        if self.clients.iter().any(|c| c.email_matches(&profile.email)) {
            return Err(BookingError::InvalidInput(format!(
                "email {} is already registered",
                profile.email
            )));
        }
        let id = self.client_counter.fetch_add(1, Ordering::SeqCst);
        let client = Client {
            id,
            name: profile.name,
            email: profile.email,
            phone: profile.phone,
            is_verified: false,
            created_at: Utc::now(),
        };
        self.clients.insert(id, client.clone());
        Ok(client)
    }

    async fn list(&self, pagination: PaginationParams) -> BookingResult<PaginatedResult<Client>> {
        let mut all: Vec<Client> = self.clients.iter().map(|c| c.clone()).collect();
        all.sort_by_key(|c| c.id);
        let total = all.len() as u64;
        let page: Vec<Client> = all
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.limit as usize)
            .collect();
        Ok(PaginatedResult::new(page, total, pagination.page, pagination.limit))
    }
}

#[async_trait]
impl ReservationRepository for InMemoryStorage {
    async fn create_checked(&self, reservation: NewReservation) -> BookingResult<Reservation> {
        let _guard = self.commit_lock.lock().await;

        if let Some(room_id) =
            self.conflicting_room(&reservation.room_ids, &reservation.stay, None)
        {
            return Err(BookingError::RoomUnavailable { room_id });
        }

        let id = self.reservation_counter.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let reservation = Reservation {
            id,
            client_id: reservation.client_id,
            room_ids: reservation.room_ids,
            stay: reservation.stay,
            adults: reservation.adults,
            children: reservation.children,
            total_price: reservation.total_price,
            currency: reservation.currency,
            status: reservation.source.initial_status(),
            source: reservation.source,
            rejection_reason: None,
            feedback_given: false,
            invoice_ref: None,
            version: 1,
            created_at: now,
            updated_at: now,
        };
        self.reservations.insert(id, reservation.clone());
        Ok(reservation)
    }

    async fn find_by_id(&self, id: i32) -> BookingResult<Option<Reservation>> {
        Ok(self.reservations.get(&id).map(|r| r.clone()))
    }

    async fn find_overlapping(
        &self,
        stay: &StayRange,
        exclude: Option<i32>,
    ) -> BookingResult<Vec<Reservation>> {
        Ok(self.overlapping(stay, exclude))
    }

    async fn transition(
        &self,
        id: i32,
        expected_version: i32,
        new_status: ReservationStatus,
        reason: Option<String>,
    ) -> BookingResult<Reservation> {
        let _guard = self.commit_lock.lock().await;

        let mut entry = self
            .reservations
            .get_mut(&id)
            .ok_or(BookingError::NotFound {
                entity: "Reservation",
                field: "id",
                value: id.to_string(),
            })?;
        if entry.version != expected_version {
            return Err(BookingError::StaleVersion { id });
        }
        entry.status = new_status;
        if reason.is_some() {
            entry.rejection_reason = reason;
        }
        entry.version += 1;
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    async fn update_interval_checked(
        &self,
        id: i32,
        expected_version: i32,
        stay: StayRange,
        adults: u32,
        children: u32,
        total_price: Decimal,
    ) -> BookingResult<Reservation> {
        let _guard = self.commit_lock.lock().await;

        let room_ids = {
            let entry = self.reservations.get(&id).ok_or(BookingError::NotFound {
                entity: "Reservation",
                field: "id",
                value: id.to_string(),
            })?;
            if entry.version != expected_version {
                return Err(BookingError::StaleVersion { id });
            }
            entry.room_ids.clone()
        };

        // The reservation's own hold must not block its edit.
        if let Some(room_id) = self.conflicting_room(&room_ids, &stay, Some(id)) {
            return Err(BookingError::RoomUnavailable { room_id });
        }

        let mut entry = self
            .reservations
            .get_mut(&id)
            .ok_or(BookingError::NotFound {
                entity: "Reservation",
                field: "id",
                value: id.to_string(),
            })?;
        entry.stay = stay;
        entry.adults = adults;
        entry.children = children;
        entry.total_price = total_price;
        entry.version += 1;
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    async fn list(
        &self,
        pagination: PaginationParams,
        status: Option<ReservationStatus>,
    ) -> BookingResult<PaginatedResult<Reservation>> {
        let mut all: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|r| status.map_or(true, |s| r.status == s))
            .map(|r| r.clone())
            .collect();
        // Newest first; ids are monotonic here.
        all.sort_by_key(|r| std::cmp::Reverse(r.id));
        let total = all.len() as u64;
        let page: Vec<Reservation> = all
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.limit as usize)
            .collect();
        Ok(PaginatedResult::new(page, total, pagination.page, pagination.limit))
    }

    async fn find_for_client(&self, client_id: i32) -> BookingResult<Vec<Reservation>> {
        let mut mine: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|r| r.client_id == client_id)
            .map(|r| r.clone())
            .collect();
        mine.sort_by_key(|r| std::cmp::Reverse(r.id));
        Ok(mine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ReservationSource, RoomType, RoomView};

    fn stay(check_in: &str, check_out: &str) -> StayRange {
        StayRange::new(check_in.parse().unwrap(), check_out.parse().unwrap()).unwrap()
    }

    fn new_reservation(room_ids: Vec<i32>, range: StayRange) -> NewReservation {
        NewReservation {
            client_id: 1,
            room_ids,
            stay: range,
            adults: 2,
            children: 0,
            total_price: Decimal::new(33000, 2),
            currency: "USD".to_string(),
            source: ReservationSource::Online,
        }
    }

    async fn seeded() -> InMemoryStorage {
        let store = InMemoryStorage::new();
        for number in ["101", "102"] {
            RoomRepository::create(
                &store,
                NewRoom {
                    number: number.to_string(),
                    room_type: RoomType::Double,
                    floor: 1,
                    nightly_rate: Decimal::from(100),
                    max_guests: 2,
                    view: RoomView::City,
                    features: vec![],
                    is_featured: false,
                },
            )
            .await
            .unwrap();
        }
        ClientRepository::create(
            &store,
            NewClient {
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                phone: None,
            },
        )
        .await
        .unwrap();
        store
    }

    #[tokio::test]
    async fn ids_are_sequential_from_one() {
        let store = seeded().await;
        let first = store
            .create_checked(new_reservation(vec![1], stay("2026-05-01", "2026-05-03")))
            .await
            .unwrap();
        let second = store
            .create_checked(new_reservation(vec![2], stay("2026-05-01", "2026-05-03")))
            .await
            .unwrap();
        assert_eq!((first.id, second.id), (1, 2));
        assert_eq!(first.version, 1);
    }

    #[tokio::test]
    async fn create_checked_rejects_overlapping_hold() {
        let store = seeded().await;
        store
            .create_checked(new_reservation(vec![1], stay("2026-05-01", "2026-05-05")))
            .await
            .unwrap();
        let err = store
            .create_checked(new_reservation(vec![1], stay("2026-05-04", "2026-05-06")))
            .await
            .unwrap_err();
        assert_eq!(err, BookingError::RoomUnavailable { room_id: 1 });
    }

    #[tokio::test]
    async fn multi_room_reservation_holds_every_listed_room() {
        let store = seeded().await;
        let created = store
            .create_checked(new_reservation(vec![1, 2], stay("2026-05-01", "2026-05-05")))
            .await
            .unwrap();
        assert_eq!(created.room_ids, vec![1, 2]);

        // Either room alone is enough to collide.
        let err = store
            .create_checked(new_reservation(vec![2], stay("2026-05-04", "2026-05-06")))
            .await
            .unwrap_err();
        assert_eq!(err, BookingError::RoomUnavailable { room_id: 2 });
    }

    #[tokio::test]
    async fn transition_cas_rejects_stale_version() {
        let store = seeded().await;
        let created = store
            .create_checked(new_reservation(vec![1], stay("2026-05-01", "2026-05-03")))
            .await
            .unwrap();

        let confirmed = store
            .transition(created.id, created.version, ReservationStatus::Confirmed, None)
            .await
            .unwrap();
        assert_eq!(confirmed.version, created.version + 1);

        // Retrying with the old version loses.
        let err = store
            .transition(created.id, created.version, ReservationStatus::Canceled, None)
            .await
            .unwrap_err();
        assert_eq!(err, BookingError::StaleVersion { id: created.id });
    }

    #[tokio::test]
    async fn transition_records_reason() {
        let store = seeded().await;
        let created = store
            .create_checked(new_reservation(vec![1], stay("2026-05-01", "2026-05-03")))
            .await
            .unwrap();
        let rejected = store
            .transition(
                created.id,
                created.version,
                ReservationStatus::Canceled,
                Some("overbooked".to_string()),
            )
            .await
            .unwrap();
        assert_eq!(rejected.rejection_reason.as_deref(), Some("overbooked"));
    }

    #[tokio::test]
    async fn edit_ignores_own_hold_but_not_others() {
        let store = seeded().await;
        let mine = store
            .create_checked(new_reservation(vec![1], stay("2026-05-01", "2026-05-03")))
            .await
            .unwrap();
        store
            .create_checked(new_reservation(vec![1], stay("2026-05-10", "2026-05-12")))
            .await
            .unwrap();

        // Shifting within my own window is fine.
        let moved = store
            .update_interval_checked(
                mine.id,
                mine.version,
                stay("2026-05-02", "2026-05-04"),
                2,
                0,
                Decimal::new(22000, 2),
            )
            .await
            .unwrap();
        assert_eq!(moved.version, mine.version + 1);

        // Colliding with the other hold is not, and leaves the row untouched.
        let err = store
            .update_interval_checked(
                mine.id,
                moved.version,
                stay("2026-05-11", "2026-05-13"),
                2,
                0,
                Decimal::new(22000, 2),
            )
            .await
            .unwrap_err();
        assert_eq!(err, BookingError::RoomUnavailable { room_id: 1 });
        let reloaded = ReservationRepository::find_by_id(&store, mine.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.stay, stay("2026-05-02", "2026-05-04"));
        assert_eq!(reloaded.version, moved.version);
    }

    #[tokio::test]
    async fn canceled_holds_do_not_block() {
        let store = seeded().await;
        let created = store
            .create_checked(new_reservation(vec![1], stay("2026-05-01", "2026-05-03")))
            .await
            .unwrap();
        store
            .transition(created.id, created.version, ReservationStatus::Canceled, None)
            .await
            .unwrap();
        assert!(store
            .create_checked(new_reservation(vec![1], stay("2026-05-01", "2026-05-03")))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = seeded().await;
        let err = ClientRepository::create(
            &store,
            NewClient {
                name: "Other Ada".to_string(),
                email: "ADA@example.com".to_string(),
                phone: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, BookingError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn reservation_list_is_newest_first() {
        let store = seeded().await;
        store
            .create_checked(new_reservation(vec![1], stay("2026-05-01", "2026-05-03")))
            .await
            .unwrap();
        store
            .create_checked(new_reservation(vec![2], stay("2026-05-01", "2026-05-03")))
            .await
            .unwrap();
        let page = ReservationRepository::list(
            &store,
            PaginationParams { page: 1, limit: 10 },
            None,
        )
        .await
        .unwrap();
        assert_eq!(page.items.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 1]);
    }
}
