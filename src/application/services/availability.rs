//! Room availability search
//!
//! Read-only: searching never places a hold, so a race window exists between
//! search and commit. The commit path closes it by re-checking overlap inside
//! the transaction that writes the reservation (see
//! `ReservationRepository::create_checked`).

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::domain::{
    BookingResult, ReservationRepository, Room, RoomFilters, RoomRepository, RoomSort, StayRange,
};
use crate::shared::validations::validate_stay_request;

pub struct AvailabilityService {
    rooms: Arc<dyn RoomRepository>,
    reservations: Arc<dyn ReservationRepository>,
}

impl AvailabilityService {
    pub fn new(rooms: Arc<dyn RoomRepository>, reservations: Arc<dyn ReservationRepository>) -> Self {
        Self {
            rooms,
            reservations,
        }
    }

    /// Rooms with enough capacity, matching `filters`, and free of any
    /// non-terminal reservation overlapping `stay`. An empty result is a
    /// normal outcome, not an error.
    pub async fn find_available_rooms(
        &self,
        stay: &StayRange,
        adults: u32,
        children: u32,
        filters: &RoomFilters,
        sort: RoomSort,
    ) -> BookingResult<Vec<Room>> {
        self.find_available_rooms_at(stay, adults, children, filters, sort, Utc::now().date_naive())
            .await
    }

    /// Same as [`find_available_rooms`](Self::find_available_rooms) with an
    /// explicit "today" for the not-in-the-past rule.
    pub async fn find_available_rooms_at(
        &self,
        stay: &StayRange,
        adults: u32,
        children: u32,
        filters: &RoomFilters,
        sort: RoomSort,
        today: NaiveDate,
    ) -> BookingResult<Vec<Room>> {
        validate_stay_request(stay.check_in(), stay.check_out(), adults, today)?;
        let guests = adults + children;

        let busy = self.busy_room_ids(stay, None).await?;
        let mut result: Vec<Room> = self
            .rooms
            .find_active()
            .await?
            .into_iter()
            .filter(|r| r.fits(guests) && r.matches(filters) && !busy.contains(&r.id))
            .collect();

        sort_rooms(&mut result, sort);
        Ok(result)
    }

    /// Whether every room in `room_ids` is free for `stay`, optionally
    /// ignoring one reservation's own hold (the edit path).
    pub async fn rooms_free_for(
        &self,
        room_ids: &[i32],
        stay: &StayRange,
        exclude: Option<i32>,
    ) -> BookingResult<bool> {
        let busy = self.busy_room_ids(stay, exclude).await?;
        Ok(room_ids.iter().all(|id| !busy.contains(id)))
    }

    async fn busy_room_ids(
        &self,
        stay: &StayRange,
        exclude: Option<i32>,
    ) -> BookingResult<HashSet<i32>> {
        let overlapping = self.reservations.find_overlapping(stay, exclude).await?;
        Ok(overlapping
            .iter()
            .flat_map(|r| r.room_ids.iter().copied())
            .collect())
    }
}

/// Deterministic ordering: the requested key, then room id as tie-break.
fn sort_rooms(rooms: &mut [Room], sort: RoomSort) {
    match sort {
        RoomSort::PriceAsc => rooms.sort_by(|a, b| {
            a.nightly_rate
                .cmp(&b.nightly_rate)
                .then_with(|| a.id.cmp(&b.id))
        }),
        RoomSort::PriceDesc => rooms.sort_by(|a, b| {
            b.nightly_rate
                .cmp(&a.nightly_rate)
                .then_with(|| a.id.cmp(&b.id))
        }),
        RoomSort::Recommended => rooms.sort_by(|a, b| {
            b.is_featured
                .cmp(&a.is_featured)
                .then_with(|| a.nightly_rate.cmp(&b.nightly_rate))
                .then_with(|| a.id.cmp(&b.id))
        }),
    }
}
