//! Room repository interface

use async_trait::async_trait;

use super::model::{NewRoom, Room};
use crate::shared::types::errors::BookingResult;
use crate::shared::types::pagination::{PaginatedResult, PaginationParams};

#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Register a new room
    async fn create(&self, room: NewRoom) -> BookingResult<Room>;

    /// Find room by ID
    async fn find_by_id(&self, id: i32) -> BookingResult<Option<Room>>;

    /// Find several rooms at once; missing ids are simply absent
    async fn find_by_ids(&self, ids: &[i32]) -> BookingResult<Vec<Room>>;

    /// All active (not soft-disabled) rooms
    async fn find_active(&self) -> BookingResult<Vec<Room>>;

    /// Paginated listing for staff inventory screens
    async fn list(&self, pagination: PaginationParams) -> BookingResult<PaginatedResult<Room>>;

    /// Update mutable room fields
    async fn update(&self, room: Room) -> BookingResult<Room>;

    /// Soft-disable a room; active reservations keep referencing it
    async fn deactivate(&self, id: i32) -> BookingResult<()>;
}
