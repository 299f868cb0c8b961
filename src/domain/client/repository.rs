//! Client repository interface

use async_trait::async_trait;

use super::model::{Client, NewClient};
use crate::shared::types::errors::BookingResult;
use crate::shared::types::pagination::{PaginatedResult, PaginationParams};

#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Case-insensitive exact match on email
    async fn find_by_email(&self, email: &str) -> BookingResult<Option<Client>>;

    /// Find client by ID
    async fn find_by_id(&self, id: i32) -> BookingResult<Option<Client>>;

    /// Persist a staged client. Fails with a conflict if the email is taken.
    async fn create(&self, profile: NewClient) -> BookingResult<Client>;

    /// Paginated listing for staff screens
    async fn list(&self, pagination: PaginationParams) -> BookingResult<PaginatedResult<Client>>;
}
