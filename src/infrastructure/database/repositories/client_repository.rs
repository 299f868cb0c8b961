//! SeaORM implementation of ClientRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use super::db_err;
use crate::domain::{BookingError, BookingResult, Client, ClientRepository, NewClient};
use crate::infrastructure::database::entities::client;
use crate::shared::{PaginatedResult, PaginationParams};

pub struct SeaOrmClientRepository {
    db: DatabaseConnection,
}

impl SeaOrmClientRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: client::Model) -> Client {
    Client {
        id: m.id,
        name: m.name,
        email: m.email,
        phone: m.phone,
        is_verified: m.is_verified,
        created_at: m.created_at,
    }
}

#[async_trait]
impl ClientRepository for SeaOrmClientRepository {
    async fn find_by_email(&self, email: &str) -> BookingResult<Option<Client>> {
        // Emails are stored lowercased on insert.
        let needle = email.trim().to_ascii_lowercase();
        let model = client::Entity::find()
            .filter(client::Column::Email.eq(needle))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_id(&self, id: i32) -> BookingResult<Option<Client>> {
        let model = client::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn create(&self, profile: NewClient) -> BookingResult<Client> {
        let email = profile.email.trim().to_ascii_lowercase();
        if self.find_by_email(&email).await?.is_some() {
            return Err(BookingError::InvalidInput(format!(
                "email {} is already registered",
                email
            )));
        }
        let model = client::ActiveModel {
            name: Set(profile.name),
            email: Set(email),
            phone: Set(profile.phone),
            is_verified: Set(false),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        let inserted = model.insert(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(inserted))
    }

    async fn list(&self, pagination: PaginationParams) -> BookingResult<PaginatedResult<Client>> {
        let paginator = client::Entity::find()
            .order_by_asc(client::Column::Id)
            .paginate(&self.db, u64::from(pagination.limit.max(1)));
        let total = paginator.num_items().await.map_err(db_err)?;
        let models = paginator
            .fetch_page(u64::from(pagination.page.saturating_sub(1)))
            .await
            .map_err(db_err)?;
        Ok(PaginatedResult::new(
            models.into_iter().map(model_to_domain).collect(),
            total,
            pagination.page,
            pagination.limit,
        ))
    }
}
