//! SeaORM implementation of RoomRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use super::{db_err, from_cents, to_cents};
use crate::domain::{
    BookingError, BookingResult, NewRoom, Room, RoomRepository, RoomType, RoomView,
};
use crate::infrastructure::database::entities::room;
use crate::shared::{PaginatedResult, PaginationParams};

pub struct SeaOrmRoomRepository {
    db: DatabaseConnection,
}

impl SeaOrmRoomRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

pub(crate) fn model_to_domain(m: room::Model) -> BookingResult<Room> {
    let room_type = RoomType::parse(&m.room_type).ok_or_else(|| {
        BookingError::Storage(format!("room {} has unknown type {:?}", m.id, m.room_type))
    })?;
    let view = RoomView::parse(&m.view).ok_or_else(|| {
        BookingError::Storage(format!("room {} has unknown view {:?}", m.id, m.view))
    })?;
    let features: Vec<String> = serde_json::from_str(&m.features)
        .map_err(|e| BookingError::Storage(format!("room {} features: {}", m.id, e)))?;

    Ok(Room {
        id: m.id,
        number: m.number,
        room_type,
        floor: m.floor,
        nightly_rate: from_cents(m.nightly_rate_cents),
        max_guests: m.max_guests.max(0) as u32,
        view,
        features,
        is_featured: m.is_featured,
        is_active: m.is_active,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn features_json(features: &[String]) -> BookingResult<String> {
    serde_json::to_string(features)
        .map_err(|e| BookingError::Storage(format!("encoding room features: {}", e)))
}

// ── RoomRepository impl ─────────────────────────────────────────

#[async_trait]
impl RoomRepository for SeaOrmRoomRepository {
    async fn create(&self, new: NewRoom) -> BookingResult<Room> {
        let now = Utc::now();
        let model = room::ActiveModel {
            number: Set(new.number),
            room_type: Set(new.room_type.as_str().to_string()),
            floor: Set(new.floor),
            nightly_rate_cents: Set(to_cents(new.nightly_rate)?),
            max_guests: Set(new.max_guests as i32),
            view: Set(new.view.as_str().to_string()),
            features: Set(features_json(&new.features)?),
            is_featured: Set(new.is_featured),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let inserted = model.insert(&self.db).await.map_err(db_err)?;
        model_to_domain(inserted)
    }

    async fn find_by_id(&self, id: i32) -> BookingResult<Option<Room>> {
        let model = room::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn find_by_ids(&self, ids: &[i32]) -> BookingResult<Vec<Room>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = room::Entity::find()
            .filter(room::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(room::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn find_active(&self) -> BookingResult<Vec<Room>> {
        let models = room::Entity::find()
            .filter(room::Column::IsActive.eq(true))
            .order_by_asc(room::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn list(&self, pagination: PaginationParams) -> BookingResult<PaginatedResult<Room>> {
        let paginator = room::Entity::find()
            .order_by_asc(room::Column::Id)
            .paginate(&self.db, u64::from(pagination.limit.max(1)));
        let total = paginator.num_items().await.map_err(db_err)?;
        let models = paginator
            .fetch_page(u64::from(pagination.page.saturating_sub(1)))
            .await
            .map_err(db_err)?;
        let items: Vec<Room> = models
            .into_iter()
            .map(model_to_domain)
            .collect::<BookingResult<_>>()?;
        Ok(PaginatedResult::new(
            items,
            total,
            pagination.page,
            pagination.limit,
        ))
    }

    async fn update(&self, r: Room) -> BookingResult<Room> {
        let existing = room::Entity::find_by_id(r.id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(BookingError::NotFound {
                entity: "Room",
                field: "id",
                value: r.id.to_string(),
            })?;

        let mut model: room::ActiveModel = existing.into();
        model.number = Set(r.number);
        model.room_type = Set(r.room_type.as_str().to_string());
        model.floor = Set(r.floor);
        model.nightly_rate_cents = Set(to_cents(r.nightly_rate)?);
        model.max_guests = Set(r.max_guests as i32);
        model.view = Set(r.view.as_str().to_string());
        model.features = Set(features_json(&r.features)?);
        model.is_featured = Set(r.is_featured);
        model.is_active = Set(r.is_active);
        model.updated_at = Set(Utc::now());
        let updated = model.update(&self.db).await.map_err(db_err)?;
        model_to_domain(updated)
    }

    async fn deactivate(&self, id: i32) -> BookingResult<()> {
        let existing = room::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(BookingError::NotFound {
                entity: "Room",
                field: "id",
                value: id.to_string(),
            })?;

        let mut model: room::ActiveModel = existing.into();
        model.is_active = Set(false);
        model.updated_at = Set(Utc::now());
        model.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }
}
