//! SeaORM implementation of ReservationRepository
//!
//! The `*_checked` operations run their availability re-check and their
//! write inside one transaction, so a booking that passed search cannot
//! slip past a concurrent commit. Status changes use an optimistic version
//! filter in the UPDATE itself; zero rows affected means the row moved
//! under us.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::debug;

use super::{db_err, from_cents, to_cents};
use crate::domain::{
    BookingError, BookingResult, NewReservation, Reservation, ReservationRepository,
    ReservationSource, ReservationStatus, StayRange,
};
use crate::infrastructure::database::entities::{reservation, reservation_room};
use crate::shared::{PaginatedResult, PaginationParams};

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: reservation::Model, room_ids: Vec<i32>) -> BookingResult<Reservation> {
    let status = ReservationStatus::parse(&m.status).ok_or_else(|| {
        BookingError::Storage(format!(
            "reservation {} has unknown status {:?}",
            m.id, m.status
        ))
    })?;
    let source = ReservationSource::parse(&m.source).ok_or_else(|| {
        BookingError::Storage(format!(
            "reservation {} has unknown source {:?}",
            m.id, m.source
        ))
    })?;
    let stay = StayRange::new(m.check_in, m.check_out).map_err(|_| {
        BookingError::Storage(format!(
            "reservation {} has inverted interval {}..{}",
            m.id, m.check_in, m.check_out
        ))
    })?;

    Ok(Reservation {
        id: m.id,
        client_id: m.client_id,
        room_ids,
        stay,
        adults: m.adults.max(0) as u32,
        children: m.children.max(0) as u32,
        total_price: from_cents(m.total_price_cents),
        currency: m.currency,
        status,
        source,
        rejection_reason: m.rejection_reason,
        feedback_given: m.feedback_given,
        invoice_ref: m.invoice_ref,
        version: m.version,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

async fn room_ids_for<C: ConnectionTrait>(conn: &C, reservation_id: i32) -> BookingResult<Vec<i32>> {
    let links = reservation_room::Entity::find()
        .filter(reservation_room::Column::ReservationId.eq(reservation_id))
        .order_by_asc(reservation_room::Column::RoomId)
        .all(conn)
        .await
        .map_err(db_err)?;
    Ok(links.into_iter().map(|l| l.room_id).collect())
}

async fn hydrate<C: ConnectionTrait>(
    conn: &C,
    model: reservation::Model,
) -> BookingResult<Reservation> {
    let room_ids = room_ids_for(conn, model.id).await?;
    model_to_domain(model, room_ids)
}

fn terminal_statuses() -> [&'static str; 2] {
    [
        ReservationStatus::Completed.as_str(),
        ReservationStatus::Canceled.as_str(),
    ]
}

/// Non-terminal reservations whose half-open interval overlaps `stay`.
async fn overlapping_models<C: ConnectionTrait>(
    conn: &C,
    stay: &StayRange,
    exclude: Option<i32>,
) -> BookingResult<Vec<reservation::Model>> {
    let mut query = reservation::Entity::find()
        .filter(reservation::Column::Status.is_not_in(terminal_statuses()))
        .filter(reservation::Column::CheckIn.lt(stay.check_out()))
        .filter(reservation::Column::CheckOut.gt(stay.check_in()))
        .order_by_asc(reservation::Column::Id);
    if let Some(id) = exclude {
        query = query.filter(reservation::Column::Id.ne(id));
    }
    query.all(conn).await.map_err(db_err)
}

/// First requested room already held for an overlapping interval, if any.
async fn conflicting_room<C: ConnectionTrait>(
    conn: &C,
    room_ids: &[i32],
    stay: &StayRange,
    exclude: Option<i32>,
) -> BookingResult<Option<i32>> {
    let holds = overlapping_models(conn, stay, exclude).await?;
    if holds.is_empty() {
        return Ok(None);
    }
    let held_ids: Vec<i32> = holds.iter().map(|m| m.id).collect();
    let links = reservation_room::Entity::find()
        .filter(reservation_room::Column::ReservationId.is_in(held_ids))
        .all(conn)
        .await
        .map_err(db_err)?;
    Ok(room_ids
        .iter()
        .find(|id| links.iter().any(|l| l.room_id == **id))
        .copied())
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn create_checked(&self, new: NewReservation) -> BookingResult<Reservation> {
        let txn = self.db.begin().await.map_err(db_err)?;

        if let Some(room_id) = conflicting_room(&txn, &new.room_ids, &new.stay, None).await? {
            return Err(BookingError::RoomUnavailable { room_id });
        }

        let now = Utc::now();
        let model = reservation::ActiveModel {
            client_id: Set(new.client_id),
            check_in: Set(new.stay.check_in()),
            check_out: Set(new.stay.check_out()),
            adults: Set(new.adults as i32),
            children: Set(new.children as i32),
            total_price_cents: Set(to_cents(new.total_price)?),
            currency: Set(new.currency),
            status: Set(new.source.initial_status().as_str().to_string()),
            source: Set(new.source.as_str().to_string()),
            rejection_reason: Set(None),
            feedback_given: Set(false),
            invoice_ref: Set(None),
            version: Set(1),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let inserted = model.insert(&txn).await.map_err(db_err)?;

        for room_id in &new.room_ids {
            reservation_room::ActiveModel {
                reservation_id: Set(inserted.id),
                room_id: Set(*room_id),
            }
            .insert(&txn)
            .await
            .map_err(db_err)?;
        }

        let reservation = model_to_domain(inserted, new.room_ids)?;
        txn.commit().await.map_err(db_err)?;
        debug!(reservation_id = reservation.id, "reservation persisted");
        Ok(reservation)
    }

    async fn find_by_id(&self, id: i32) -> BookingResult<Option<Reservation>> {
        let model = reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        match model {
            Some(m) => Ok(Some(hydrate(&self.db, m).await?)),
            None => Ok(None),
        }
    }

    async fn find_overlapping(
        &self,
        stay: &StayRange,
        exclude: Option<i32>,
    ) -> BookingResult<Vec<Reservation>> {
        let models = overlapping_models(&self.db, stay, exclude).await?;
        let mut out = Vec::with_capacity(models.len());
        for m in models {
            out.push(hydrate(&self.db, m).await?);
        }
        Ok(out)
    }

    async fn transition(
        &self,
        id: i32,
        expected_version: i32,
        new_status: ReservationStatus,
        reason: Option<String>,
    ) -> BookingResult<Reservation> {
        let exists = reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .is_some();
        if !exists {
            return Err(BookingError::NotFound {
                entity: "Reservation",
                field: "id",
                value: id.to_string(),
            });
        }

        // Version-guarded UPDATE; a lost race affects zero rows.
        let mut update = reservation::Entity::update_many()
            .col_expr(
                reservation::Column::Status,
                Expr::value(new_status.as_str()),
            )
            .col_expr(
                reservation::Column::Version,
                Expr::col(reservation::Column::Version).add(1),
            )
            .col_expr(reservation::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(reservation::Column::Id.eq(id))
            .filter(reservation::Column::Version.eq(expected_version));
        if let Some(reason) = reason {
            update = update.col_expr(
                reservation::Column::RejectionReason,
                Expr::value(Some(reason)),
            );
        }
        let result = update.exec(&self.db).await.map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(BookingError::StaleVersion { id });
        }

        let model = reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(BookingError::NotFound {
                entity: "Reservation",
                field: "id",
                value: id.to_string(),
            })?;
        hydrate(&self.db, model).await
    }

    async fn update_interval_checked(
        &self,
        id: i32,
        expected_version: i32,
        stay: StayRange,
        adults: u32,
        children: u32,
        total_price: rust_decimal::Decimal,
    ) -> BookingResult<Reservation> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let current = reservation::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(BookingError::NotFound {
                entity: "Reservation",
                field: "id",
                value: id.to_string(),
            })?;
        if current.version != expected_version {
            return Err(BookingError::StaleVersion { id });
        }

        let room_ids = room_ids_for(&txn, id).await?;
        // The reservation's own hold must not block its edit.
        if let Some(room_id) = conflicting_room(&txn, &room_ids, &stay, Some(id)).await? {
            return Err(BookingError::RoomUnavailable { room_id });
        }

        let mut model: reservation::ActiveModel = current.into();
        model.check_in = Set(stay.check_in());
        model.check_out = Set(stay.check_out());
        model.adults = Set(adults as i32);
        model.children = Set(children as i32);
        model.total_price_cents = Set(to_cents(total_price)?);
        model.version = Set(expected_version + 1);
        model.updated_at = Set(Utc::now());
        let updated = model.update(&txn).await.map_err(db_err)?;

        let reservation = model_to_domain(updated, room_ids)?;
        txn.commit().await.map_err(db_err)?;
        Ok(reservation)
    }

    async fn list(
        &self,
        pagination: PaginationParams,
        status: Option<ReservationStatus>,
    ) -> BookingResult<PaginatedResult<Reservation>> {
        let mut query = reservation::Entity::find().order_by_desc(reservation::Column::Id);
        if let Some(status) = status {
            query = query.filter(reservation::Column::Status.eq(status.as_str()));
        }
        let paginator = query.paginate(&self.db, u64::from(pagination.limit.max(1)));
        let total = paginator.num_items().await.map_err(db_err)?;
        let models = paginator
            .fetch_page(u64::from(pagination.page.saturating_sub(1)))
            .await
            .map_err(db_err)?;
        let mut items = Vec::with_capacity(models.len());
        for m in models {
            items.push(hydrate(&self.db, m).await?);
        }
        Ok(PaginatedResult::new(
            items,
            total,
            pagination.page,
            pagination.limit,
        ))
    }

    async fn find_for_client(&self, client_id: i32) -> BookingResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::ClientId.eq(client_id))
            .order_by_desc(reservation::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        let mut out = Vec::with_capacity(models.len());
        for m in models {
            out.push(hydrate(&self.db, m).await?);
        }
        Ok(out)
    }
}
