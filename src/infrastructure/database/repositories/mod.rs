//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories sharing a handful of conversion
//! helpers. Money crosses the boundary as i64 cents; the domain works in
//! `Decimal`.

pub mod client_repository;
pub mod reservation_repository;
pub mod room_repository;

pub use client_repository::SeaOrmClientRepository;
pub use reservation_repository::SeaOrmReservationRepository;
pub use room_repository::SeaOrmRoomRepository;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::domain::BookingError;

pub(crate) fn db_err(e: sea_orm::DbErr) -> BookingError {
    BookingError::Storage(format!("database error: {}", e))
}

/// Decimal amount to minor units, two fractional digits.
pub(crate) fn to_cents(amount: Decimal) -> Result<i64, BookingError> {
    (amount * Decimal::ONE_HUNDRED)
        .round()
        .to_i64()
        .ok_or_else(|| BookingError::Storage(format!("amount {} out of range", amount)))
}

pub(crate) fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cents_round_trip() {
        let amount = Decimal::new(33000, 2); // 330.00
        assert_eq!(to_cents(amount).unwrap(), 33000);
        assert_eq!(from_cents(33000), amount);
    }

    #[test]
    fn cents_round_to_nearest() {
        assert_eq!(to_cents(Decimal::new(123456, 3)).unwrap(), 12346); // 123.456
    }
}
