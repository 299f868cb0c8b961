//! Stay pricing
//!
//! Pure arithmetic: nights, nightly subtotal, tax, total. All intermediate
//! values stay exact `Decimal`s; rounding (half-up, 2 dp) happens once when
//! the total is produced, so repeated pricing of the same inputs can never
//! drift.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::domain::{Room, StayRange};

/// Billable night count. Whole-day arithmetic; a degenerate same-day pair is
/// floored up to one night, matching hospitality billing convention.
pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    (check_out - check_in).num_days().max(1)
}

/// Price breakdown for one room over one stay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayQuote {
    pub nights: i64,
    pub nightly_rate: Decimal,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub currency: String,
}

/// Transient cart line built during the booking workflow; discarded unless
/// the workflow commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingCartItem {
    pub room_id: i32,
    pub stay: StayRange,
    pub adults: u32,
    pub children: u32,
    pub quote: StayQuote,
}

/// Computes quotes under a configured tax policy
#[derive(Debug, Clone)]
pub struct PricingCalculator {
    tax_rate: Decimal,
    currency: String,
}

impl PricingCalculator {
    pub fn new(tax_rate: Decimal, currency: impl Into<String>) -> Self {
        Self {
            tax_rate,
            currency: currency.into(),
        }
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Quote a stay at the given nightly rate.
    pub fn quote(&self, nightly_rate: Decimal, stay: &StayRange) -> StayQuote {
        let nights = nights_between(stay.check_in(), stay.check_out());
        let subtotal = nightly_rate * Decimal::from(nights);
        let tax = subtotal * self.tax_rate;
        let total =
            (subtotal + tax).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        StayQuote {
            nights,
            nightly_rate,
            subtotal,
            tax,
            total,
            currency: self.currency.clone(),
        }
    }

    /// Quote one room for one stay.
    pub fn price_room(&self, room: &Room, stay: &StayRange) -> StayQuote {
        self.quote(room.nightly_rate, stay)
    }

    /// Build a cart line for a selected room.
    pub fn cart_item(
        &self,
        room: &Room,
        stay: &StayRange,
        adults: u32,
        children: u32,
    ) -> BookingCartItem {
        BookingCartItem {
            room_id: room.id,
            stay: *stay,
            adults,
            children,
            quote: self.price_room(room, stay),
        }
    }

    /// Multi-room carts: each item priced independently, totals summed.
    pub fn cart_total(&self, items: &[BookingCartItem]) -> Decimal {
        items.iter().map(|i| i.quote.total).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::prelude::FromPrimitive;

    use crate::domain::{RoomType, RoomView};

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn stay(check_in: &str, check_out: &str) -> StayRange {
        StayRange::new(d(check_in), d(check_out)).unwrap()
    }

    fn calculator() -> PricingCalculator {
        PricingCalculator::new(Decimal::new(10, 2), "USD")
    }

    fn room(rate: i64) -> Room {
        Room {
            id: 7,
            number: "301".into(),
            room_type: RoomType::Double,
            floor: 3,
            nightly_rate: Decimal::from_i64(rate).unwrap(),
            max_guests: 3,
            view: RoomView::Garden,
            features: vec![],
            is_featured: false,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn nights_floors_same_day_to_one() {
        assert_eq!(nights_between(d("2026-05-10"), d("2026-05-10")), 1);
        assert_eq!(nights_between(d("2026-05-10"), d("2026-05-11")), 1);
        assert_eq!(nights_between(d("2026-05-10"), d("2026-05-17")), 7);
    }

    #[test]
    fn three_nights_at_100_with_10_percent_tax() {
        let q = calculator().price_room(&room(100), &stay("2026-05-01", "2026-05-04"));
        assert_eq!(q.nights, 3);
        assert_eq!(q.subtotal, Decimal::from_i64(300).unwrap());
        assert_eq!(q.tax, Decimal::from_i64(30).unwrap());
        assert_eq!(q.total, Decimal::new(33000, 2)); // 330.00
        assert_eq!(q.currency, "USD");
    }

    #[test]
    fn total_is_exactly_subtotal_plus_tax() {
        let q = calculator().quote(Decimal::new(9999, 2), &stay("2026-05-01", "2026-05-06"));
        assert_eq!(
            q.total,
            (q.subtotal + q.tax).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        );
    }

    #[test]
    fn rounding_is_half_up_and_applied_once() {
        // 1 night at 33.33 with 8.5% tax: 33.33 * 1.085 = 36.16305 -> 36.16
        let calc = PricingCalculator::new(Decimal::new(85, 3), "USD");
        let q = calc.quote(Decimal::new(3333, 2), &stay("2026-05-01", "2026-05-02"));
        assert_eq!(q.total, Decimal::new(3616, 2));
        // Intermediates stay exact.
        assert_eq!(q.subtotal, Decimal::new(3333, 2));
        assert_eq!(q.tax, Decimal::new(3333, 2) * Decimal::new(85, 3));
    }

    #[test]
    fn pricing_is_pure_and_idempotent() {
        let calc = calculator();
        let s = stay("2026-05-01", "2026-05-04");
        let first = calc.quote(Decimal::new(12345, 2), &s);
        for _ in 0..10 {
            assert_eq!(calc.quote(Decimal::new(12345, 2), &s), first);
        }
    }

    #[test]
    fn cart_total_sums_item_totals() {
        let calc = calculator();
        let s = stay("2026-05-01", "2026-05-04");
        let items = vec![
            calc.cart_item(&room(100), &s, 2, 0),
            calc.cart_item(&room(250), &s, 2, 1),
        ];
        let expected = items[0].quote.total + items[1].quote.total;
        assert_eq!(calc.cart_total(&items), expected);
    }

    #[test]
    fn empty_cart_totals_zero() {
        assert_eq!(calculator().cart_total(&[]), Decimal::ZERO);
    }
}
