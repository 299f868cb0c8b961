//! Input validation helpers shared by services and handlers

use chrono::NaiveDate;

use super::types::errors::{BookingError, BookingResult};

pub fn validate_pagination(page: Option<u32>, limit: Option<u32>) -> (u32, u32) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(20).clamp(1, 100);
    (page, limit)
}

/// Checks the constraints every search and booking request must satisfy:
/// at least one night, at least one adult, check-in not in the past.
pub fn validate_stay_request(
    check_in: NaiveDate,
    check_out: NaiveDate,
    adults: u32,
    today: NaiveDate,
) -> BookingResult<()> {
    if check_in >= check_out {
        return Err(BookingError::InvalidInput(format!(
            "check-out {} must be after check-in {}",
            check_out, check_in
        )));
    }
    if adults == 0 {
        return Err(BookingError::InvalidInput(
            "at least one adult is required".to_string(),
        ));
    }
    if check_in < today {
        return Err(BookingError::InvalidInput(format!(
            "check-in {} is in the past",
            check_in
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn pagination_defaults_and_clamps() {
        assert_eq!(validate_pagination(None, None), (1, 20));
        assert_eq!(validate_pagination(Some(0), Some(500)), (1, 100));
        assert_eq!(validate_pagination(Some(3), Some(50)), (3, 50));
    }

    #[test]
    fn rejects_inverted_date_range() {
        let err = validate_stay_request(d("2026-05-05"), d("2026-05-01"), 2, d("2026-01-01"))
            .unwrap_err();
        assert!(matches!(err, BookingError::InvalidInput(_)));
    }

    #[test]
    fn rejects_same_day_range() {
        assert!(
            validate_stay_request(d("2026-05-05"), d("2026-05-05"), 2, d("2026-01-01")).is_err()
        );
    }

    #[test]
    fn rejects_zero_adults() {
        assert!(
            validate_stay_request(d("2026-05-01"), d("2026-05-05"), 0, d("2026-01-01")).is_err()
        );
    }

    #[test]
    fn rejects_past_check_in() {
        assert!(
            validate_stay_request(d("2026-05-01"), d("2026-05-05"), 1, d("2026-06-01")).is_err()
        );
    }

    #[test]
    fn accepts_check_in_today() {
        assert!(
            validate_stay_request(d("2026-05-01"), d("2026-05-02"), 1, d("2026-05-01")).is_ok()
        );
    }
}
