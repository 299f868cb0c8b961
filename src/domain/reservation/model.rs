//! Reservation domain entity and lifecycle rules
//!
//! The transition table in [`Reservation::authorize_transition`] is the only
//! place lifecycle legality is decided; repositories and handlers never
//! compare status values themselves.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::shared::types::errors::{BookingError, BookingResult};

/// Half-open stay interval `[check_in, check_out)`
///
/// Construction enforces at least one night, so `nights()` is always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayRange {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayRange {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> BookingResult<Self> {
        if check_in >= check_out {
            return Err(BookingError::InvalidInput(format!(
                "check-out {} must be after check-in {}",
                check_out, check_in
            )));
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Half-open overlap test: `a.start < b.end && a.end > b.start`.
    /// Back-to-back stays (one checking out the day the other checks in)
    /// do not overlap.
    pub fn overlaps(&self, other: &StayRange) -> bool {
        self.check_in < other.check_out && self.check_out > other.check_in
    }

    /// First instant of the check-in day, used for lockout-window arithmetic.
    pub fn check_in_instant(&self) -> DateTime<Utc> {
        self.check_in
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always a valid time")
            .and_utc()
    }

    /// Whether `now` falls inside the window of `lockout` before check-in
    /// (or later).
    pub fn within_lockout(&self, now: DateTime<Utc>, lockout: Duration) -> bool {
        now + lockout > self.check_in_instant()
    }
}

impl std::fmt::Display for StayRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.check_in, self.check_out)
    }
}

/// Reservation lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    CheckedIn,
    CheckedOut,
    Completed,
    Canceled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::CheckedIn => "CHECKED_IN",
            Self::CheckedOut => "CHECKED_OUT",
            Self::Completed => "COMPLETED",
            Self::Canceled => "CANCELED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "CONFIRMED" => Some(Self::Confirmed),
            "CHECKED_IN" => Some(Self::CheckedIn),
            "CHECKED_OUT" => Some(Self::CheckedOut),
            "COMPLETED" => Some(Self::Completed),
            "CANCELED" => Some(Self::Canceled),
            _ => None,
        }
    }

    /// Terminal states release the inventory hold and accept no further
    /// transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Canceled)
    }

    /// A non-terminal reservation holds its rooms for its date range.
    pub fn holds_inventory(&self) -> bool {
        !self.is_terminal()
    }

    pub const ALL: [ReservationStatus; 6] = [
        Self::Pending,
        Self::Confirmed,
        Self::CheckedIn,
        Self::CheckedOut,
        Self::Completed,
        Self::Canceled,
    ];
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who is asking for a lifecycle change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    Admin,
    Agent,
    Client,
    System,
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Admin => "admin",
            Self::Agent => "agent",
            Self::Client => "client",
            Self::System => "system",
        };
        write!(f, "{}", s)
    }
}

/// How the booking entered the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationSource {
    /// Guest self-service; starts PENDING and awaits admin confirmation
    Online,
    /// Staff-assisted; starts CONFIRMED
    Agent,
}

impl ReservationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Agent => "agent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "online" => Some(Self::Online),
            "agent" => Some(Self::Agent),
            _ => None,
        }
    }

    pub fn initial_status(&self) -> ReservationStatus {
        match self {
            Self::Online => ReservationStatus::Pending,
            Self::Agent => ReservationStatus::Confirmed,
        }
    }
}

/// A booked stay
#[derive(Debug, Clone)]
pub struct Reservation {
    pub id: i32,
    pub client_id: i32,
    /// One or more rooms; guests may be split across them
    pub room_ids: Vec<i32>,
    pub stay: StayRange,
    pub adults: u32,
    pub children: u32,
    pub total_price: Decimal,
    /// ISO 4217 code
    pub currency: String,
    pub status: ReservationStatus,
    pub source: ReservationSource,
    /// Required when an admin rejects the reservation
    pub rejection_reason: Option<String>,
    pub feedback_given: bool,
    pub invoice_ref: Option<String>,
    /// Optimistic-lock counter; every transition and interval edit bumps it
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    pub fn guests(&self) -> u32 {
        self.adults + self.children
    }

    /// Whether this reservation still blocks its rooms for its date range.
    pub fn holds_inventory(&self) -> bool {
        self.status.holds_inventory()
    }

    /// Checks whether `requested` may be applied by `actor` right now.
    ///
    /// Check order keeps diagnostics truthful: the state table first
    /// (`InvalidTransition`), then the actor gate (`Forbidden`), then policy
    /// rules (`InvalidInput` for a missing rejection reason,
    /// `EditNotAllowed` for timing windows).
    pub fn authorize_transition(
        &self,
        requested: ReservationStatus,
        actor: Actor,
        reason: Option<&str>,
        now: DateTime<Utc>,
        cancellation_lockout: Duration,
    ) -> BookingResult<()> {
        use ReservationStatus::*;

        let illegal = || {
            Err(BookingError::InvalidTransition {
                from: self.status,
                requested,
            })
        };

        match (self.status, requested) {
            (Pending, Confirmed) => match actor {
                Actor::Admin => Ok(()),
                _ => Err(BookingError::Forbidden(format!(
                    "only an admin may confirm a reservation, not {}",
                    actor
                ))),
            },
            (Pending | Confirmed, Canceled) => match actor {
                // Admin reject path; only valid from PENDING and must carry
                // a reason.
                Actor::Admin => {
                    if self.status != Pending {
                        return illegal();
                    }
                    match reason {
                        Some(r) if !r.trim().is_empty() => Ok(()),
                        _ => Err(BookingError::InvalidInput(
                            "a rejection reason is required".to_string(),
                        )),
                    }
                }
                // Guest self-service cancel, gated by the lockout window.
                Actor::Client => {
                    if self.stay.within_lockout(now, cancellation_lockout) {
                        Err(BookingError::EditNotAllowed(format!(
                            "cancellation is locked within {} hours of check-in",
                            cancellation_lockout.num_hours()
                        )))
                    } else {
                        Ok(())
                    }
                }
                _ => Err(BookingError::Forbidden(format!(
                    "{} may not cancel a reservation",
                    actor
                ))),
            },
            (Confirmed, CheckedIn) => match actor {
                Actor::Agent => {
                    if now.date_naive() < self.stay.check_in() {
                        Err(BookingError::EditNotAllowed(format!(
                            "check-in opens on {}",
                            self.stay.check_in()
                        )))
                    } else {
                        Ok(())
                    }
                }
                _ => Err(BookingError::Forbidden(format!(
                    "only an agent may check guests in, not {}",
                    actor
                ))),
            },
            (CheckedIn, CheckedOut) => match actor {
                Actor::Agent => Ok(()),
                _ => Err(BookingError::Forbidden(format!(
                    "only an agent may check guests out, not {}",
                    actor
                ))),
            },
            (CheckedOut, Completed) => match actor {
                Actor::Agent | Actor::System => Ok(()),
                _ => Err(BookingError::Forbidden(format!(
                    "only an agent or the system may finalize, not {}",
                    actor
                ))),
            },
            _ => illegal(),
        }
    }

    /// Checks whether the stay interval / guest split may be edited now.
    /// Edits are only legal in PENDING or CONFIRMED and outside the lockout
    /// window, regardless of actor.
    pub fn authorize_edit(
        &self,
        now: DateTime<Utc>,
        cancellation_lockout: Duration,
    ) -> BookingResult<()> {
        use ReservationStatus::*;
        match self.status {
            Pending | Confirmed => {
                if self.stay.within_lockout(now, cancellation_lockout) {
                    Err(BookingError::EditNotAllowed(format!(
                        "edits are locked within {} hours of check-in",
                        cancellation_lockout.num_hours()
                    )))
                } else {
                    Ok(())
                }
            }
            CheckedIn | CheckedOut => Err(BookingError::EditNotAllowed(format!(
                "a {} reservation can no longer be edited",
                self.status
            ))),
            Completed | Canceled => Err(BookingError::EditNotAllowed(format!(
                "a {} reservation is terminal",
                self.status
            ))),
        }
    }
}

/// Data for creating a reservation at the orchestrator's commit step
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub client_id: i32,
    pub room_ids: Vec<i32>,
    pub stay: StayRange,
    pub adults: u32,
    pub children: u32,
    pub total_price: Decimal,
    pub currency: String,
    pub source: ReservationSource,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn ts(s: &str) -> DateTime<Utc> {
        format!("{}Z", s).parse().unwrap()
    }

    fn stay(check_in: &str, check_out: &str) -> StayRange {
        StayRange::new(d(check_in), d(check_out)).unwrap()
    }

    fn reservation(status: ReservationStatus) -> Reservation {
        Reservation {
            id: 1,
            client_id: 10,
            room_ids: vec![3],
            stay: stay("2026-05-10", "2026-05-13"),
            adults: 2,
            children: 0,
            total_price: Decimal::from_i64(396).unwrap(),
            currency: "USD".into(),
            status,
            source: ReservationSource::Online,
            rejection_reason: None,
            feedback_given: false,
            invoice_ref: None,
            version: 1,
            created_at: ts("2026-04-01T12:00:00"),
            updated_at: ts("2026-04-01T12:00:00"),
        }
    }

    fn lockout() -> Duration {
        Duration::hours(24)
    }

    // Well before the stay, outside any lockout window.
    fn early() -> DateTime<Utc> {
        ts("2026-04-20T10:00:00")
    }

    #[test]
    fn stay_range_rejects_zero_and_negative_nights() {
        assert!(StayRange::new(d("2026-05-10"), d("2026-05-10")).is_err());
        assert!(StayRange::new(d("2026-05-10"), d("2026-05-09")).is_err());
    }

    #[test]
    fn nights_is_calendar_day_count() {
        assert_eq!(stay("2026-05-10", "2026-05-11").nights(), 1);
        assert_eq!(stay("2026-05-10", "2026-05-13").nights(), 3);
    }

    #[test]
    fn half_open_overlap() {
        let a = stay("2026-05-01", "2026-05-05");
        assert!(a.overlaps(&stay("2026-05-03", "2026-05-07")));
        assert!(a.overlaps(&stay("2026-04-28", "2026-05-02")));
        assert!(a.overlaps(&stay("2026-05-02", "2026-05-03")));
        // Back-to-back stays share a date but not a night.
        assert!(!a.overlaps(&stay("2026-05-05", "2026-05-08")));
        assert!(!a.overlaps(&stay("2026-04-25", "2026-05-01")));
    }

    #[test]
    fn admin_confirms_pending() {
        let r = reservation(ReservationStatus::Pending);
        assert!(r
            .authorize_transition(ReservationStatus::Confirmed, Actor::Admin, None, early(), lockout())
            .is_ok());
    }

    #[test]
    fn agent_cannot_confirm() {
        let r = reservation(ReservationStatus::Pending);
        let err = r
            .authorize_transition(ReservationStatus::Confirmed, Actor::Agent, None, early(), lockout())
            .unwrap_err();
        assert!(matches!(err, BookingError::Forbidden(_)));
    }

    #[test]
    fn admin_reject_requires_reason() {
        let r = reservation(ReservationStatus::Pending);
        let err = r
            .authorize_transition(ReservationStatus::Canceled, Actor::Admin, None, early(), lockout())
            .unwrap_err();
        assert!(matches!(err, BookingError::InvalidInput(_)));

        let blank = r
            .authorize_transition(
                ReservationStatus::Canceled,
                Actor::Admin,
                Some("   "),
                early(),
                lockout(),
            )
            .unwrap_err();
        assert!(matches!(blank, BookingError::InvalidInput(_)));

        assert!(r
            .authorize_transition(
                ReservationStatus::Canceled,
                Actor::Admin,
                Some("no availability"),
                early(),
                lockout(),
            )
            .is_ok());
    }

    #[test]
    fn admin_cannot_cancel_confirmed() {
        let r = reservation(ReservationStatus::Confirmed);
        let err = r
            .authorize_transition(
                ReservationStatus::Canceled,
                Actor::Admin,
                Some("reason"),
                early(),
                lockout(),
            )
            .unwrap_err();
        assert!(matches!(err, BookingError::InvalidTransition { .. }));
    }

    #[test]
    fn client_cancels_outside_lockout() {
        for status in [ReservationStatus::Pending, ReservationStatus::Confirmed] {
            let r = reservation(status);
            assert!(r
                .authorize_transition(ReservationStatus::Canceled, Actor::Client, None, early(), lockout())
                .is_ok());
        }
    }

    #[test]
    fn client_cancel_blocked_inside_lockout() {
        // Check-in 2026-05-10 00:00; two hours before with a 24h lockout.
        let r = reservation(ReservationStatus::Confirmed);
        let err = r
            .authorize_transition(
                ReservationStatus::Canceled,
                Actor::Client,
                None,
                ts("2026-05-09T22:00:00"),
                lockout(),
            )
            .unwrap_err();
        assert!(matches!(err, BookingError::EditNotAllowed(_)));
    }

    #[test]
    fn check_in_only_on_or_after_check_in_date() {
        let r = reservation(ReservationStatus::Confirmed);
        let too_early = r
            .authorize_transition(
                ReservationStatus::CheckedIn,
                Actor::Agent,
                None,
                ts("2026-05-09T23:00:00"),
                lockout(),
            )
            .unwrap_err();
        assert!(matches!(too_early, BookingError::EditNotAllowed(_)));

        assert!(r
            .authorize_transition(
                ReservationStatus::CheckedIn,
                Actor::Agent,
                None,
                ts("2026-05-10T08:00:00"),
                lockout(),
            )
            .is_ok());
    }

    #[test]
    fn client_cannot_check_in() {
        let r = reservation(ReservationStatus::Confirmed);
        let err = r
            .authorize_transition(
                ReservationStatus::CheckedIn,
                Actor::Client,
                None,
                ts("2026-05-10T08:00:00"),
                lockout(),
            )
            .unwrap_err();
        assert!(matches!(err, BookingError::Forbidden(_)));
    }

    #[test]
    fn agent_checks_out_and_system_finalizes() {
        let r = reservation(ReservationStatus::CheckedIn);
        assert!(r
            .authorize_transition(
                ReservationStatus::CheckedOut,
                Actor::Agent,
                None,
                ts("2026-05-13T10:00:00"),
                lockout(),
            )
            .is_ok());

        let r = reservation(ReservationStatus::CheckedOut);
        for actor in [Actor::Agent, Actor::System] {
            assert!(r
                .authorize_transition(
                    ReservationStatus::Completed,
                    actor,
                    None,
                    ts("2026-05-13T12:00:00"),
                    lockout(),
                )
                .is_ok());
        }
    }

    #[test]
    fn every_unlisted_transition_is_invalid() {
        use ReservationStatus::*;
        // The complete legal table, ignoring actor and policy gates.
        let legal = [
            (Pending, Confirmed),
            (Pending, Canceled),
            (Confirmed, Canceled),
            (Confirmed, CheckedIn),
            (CheckedIn, CheckedOut),
            (CheckedOut, Completed),
        ];
        let now = ts("2026-05-10T08:00:00");
        for from in ReservationStatus::ALL {
            for requested in ReservationStatus::ALL {
                if legal.contains(&(from, requested)) {
                    continue;
                }
                let r = reservation(from);
                // Try every actor; none may unlock an unlisted transition.
                for actor in [Actor::Admin, Actor::Agent, Actor::Client, Actor::System] {
                    let err = r
                        .authorize_transition(requested, actor, Some("reason"), now, lockout())
                        .unwrap_err();
                    assert!(
                        matches!(err, BookingError::InvalidTransition { .. }),
                        "{from} -> {requested} by {actor} gave {err:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn terminal_states_have_no_exits() {
        for from in [ReservationStatus::Completed, ReservationStatus::Canceled] {
            assert!(from.is_terminal());
            assert!(!from.holds_inventory());
            let r = reservation(from);
            for requested in ReservationStatus::ALL {
                let err = r
                    .authorize_transition(
                        requested,
                        Actor::Admin,
                        Some("reason"),
                        early(),
                        lockout(),
                    )
                    .unwrap_err();
                assert!(matches!(err, BookingError::InvalidTransition { .. }));
            }
        }
    }

    #[test]
    fn edit_allowed_only_pending_or_confirmed_outside_lockout() {
        for status in [ReservationStatus::Pending, ReservationStatus::Confirmed] {
            assert!(reservation(status).authorize_edit(early(), lockout()).is_ok());
        }
        for status in [
            ReservationStatus::CheckedIn,
            ReservationStatus::CheckedOut,
            ReservationStatus::Completed,
            ReservationStatus::Canceled,
        ] {
            let err = reservation(status).authorize_edit(early(), lockout()).unwrap_err();
            assert!(matches!(err, BookingError::EditNotAllowed(_)));
        }

        let locked = reservation(ReservationStatus::Confirmed)
            .authorize_edit(ts("2026-05-09T22:00:00"), lockout())
            .unwrap_err();
        assert!(matches!(locked, BookingError::EditNotAllowed(_)));
    }

    #[test]
    fn status_roundtrip_is_strict() {
        for s in ReservationStatus::ALL {
            assert_eq!(ReservationStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(ReservationStatus::parse("pending"), None);
        assert_eq!(ReservationStatus::parse("UNKNOWN"), None);
    }

    #[test]
    fn source_determines_initial_status() {
        assert_eq!(
            ReservationSource::Online.initial_status(),
            ReservationStatus::Pending
        );
        assert_eq!(
            ReservationSource::Agent.initial_status(),
            ReservationStatus::Confirmed
        );
    }
}
