//! Client domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hotel guest / account holder
///
/// Email is the identifying attribute and is matched case-insensitively.
/// Once reservations reference a client its identity is immutable; profile
/// fields (name, phone) stay editable.
#[derive(Debug, Clone)]
pub struct Client {
    pub id: i32,
    pub name: String,
    /// Stored as given; compared case-insensitively
    pub email: String,
    pub phone: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl Client {
    pub fn email_matches(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }
}

/// Client profile captured during booking but not yet persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClient {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_match_ignores_case_and_whitespace() {
        let c = Client {
            id: 1,
            name: "Ada Lovelace".into(),
            email: "Ada@Example.com".into(),
            phone: None,
            is_verified: true,
            created_at: Utc::now(),
        };
        assert!(c.email_matches("ada@example.com"));
        assert!(c.email_matches("  ADA@EXAMPLE.COM "));
        assert!(!c.email_matches("other@example.com"));
    }
}
