//! Client resolution for booking workflows
//!
//! A booking needs a client record, but searching must never create one:
//! resolution returns either the existing identity or a staged profile whose
//! persistence is deferred to the orchestrator's commit step.

use std::sync::Arc;

use validator::ValidateEmail;

use crate::domain::{BookingError, BookingResult, Client, ClientRepository, NewClient};

/// Outcome of resolving an email against the client registry
#[derive(Debug, Clone)]
pub enum ResolvedClient {
    /// Known client; the stored identity wins over any supplied profile
    Existing(Client),
    /// Unknown email; profile staged for creation at commit time
    Staged(NewClient),
}

impl ResolvedClient {
    pub fn is_staged(&self) -> bool {
        matches!(self, Self::Staged(_))
    }
}

/// Candidate profile supplied alongside an email during booking
#[derive(Debug, Clone, Default)]
pub struct CandidateProfile {
    pub name: Option<String>,
    pub phone: Option<String>,
}

pub struct ClientResolver {
    clients: Arc<dyn ClientRepository>,
}

impl ClientResolver {
    pub fn new(clients: Arc<dyn ClientRepository>) -> Self {
        Self { clients }
    }

    /// Case-insensitive exact lookup by email. When found, the existing
    /// client is returned as-is and any conflicting candidate fields are
    /// ignored. When not found, a staged record is returned; it requires at
    /// least a name next to the email.
    pub async fn resolve(
        &self,
        email: &str,
        candidate: &CandidateProfile,
    ) -> BookingResult<ResolvedClient> {
        let email = email.trim();
        if !email.validate_email() {
            return Err(BookingError::InvalidInput(format!(
                "'{}' is not a valid email address",
                email
            )));
        }

        if let Some(existing) = self.clients.find_by_email(email).await? {
            return Ok(ResolvedClient::Existing(existing));
        }

        let name = candidate
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| {
                BookingError::InvalidInput(
                    "a name is required to register a new client".to_string(),
                )
            })?;

        Ok(ResolvedClient::Staged(NewClient {
            name: name.to_string(),
            email: email.to_string(),
            phone: candidate.phone.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryStorage;

    async fn resolver_with_ada() -> (Arc<InMemoryStorage>, ClientResolver) {
        let store = Arc::new(InMemoryStorage::new());
        store
            .create(NewClient {
                name: "Ada Lovelace".into(),
                email: "ada@example.com".into(),
                phone: Some("+44 20 7946 0000".into()),
            })
            .await
            .unwrap();
        let resolver = ClientResolver::new(store.clone());
        (store, resolver)
    }

    #[tokio::test]
    async fn existing_client_wins_over_candidate_profile() {
        let (_store, resolver) = resolver_with_ada().await;
        let candidate = CandidateProfile {
            name: Some("Someone Else".into()),
            phone: Some("+1 555 0100".into()),
        };
        match resolver.resolve("ada@example.com", &candidate).await.unwrap() {
            ResolvedClient::Existing(c) => {
                assert_eq!(c.name, "Ada Lovelace");
                assert_eq!(c.phone.as_deref(), Some("+44 20 7946 0000"));
            }
            other => panic!("expected existing client, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn lookup_is_case_insensitive() {
        let (_store, resolver) = resolver_with_ada().await;
        let resolved = resolver
            .resolve("ADA@Example.COM", &CandidateProfile::default())
            .await
            .unwrap();
        assert!(!resolved.is_staged());
    }

    #[tokio::test]
    async fn unknown_email_stages_a_new_client() {
        let (_store, resolver) = resolver_with_ada().await;
        let candidate = CandidateProfile {
            name: Some("  Grace Hopper  ".into()),
            phone: None,
        };
        match resolver.resolve("grace@example.com", &candidate).await.unwrap() {
            ResolvedClient::Staged(staged) => {
                assert_eq!(staged.name, "Grace Hopper");
                assert_eq!(staged.email, "grace@example.com");
            }
            other => panic!("expected staged client, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn staging_requires_a_name() {
        let (store, resolver) = resolver_with_ada().await;
        let err = resolver
            .resolve("grace@example.com", &CandidateProfile::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::InvalidInput(_)));

        // Resolution alone must not have created anything.
        assert!(store.find_by_email("grace@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn invalid_email_is_rejected() {
        let (_store, resolver) = resolver_with_ada().await;
        let err = resolver
            .resolve("not-an-email", &CandidateProfile::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::InvalidInput(_)));
    }
}
