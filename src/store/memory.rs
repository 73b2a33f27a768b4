//! In-process store with the same semantics as [`RedisStore`](super::RedisStore).
//! Data lives only as long as the process.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::RwLock;

use super::{CurrencyCatalog, DonationStore, Store, SuppressionStore};
use crate::error::{AppError, Result};
use crate::models::{ContactedEmail, Currency, Donation};

#[derive(Default)]
pub struct MemoryStore {
    contacted: DashMap<String, ContactedEmail>,
    donations: DashMap<String, Donation>,
    currencies: RwLock<Vec<Currency>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contacted_count(&self) -> usize {
        self.contacted.len()
    }
}

#[async_trait]
impl SuppressionStore for MemoryStore {
    async fn contacted_among(&self, addresses: &[String]) -> Result<HashSet<String>> {
        Ok(addresses
            .iter()
            .filter(|a| self.contacted.contains_key(a.as_str()))
            .cloned()
            .collect())
    }

    async fn record_contact(&self, address: &str, at: DateTime<Utc>) -> Result<()> {
        self.contacted.insert(
            address.to_string(),
            ContactedEmail {
                address: address.to_string(),
                contacted_at: at,
            },
        );
        Ok(())
    }

    async fn get_contact(&self, address: &str) -> Result<Option<ContactedEmail>> {
        Ok(self.contacted.get(address).map(|r| r.value().clone()))
    }
}

#[async_trait]
impl DonationStore for MemoryStore {
    async fn create_donation(&self, donation: &Donation) -> Result<()> {
        use dashmap::mapref::entry::Entry;

        match self.donations.entry(donation.id.clone()) {
            Entry::Occupied(_) => Err(AppError::Store(format!(
                "Donation {} already exists",
                donation.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(donation.clone());
                Ok(())
            }
        }
    }

    async fn list_donations(&self, limit: usize) -> Result<Vec<Donation>> {
        let mut all: Vec<Donation> = self.donations.iter().map(|r| r.value().clone()).collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all.truncate(limit);
        Ok(all)
    }
}

#[async_trait]
impl CurrencyCatalog for MemoryStore {
    async fn list_currencies(&self) -> Result<Vec<Currency>> {
        Ok(self.currencies.read().await.clone())
    }

    async fn seed_currencies(&self, catalog: &[Currency]) -> Result<bool> {
        let mut currencies = self.currencies.write().await;
        if !currencies.is_empty() {
            return Ok(false);
        }
        currencies.extend_from_slice(catalog);
        Ok(true)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{builtin_catalog, CreateDonationRequest};

    #[tokio::test]
    async fn test_record_contact_upserts_by_address() {
        let store = MemoryStore::new();
        let first = Utc::now();
        let later = first + Duration::minutes(5);

        store.record_contact("a@x.com", first).await.unwrap();
        store.record_contact("a@x.com", later).await.unwrap();

        assert_eq!(store.contacted_count(), 1);
        let record = store.get_contact("a@x.com").await.unwrap().unwrap();
        assert_eq!(record.contacted_at, later);
    }

    #[tokio::test]
    async fn test_contacted_among_returns_only_known() {
        let store = MemoryStore::new();
        store.record_contact("a@x.com", Utc::now()).await.unwrap();

        let found = store
            .contacted_among(&["a@x.com".to_string(), "b@x.com".to_string()])
            .await
            .unwrap();

        assert_eq!(found, HashSet::from(["a@x.com".to_string()]));
    }

    #[test]
    fn test_seed_only_when_empty() {
        let store = MemoryStore::new();
        let catalog = builtin_catalog();

        assert!(tokio_test::block_on(store.seed_currencies(&catalog)).unwrap());
        assert!(!tokio_test::block_on(store.seed_currencies(&catalog[..1])).unwrap());
        assert_eq!(
            tokio_test::block_on(store.list_currencies()).unwrap(),
            catalog
        );
    }

    #[tokio::test]
    async fn test_donations_listed_newest_first() {
        let store = MemoryStore::new();
        let request = || CreateDonationRequest {
            coin: Some("eth".into()),
            network: Some("erc20".into()),
            address: Some("0xabc".into()),
            amount_usd: Some(10.0),
            first_name: Some("Avery".into()),
            last_name: Some("Stone".into()),
            email: Some("avery@example.com".into()),
            ..Default::default()
        };

        let mut older = Donation::from_request(request()).unwrap();
        older.created_at = Utc::now() - Duration::hours(1);
        let newer = Donation::from_request(request()).unwrap();

        store.create_donation(&older).await.unwrap();
        store.create_donation(&newer).await.unwrap();
        assert!(store.create_donation(&newer).await.is_err());

        let listed = store.list_donations(10).await.unwrap();
        assert_eq!(listed, vec![newer, older]);
        assert_eq!(store.list_donations(1).await.unwrap().len(), 1);
    }
}
