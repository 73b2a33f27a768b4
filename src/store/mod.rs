pub mod memory;
pub mod redis_store;

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_redis::{Config as RedisConfig, Pool, Runtime};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{ContactedEmail, Currency, Donation};

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

/// Addresses that have already received outreach
#[async_trait]
pub trait SuppressionStore: Send + Sync {
    /// Return the subset of `addresses` that has a contact record
    async fn contacted_among(&self, addresses: &[String]) -> Result<HashSet<String>>;

    /// Upsert the contact record for `address`
    async fn record_contact(&self, address: &str, at: DateTime<Utc>) -> Result<()>;

    async fn get_contact(&self, address: &str) -> Result<Option<ContactedEmail>>;
}

#[async_trait]
pub trait DonationStore: Send + Sync {
    async fn create_donation(&self, donation: &Donation) -> Result<()>;

    /// Most recent donations first
    async fn list_donations(&self, limit: usize) -> Result<Vec<Donation>>;
}

#[async_trait]
pub trait CurrencyCatalog: Send + Sync {
    async fn list_currencies(&self) -> Result<Vec<Currency>>;

    /// Insert `catalog` only if no catalog is stored yet. Returns whether it was written.
    async fn seed_currencies(&self, catalog: &[Currency]) -> Result<bool>;
}

/// Everything the HTTP layer needs from the document store
#[async_trait]
pub trait Store: SuppressionStore + DonationStore + CurrencyCatalog {
    async fn health_check(&self) -> Result<bool>;
}

/// Create a Redis connection pool
pub fn create_pool(config: &Config) -> Result<Pool> {
    let redis_config = RedisConfig::from_url(&config.redis_url);
    let pool = redis_config
        .create_pool(Some(Runtime::Tokio1))
        .map_err(|e| AppError::Store(format!("Failed to create Redis pool: {}", e)))?;

    Ok(pool)
}
