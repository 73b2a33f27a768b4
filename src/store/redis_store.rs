use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_redis::Pool;
use redis::AsyncCommands;

use super::{CurrencyCatalog, DonationStore, Store, SuppressionStore};
use crate::error::{AppError, Result};
use crate::models::{ContactedEmail, Currency, Donation};

const CONTACTED_KEY: &str = "contacted_emails";
const DONATIONS_KEY: &str = "donations";
const DONATIONS_BY_TIME_KEY: &str = "donations:by_time";
const CURRENCIES_KEY: &str = "currencies";

/// Document store backed by Redis
#[derive(Clone)]
pub struct RedisStore {
    pool: Pool,
}

impl RedisStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SuppressionStore for RedisStore {
    async fn contacted_among(&self, addresses: &[String]) -> Result<HashSet<String>> {
        if addresses.is_empty() {
            return Ok(HashSet::new());
        }

        let mut conn = self.pool.get().await?;

        // HMGET keeps positional correspondence with the requested fields.
        let found: Vec<Option<String>> = redis::cmd("HMGET")
            .arg(CONTACTED_KEY)
            .arg(addresses)
            .query_async(&mut *conn)
            .await?;

        Ok(addresses
            .iter()
            .zip(found)
            .filter_map(|(address, record)| record.map(|_| address.clone()))
            .collect())
    }

    async fn record_contact(&self, address: &str, at: DateTime<Utc>) -> Result<()> {
        let mut conn = self.pool.get().await?;
        let record = ContactedEmail {
            address: address.to_string(),
            contacted_at: at,
        };
        let json = serde_json::to_string(&record)?;

        conn.hset::<_, _, _, ()>(CONTACTED_KEY, address, &json)
            .await?;

        tracing::debug!(address = %address, "Contact recorded");
        Ok(())
    }

    async fn get_contact(&self, address: &str) -> Result<Option<ContactedEmail>> {
        let mut conn = self.pool.get().await?;

        let json: Option<String> = conn.hget(CONTACTED_KEY, address).await?;

        match json {
            Some(data) => Ok(Some(serde_json::from_str(&data)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl DonationStore for RedisStore {
    async fn create_donation(&self, donation: &Donation) -> Result<()> {
        let mut conn = self.pool.get().await?;
        let json = serde_json::to_string(donation)?;

        // HSETNX so an id collision can never overwrite an existing record.
        let created: bool = conn.hset_nx(DONATIONS_KEY, &donation.id, &json).await?;
        if !created {
            return Err(AppError::Store(format!(
                "Donation {} already exists",
                donation.id
            )));
        }

        conn.zadd::<_, _, _, ()>(
            DONATIONS_BY_TIME_KEY,
            &donation.id,
            donation.created_at.timestamp_millis(),
        )
        .await?;

        tracing::info!(donation_id = %donation.id, coin = %donation.coin, "Donation stored");
        Ok(())
    }

    async fn list_donations(&self, limit: usize) -> Result<Vec<Donation>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut conn = self.pool.get().await?;

        let ids: Vec<String> = conn
            .zrevrange(DONATIONS_BY_TIME_KEY, 0, limit as isize - 1)
            .await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let found: Vec<Option<String>> = redis::cmd("HMGET")
            .arg(DONATIONS_KEY)
            .arg(&ids)
            .query_async(&mut *conn)
            .await?;

        let donations = found
            .into_iter()
            .flatten()
            .filter_map(|json| serde_json::from_str(&json).ok())
            .collect();

        Ok(donations)
    }
}

#[async_trait]
impl CurrencyCatalog for RedisStore {
    async fn list_currencies(&self) -> Result<Vec<Currency>> {
        let mut conn = self.pool.get().await?;

        let json: Option<String> = conn.get(CURRENCIES_KEY).await?;

        match json {
            Some(data) => Ok(serde_json::from_str(&data)?),
            None => Ok(Vec::new()),
        }
    }

    async fn seed_currencies(&self, catalog: &[Currency]) -> Result<bool> {
        let mut conn = self.pool.get().await?;
        let json = serde_json::to_string(catalog)?;

        let written: bool = conn.set_nx(CURRENCIES_KEY, &json).await?;
        Ok(written)
    }
}

#[async_trait]
impl Store for RedisStore {
    async fn health_check(&self) -> Result<bool> {
        let mut conn = self.pool.get().await?;

        let pong: String = redis::cmd("PING")
            .query_async(&mut *conn)
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        Ok(pong == "PONG")
    }
}
