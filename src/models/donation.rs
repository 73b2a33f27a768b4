use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Stored donation record. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: String,
    pub coin: String,
    pub network: String,
    pub address: String,
    #[serde(rename = "amountUSD")]
    pub amount_usd: f64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Donation submission as posted by the donation page
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDonationRequest {
    pub coin: Option<String>,
    pub network: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "amountUSD")]
    pub amount_usd: Option<f64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub occupation: Option<String>,
    pub employer: Option<String>,
    pub message: Option<String>,
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{} is required", field)))
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Donation {
    /// Validate a submission and stamp it with an id and creation time
    pub fn from_request(request: CreateDonationRequest) -> Result<Self> {
        let amount_usd = request
            .amount_usd
            .ok_or_else(|| AppError::Validation("amountUSD is required".to_string()))?;
        if !amount_usd.is_finite() || amount_usd <= 0.0 {
            return Err(AppError::Validation(
                "amountUSD must be a positive number".to_string(),
            ));
        }

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            coin: required(request.coin, "coin")?,
            network: required(request.network, "network")?,
            address: required(request.address, "address")?,
            amount_usd,
            first_name: required(request.first_name, "firstName")?,
            last_name: required(request.last_name, "lastName")?,
            email: required(request.email, "email")?,
            occupation: optional(request.occupation),
            employer: optional(request.employer),
            message: optional(request.message),
            created_at: Utc::now(),
        })
    }
}
