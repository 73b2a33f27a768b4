use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::EmailTransport;
use crate::config::Config;
use crate::error::{AppError, Result};

const RESEND_API_URL: &str = "https://api.resend.com/emails";

#[derive(Clone)]
pub struct ResendMailer {
    client: Client,
    api_key: String,
    from: String,
    endpoint: String,
}

#[derive(Serialize)]
struct Payload<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Deserialize)]
struct SendResponse {
    id: String,
}

impl ResendMailer {
    pub fn new(api_key: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            from: from.into(),
            endpoint: RESEND_API_URL.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config
            .resend_api_key
            .clone()
            .ok_or_else(|| AppError::NotConfigured("RESEND_API_KEY missing in env".to_string()))?;

        Ok(Self::new(api_key, config.mail_from.clone()))
    }

    /// Point the mailer at another Resend-compatible endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl EmailTransport for ResendMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<String> {
        let payload = Payload {
            from: &self.from,
            to: [to],
            subject,
            html,
        };

        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("Mail send failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(AppError::Transport(format!(
                "Resend API error {}: {}",
                status, body
            )));
        }

        let sent: SendResponse = res.json().await?;
        tracing::debug!(to = %to, message_id = %sent.id, "Email accepted by Resend");
        Ok(sent.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let payload = Payload {
            from: "Outreach <o@x.com>",
            to: ["a@x.com"],
            subject: "Hi",
            html: "<p>Hi</p>",
        };

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            serde_json::json!({
                "from": "Outreach <o@x.com>",
                "to": ["a@x.com"],
                "subject": "Hi",
                "html": "<p>Hi</p>"
            })
        );
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let mailer = ResendMailer::new("key", "o@x.com").with_endpoint("http://127.0.0.1:9/emails");

        let err = mailer.send("a@x.com", "Hi", "<p>Hi</p>").await.unwrap_err();
        assert!(matches!(err, AppError::Transport(_)));
    }
}
