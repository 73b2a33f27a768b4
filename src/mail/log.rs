use async_trait::async_trait;

use super::EmailTransport;
use crate::error::Result;

/// Transport that only logs; used for local runs without a Resend key
#[derive(Clone, Default)]
pub struct LogTransport;

#[async_trait]
impl EmailTransport for LogTransport {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<String> {
        let id = format!("dry-run-{}", uuid::Uuid::new_v4());
        tracing::info!(
            to = %to,
            subject = %subject,
            bytes = html.len(),
            message_id = %id,
            "Dry run, email not sent"
        );
        Ok(id)
    }
}
