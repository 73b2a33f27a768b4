pub mod log;
pub mod resend;

use async_trait::async_trait;

use crate::error::Result;

pub use self::log::LogTransport;
pub use self::resend::ResendMailer;

/// Outbound email capability: one HTML message to one recipient
#[async_trait]
pub trait EmailTransport: Send + Sync {
    /// Send the message and return the provider's message id
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<String>;
}
