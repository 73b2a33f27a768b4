use std::sync::Arc;

use chrono::Utc;

use super::scheduler::ResendScheduler;
use crate::mail::EmailTransport;
use crate::models::SendOutcome;
use crate::store::SuppressionStore;

/// Sends one rendered message per recipient and keeps the suppression
/// list in step with what actually went out.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn EmailTransport>,
    suppression: Arc<dyn SuppressionStore>,
    scheduler: ResendScheduler,
}

impl Dispatcher {
    pub fn new(
        transport: Arc<dyn EmailTransport>,
        suppression: Arc<dyn SuppressionStore>,
        scheduler: ResendScheduler,
    ) -> Self {
        Self {
            transport,
            suppression,
            scheduler,
        }
    }

    pub fn scheduler(&self) -> &ResendScheduler {
        &self.scheduler
    }

    /// Send to each recipient in order, one at a time.
    ///
    /// A failed send is recorded and the loop moves on. A successful send
    /// upserts the suppression record; if that write fails the outcome is
    /// still `sent` and the failure is reported in `detail`. With
    /// `send_again`, each successful recipient gets one delayed resend.
    pub async fn dispatch(
        &self,
        recipients: &[String],
        subject: &str,
        body: &str,
        send_again: bool,
    ) -> Vec<SendOutcome> {
        let mut outcomes = Vec::with_capacity(recipients.len());

        for recipient in recipients {
            let message_id = match self.transport.send(recipient, subject, body).await {
                Ok(id) => id,
                Err(e) => {
                    tracing::warn!(recipient = %recipient, error = %e, "Email send failed");
                    outcomes.push(SendOutcome::error(recipient, e.to_string()));
                    continue;
                }
            };

            tracing::info!(recipient = %recipient, message_id = %message_id, "Email sent");

            let detail = match self.suppression.record_contact(recipient, Utc::now()).await {
                Ok(()) => None,
                Err(e) => {
                    tracing::error!(
                        recipient = %recipient,
                        error = %e,
                        "Email sent but contact record not written"
                    );
                    Some(format!("contact record not written: {}", e))
                }
            };
            outcomes.push(SendOutcome::sent(recipient, detail));

            if send_again {
                self.scheduler.schedule(recipient, subject, body);
            }
        }

        outcomes
    }
}
