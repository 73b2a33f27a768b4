//! Delayed one-shot resends.
//!
//! Each resend is a tokio task sleeping for the configured delay. Pending
//! resends are tracked so they can be listed and cancelled; they are not
//! persisted and are lost when the process exits.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::oneshot;
use tokio::task::AbortHandle;
use uuid::Uuid;

use crate::mail::EmailTransport;

struct PendingResend {
    recipient: String,
    due_at: DateTime<Utc>,
    abort: AbortHandle,
}

/// Snapshot of a pending resend
#[derive(Debug, Clone, Serialize)]
pub struct PendingResendInfo {
    pub id: Uuid,
    pub recipient: String,
    pub due_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct ResendScheduler {
    transport: Arc<dyn EmailTransport>,
    delay: Duration,
    pending: Arc<DashMap<Uuid, PendingResend>>,
}

impl ResendScheduler {
    pub fn new(transport: Arc<dyn EmailTransport>, delay: Duration) -> Self {
        Self {
            transport,
            delay,
            pending: Arc::new(DashMap::new()),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule one more send of the same message after the delay.
    /// Must be called from within a tokio runtime.
    pub fn schedule(&self, recipient: &str, subject: &str, body: &str) -> Uuid {
        let id = Uuid::new_v4();
        let due_at = Utc::now()
            + chrono::Duration::from_std(self.delay).unwrap_or_else(|_| chrono::Duration::zero());

        let transport = Arc::clone(&self.transport);
        let pending = Arc::clone(&self.pending);
        let fire_at = tokio::time::Instant::now() + self.delay;
        let recipient_owned = recipient.to_string();
        let subject = subject.to_string();
        let body = body.to_string();

        // The task holds until its entry (with the abort handle) is in the
        // map, so it can never remove itself before it is registered.
        let (ready_tx, ready_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            if ready_rx.await.is_err() {
                return;
            }

            tokio::time::sleep_until(fire_at).await;

            match transport.send(&recipient_owned, &subject, &body).await {
                Ok(message_id) => {
                    tracing::info!(
                        recipient = %recipient_owned,
                        message_id = %message_id,
                        "Delayed resend sent"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        recipient = %recipient_owned,
                        error = %e,
                        "Delayed resend failed"
                    );
                }
            }

            pending.remove(&id);
        });

        self.pending.insert(
            id,
            PendingResend {
                recipient: recipient.to_string(),
                due_at,
                abort: handle.abort_handle(),
            },
        );
        let _ = ready_tx.send(());

        tracing::debug!(resend_id = %id, due_at = %due_at, "Resend scheduled");
        id
    }

    pub fn pending(&self) -> Vec<PendingResendInfo> {
        let mut list: Vec<PendingResendInfo> = self
            .pending
            .iter()
            .map(|entry| PendingResendInfo {
                id: *entry.key(),
                recipient: entry.recipient.clone(),
                due_at: entry.due_at,
            })
            .collect();
        list.sort_by_key(|info| info.due_at);
        list
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Cancel a pending resend. Returns false if it already fired or never existed.
    pub fn cancel(&self, id: Uuid) -> bool {
        match self.pending.remove(&id) {
            Some((_, resend)) => {
                resend.abort.abort();
                tracing::debug!(resend_id = %id, "Resend cancelled");
                true
            }
            None => false,
        }
    }

    /// Cancel everything still pending; returns how many were dropped
    pub fn cancel_all(&self) -> usize {
        let ids: Vec<Uuid> = self.pending.iter().map(|entry| *entry.key()).collect();
        ids.into_iter().filter(|id| self.cancel(*id)).count()
    }
}
