//! Outreach email workflow: validate and filter recipients, render the
//! context's template pair, dispatch, optionally schedule resends.

pub mod dispatch;
pub mod recipients;
pub mod scheduler;
pub mod template;

use std::collections::HashMap;

pub use dispatch::Dispatcher;
pub use recipients::{is_valid_email, FilterOutcome, FilteredRecipients, RecipientFilter};
pub use scheduler::{PendingResendInfo, ResendScheduler};
pub use template::render;

use crate::config::TemplateSet;
use crate::error::Result;
use crate::models::{SendEmailRequest, SendOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutreachResult {
    Dispatched {
        outcomes: Vec<SendOutcome>,
        rejected: usize,
        suppressed: usize,
    },
    NoNewRecipients {
        suppressed: usize,
    },
}

pub struct OutreachService {
    filter: RecipientFilter,
    dispatcher: Dispatcher,
    templates: TemplateSet,
    donation_url: String,
}

impl OutreachService {
    pub fn new(
        filter: RecipientFilter,
        dispatcher: Dispatcher,
        templates: TemplateSet,
        donation_url: String,
    ) -> Self {
        Self {
            filter,
            dispatcher,
            templates,
            donation_url,
        }
    }

    pub fn scheduler(&self) -> &ResendScheduler {
        self.dispatcher.scheduler()
    }

    /// Rendered `(subject, body)` for a request that already passed validation
    pub fn render_for(&self, request: &SendEmailRequest) -> (String, String) {
        let context = request.context.unwrap_or(crate::models::EmailContext::Single);
        let pair = self.templates.for_context(context);

        let variables: HashMap<&str, &str> = HashMap::from([
            ("recipientName", request.recipient_name.as_deref().unwrap_or_default()),
            ("senderName", request.sender_name.as_deref().unwrap_or_default()),
            ("candidateName", request.candidate_name.as_deref().unwrap_or_default()),
            ("donationUrl", self.donation_url.as_str()),
        ]);

        (render(&pair.subject, &variables), render(&pair.body, &variables))
    }

    pub async fn send(&self, request: &SendEmailRequest) -> Result<OutreachResult> {
        let filtered = match self.filter.filter(request).await? {
            FilterOutcome::Ready(filtered) => filtered,
            FilterOutcome::NoNewRecipients { suppressed, .. } => {
                return Ok(OutreachResult::NoNewRecipients { suppressed });
            }
        };

        let (subject, body) = self.render_for(request);

        tracing::info!(
            context = ?request.context,
            recipients = filtered.accepted.len(),
            send_again = request.send_again,
            "Dispatching outreach emails"
        );

        let outcomes = self
            .dispatcher
            .dispatch(&filtered.accepted, &subject, &body, request.send_again)
            .await;

        Ok(OutreachResult::Dispatched {
            outcomes,
            rejected: filtered.rejected,
            suppressed: filtered.suppressed,
        })
    }
}
