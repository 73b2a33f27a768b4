use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{EmailContext, SendEmailRequest};
use crate::store::SuppressionStore;

/// Loose address check: `local@domain` where the domain has a dot with
/// something on both sides of it. No whitespace, exactly one `@`.
pub fn is_valid_email(candidate: &str) -> bool {
    if candidate.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Recipients that survived validation and suppression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredRecipients {
    pub accepted: Vec<String>,
    /// Addresses dropped by the syntax check
    pub rejected: usize,
    /// Addresses dropped because they were already contacted
    pub suppressed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    Ready(FilteredRecipients),
    /// Every valid address was already contacted; nothing to send
    NoNewRecipients { rejected: usize, suppressed: usize },
}

/// Validates a send request and narrows its recipient list
#[derive(Clone)]
pub struct RecipientFilter {
    suppression: Arc<dyn SuppressionStore>,
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl RecipientFilter {
    pub fn new(suppression: Arc<dyn SuppressionStore>) -> Self {
        Self { suppression }
    }

    /// Reject malformed requests before any side effect happens
    pub fn validate(request: &SendEmailRequest) -> Result<EmailContext> {
        let context = match request.context {
            Some(context) if present(&request.recipient_name) && present(&request.sender_name) => {
                context
            }
            _ => return Err(AppError::Validation("Missing required fields".to_string())),
        };

        if context == EmailContext::Mass && !present(&request.candidate_name) {
            return Err(AppError::Validation(
                "Candidate name is required for mass emails".to_string(),
            ));
        }

        if request.recipient_email.is_empty() {
            return Err(AppError::Validation(
                "recipientEmail must be a non-empty array".to_string(),
            ));
        }

        Ok(context)
    }

    pub async fn filter(&self, request: &SendEmailRequest) -> Result<FilterOutcome> {
        Self::validate(request)?;

        let mut seen = HashSet::new();
        let mut accepted = Vec::with_capacity(request.recipient_email.len());
        let mut rejected = 0;

        for raw in &request.recipient_email {
            let address = raw.trim();
            if !is_valid_email(address) {
                rejected += 1;
                continue;
            }
            if seen.insert(address.to_string()) {
                accepted.push(address.to_string());
            }
        }

        if accepted.is_empty() {
            tracing::info!(rejected, "No valid recipients in request");
            return Err(AppError::NoValidRecipients);
        }

        let mut suppressed = 0;
        if request.prevent_repeat {
            let contacted = self.suppression.contacted_among(&accepted).await?;
            if !contacted.is_empty() {
                let before = accepted.len();
                accepted.retain(|a| !contacted.contains(a));
                suppressed = before - accepted.len();
            }

            if accepted.is_empty() {
                tracing::info!(suppressed, "All recipients already contacted");
                return Ok(FilterOutcome::NoNewRecipients {
                    rejected,
                    suppressed,
                });
            }
        }

        tracing::debug!(
            accepted = accepted.len(),
            rejected,
            suppressed,
            "Recipients filtered"
        );

        Ok(FilterOutcome::Ready(FilteredRecipients {
            accepted,
            rejected,
            suppressed,
        }))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::store::MemoryStore;

    fn request(recipients: &[&str]) -> SendEmailRequest {
        SendEmailRequest {
            context: Some(EmailContext::Single),
            candidate_name: None,
            recipient_name: Some("Sam".into()),
            recipient_email: recipients.iter().map(|s| s.to_string()).collect(),
            sender_name: Some("Jo".into()),
            send_again: false,
            prevent_repeat: false,
        }
    }

    fn filter_with(store: Arc<MemoryStore>) -> RecipientFilter {
        RecipientFilter::new(store)
    }

    #[test]
    fn test_email_predicate_accepts() {
        for ok in [
            "a@x.com",
            "first.last@sub.example.org",
            "user+tag@x.co",
            "weird!#$@d.x",
            "a@b.c.",
        ] {
            assert!(is_valid_email(ok), "{ok} should be accepted");
        }
    }

    #[test]
    fn test_email_predicate_rejects() {
        for bad in [
            "",
            "bad-email",
            "@x.com",
            "a@",
            "a@localhost",
            "a@.com",
            "a@com.",
            "a@@x.com",
            "a@b@x.com",
            "a b@x.com",
            "a@x .com",
        ] {
            assert!(!is_valid_email(bad), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_validate_missing_fields() {
        let mut req = request(&["a@x.com"]);
        req.sender_name = Some("  ".into());
        assert!(matches!(
            RecipientFilter::validate(&req),
            Err(AppError::Validation(_))
        ));

        let mut req = request(&["a@x.com"]);
        req.context = None;
        assert!(matches!(
            RecipientFilter::validate(&req),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_mass_requires_candidate() {
        let mut req = request(&["a@x.com"]);
        req.context = Some(EmailContext::Mass);
        let err = RecipientFilter::validate(&req).unwrap_err();
        assert_eq!(err.to_string(), "Candidate name is required for mass emails");

        req.candidate_name = Some("Pat".into());
        assert_eq!(RecipientFilter::validate(&req).unwrap(), EmailContext::Mass);
    }

    #[test]
    fn test_validate_empty_list() {
        assert!(matches!(
            RecipientFilter::validate(&request(&[])),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_drops_invalid_and_duplicates() {
        let filter = filter_with(Arc::new(MemoryStore::new()));

        let outcome = filter
            .filter(&request(&["a@x.com", "bad-email", " b@x.com ", "a@x.com"]))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            FilterOutcome::Ready(FilteredRecipients {
                accepted: vec!["a@x.com".into(), "b@x.com".into()],
                rejected: 1,
                suppressed: 0,
            })
        );
    }

    #[tokio::test]
    async fn test_no_valid_recipients() {
        let filter = filter_with(Arc::new(MemoryStore::new()));

        let err = filter
            .filter(&request(&["nope", "also@nope"]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NoValidRecipients));
    }

    #[tokio::test]
    async fn test_prevent_repeat_drops_contacted() {
        let store = Arc::new(MemoryStore::new());
        store.record_contact("a@x.com", Utc::now()).await.unwrap();
        let filter = filter_with(store);

        let mut req = request(&["a@x.com", "b@x.com"]);
        req.prevent_repeat = true;

        match filter.filter(&req).await.unwrap() {
            FilterOutcome::Ready(filtered) => {
                assert_eq!(filtered.accepted, vec!["b@x.com".to_string()]);
                assert_eq!(filtered.suppressed, 1);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_contacted_ignored_without_prevent_repeat() {
        let store = Arc::new(MemoryStore::new());
        store.record_contact("a@x.com", Utc::now()).await.unwrap();
        let filter = filter_with(store);

        let outcome = filter.filter(&request(&["a@x.com"])).await.unwrap();
        assert!(matches!(outcome, FilterOutcome::Ready(f) if f.accepted == ["a@x.com"]));
    }

    #[tokio::test]
    async fn test_all_contacted_is_no_new_recipients() {
        let store = Arc::new(MemoryStore::new());
        store.record_contact("a@x.com", Utc::now()).await.unwrap();
        let filter = filter_with(store);

        let mut req = request(&["a@x.com", "junk"]);
        req.prevent_repeat = true;

        assert_eq!(
            filter.filter(&req).await.unwrap(),
            FilterOutcome::NoNewRecipients {
                rejected: 1,
                suppressed: 1
            }
        );
    }
}
