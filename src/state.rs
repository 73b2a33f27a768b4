use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::mail::EmailTransport;
use crate::outreach::{Dispatcher, OutreachService, RecipientFilter, ResendScheduler};
use crate::store::{Store, SuppressionStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn Store>,
    pub outreach: Arc<OutreachService>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn Store>, outreach: OutreachService) -> Self {
        Self {
            config: Arc::new(config),
            store,
            outreach: Arc::new(outreach),
        }
    }

    /// Wire the outreach workflow on top of `store` and `transport`
    pub fn build<S>(config: Config, store: Arc<S>, transport: Arc<dyn EmailTransport>) -> Self
    where
        S: Store + 'static,
    {
        let scheduler = ResendScheduler::new(
            Arc::clone(&transport),
            Duration::from_secs(config.resend_delay_seconds),
        );
        let suppression: Arc<dyn SuppressionStore> = store.clone();

        let outreach = OutreachService::new(
            RecipientFilter::new(Arc::clone(&suppression)),
            Dispatcher::new(transport, suppression, scheduler),
            config.templates.clone(),
            config.donation_page_url.clone(),
        );

        Self::new(config, store, outreach)
    }
}
