//! PruneWebhookEventsHandler - Drops old entries from the webhook event log.
//!
//! Stripe stops retrying a delivery after a few days, so ids older than the
//! retention period can no longer arrive as duplicates.

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::ports::{Clock, WebhookEventRepository};

pub struct PruneWebhookEventsHandler {
    events: Arc<dyn WebhookEventRepository>,
    clock: Arc<dyn Clock>,
    retention_days: u32,
}

impl PruneWebhookEventsHandler {
    pub fn new(
        events: Arc<dyn WebhookEventRepository>,
        clock: Arc<dyn Clock>,
        retention_days: u32,
    ) -> Self {
        Self {
            events,
            clock,
            retention_days,
        }
    }

    /// Returns the number of records removed.
    pub async fn handle(&self) -> Result<u64, DomainError> {
        let cutoff = self.clock.now().add_days(-i64::from(self.retention_days));
        let removed = self.events.delete_before(cutoff).await?;
        if removed > 0 {
            tracing::info!(removed, retention_days = self.retention_days, "Pruned webhook event log");
        }
        Ok(removed)
    }
}
