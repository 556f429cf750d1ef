//! In-memory webhook event log.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, Timestamp};
use crate::ports::{SaveResult, WebhookEventRecord, WebhookEventRepository};

#[derive(Debug, Clone, Default)]
pub struct InMemoryWebhookEventRepository {
    records: Arc<RwLock<HashMap<String, WebhookEventRecord>>>,
}

impl InMemoryWebhookEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl WebhookEventRepository for InMemoryWebhookEventRepository {
    async fn find_by_event_id(&self, event_id: &str) -> Result<Option<WebhookEventRecord>, DomainError> {
        Ok(self.records.read().await.get(event_id).cloned())
    }

    async fn save(&self, record: WebhookEventRecord) -> Result<SaveResult, DomainError> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.event_id) {
            Ok(SaveResult::AlreadyExists)
        } else {
            records.insert(record.event_id.clone(), record);
            Ok(SaveResult::Inserted)
        }
    }

    async fn delete_before(&self, timestamp: Timestamp) -> Result<u64, DomainError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, r| !r.processed_at.is_before(&timestamp));
        Ok((before - records.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_returns_already_exists_for_duplicate() {
        let repo = InMemoryWebhookEventRepository::new();
        let now = Timestamp::now();

        let first = repo.save(WebhookEventRecord::success("evt_dup", "t", now)).await.unwrap();
        let second = repo.save(WebhookEventRecord::success("evt_dup", "t", now)).await.unwrap();

        assert_eq!(first, SaveResult::Inserted);
        assert_eq!(second, SaveResult::AlreadyExists);
    }

    #[tokio::test]
    async fn delete_before_removes_old_records() {
        let repo = InMemoryWebhookEventRepository::new();
        let now = Timestamp::now();
        repo.save(WebhookEventRecord::success("evt_old", "t", now.add_days(-60)))
            .await
            .unwrap();
        repo.save(WebhookEventRecord::success("evt_new", "t", now)).await.unwrap();

        let deleted = repo.delete_before(now.add_days(-30)).await.unwrap();

        assert_eq!(deleted, 1);
        assert!(repo.find_by_event_id("evt_old").await.unwrap().is_none());
        assert!(repo.find_by_event_id("evt_new").await.unwrap().is_some());
        assert_eq!(repo.len().await, 1);
    }
}
