//! WebhookEventRepository port - log of processed Stripe deliveries.
//!
//! Stripe delivers at least once. Recording each event id lets the webhook
//! handler skip exact redeliveries before touching any booking, and keeps the
//! payload and outcome around for support queries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{DomainError, Timestamp};

/// How a delivery was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebhookOutcome {
    Success,
    Ignored,
    Failed,
}

impl WebhookOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookOutcome::Success => "success",
            WebhookOutcome::Ignored => "ignored",
            WebhookOutcome::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "success" => Some(WebhookOutcome::Success),
            "ignored" => Some(WebhookOutcome::Ignored),
            "failed" => Some(WebhookOutcome::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for WebhookOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record of a processed webhook event.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookEventRecord {
    /// Stripe event ID (evt_xxx format).
    pub event_id: String,

    /// Type of Stripe event (e.g., "checkout.session.completed").
    pub event_type: String,

    pub processed_at: Timestamp,

    pub outcome: WebhookOutcome,

    /// Reason for an ignored or failed outcome.
    pub error_message: Option<String>,

    /// Original event payload for debugging.
    pub payload: Option<serde_json::Value>,
}

impl WebhookEventRecord {
    fn with_outcome(
        event_id: impl Into<String>,
        event_type: impl Into<String>,
        outcome: WebhookOutcome,
        error_message: Option<String>,
        processed_at: Timestamp,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            event_type: event_type.into(),
            processed_at,
            outcome,
            error_message,
            payload: None,
        }
    }

    pub fn success(event_id: impl Into<String>, event_type: impl Into<String>, at: Timestamp) -> Self {
        Self::with_outcome(event_id, event_type, WebhookOutcome::Success, None, at)
    }

    pub fn ignored(
        event_id: impl Into<String>,
        event_type: impl Into<String>,
        reason: impl Into<String>,
        at: Timestamp,
    ) -> Self {
        Self::with_outcome(event_id, event_type, WebhookOutcome::Ignored, Some(reason.into()), at)
    }

    pub fn failed(
        event_id: impl Into<String>,
        event_type: impl Into<String>,
        error: impl Into<String>,
        at: Timestamp,
    ) -> Self {
        Self::with_outcome(event_id, event_type, WebhookOutcome::Failed, Some(error.into()), at)
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// Result of attempting to save a record keyed by a unique value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveResult {
    /// Record was inserted (first time seeing this key).
    Inserted,
    /// A record with the same key already exists.
    AlreadyExists,
}

/// Port for storing and retrieving processed webhook events.
///
/// Implementations should use a PRIMARY KEY on event_id so concurrent
/// deliveries of the same event cannot both be recorded.
#[async_trait]
pub trait WebhookEventRepository: Send + Sync {
    /// Returns `None` if the event hasn't been processed yet.
    async fn find_by_event_id(&self, event_id: &str) -> Result<Option<WebhookEventRecord>, DomainError>;

    /// Attempt to save a webhook event record.
    ///
    /// Uses `ON CONFLICT DO NOTHING` semantics: returns `AlreadyExists` if
    /// another delivery recorded the event first.
    async fn save(&self, record: WebhookEventRecord) -> Result<SaveResult, DomainError>;

    /// Delete records processed before the given instant.
    ///
    /// Returns the number of records deleted.
    async fn delete_before(&self, timestamp: Timestamp) -> Result<u64, DomainError>;
}

/// Result of webhook processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookResult {
    /// Event was processed.
    Processed,
    /// Event was already processed (idempotent skip).
    AlreadyProcessed,
}
