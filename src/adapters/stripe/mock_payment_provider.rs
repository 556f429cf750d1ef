//! Mock payment provider for testing.
//!
//! Provides a configurable mock implementation of `PaymentProvider` for unit
//! and integration tests. Supports:
//! - Session storage, so created sessions can be retrieved and completed
//! - Error injection
//! - Call tracking

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::payment::CheckoutSessionObject;
use crate::ports::{CheckoutSession, CheckoutSessionRequest, PaymentError, PaymentProvider};

/// Mock payment provider for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
///
/// let session = mock.create_checkout_session(request).await?;
/// mock.complete_session(&session.id, "pi_123");
///
/// let paid = mock.retrieve_checkout_session(&session.id).await?;
/// ```
#[derive(Default, Clone)]
pub struct MockPaymentProvider {
    /// Inner state (thread-safe for async tests).
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Sessions known to the mock, keyed by ID.
    sessions: HashMap<String, CheckoutSessionObject>,

    /// Every checkout request received, in order.
    requests: Vec<CheckoutSessionRequest>,

    /// Error to return on next call.
    next_error: Option<PaymentError>,

    /// Specific errors by method name.
    method_errors: HashMap<String, PaymentError>,

    /// Track method calls for assertions.
    call_log: Vec<MethodCall>,

    sequence: u64,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockPaymentProvider {
    /// Create a new mock provider with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Add or replace a session in the mock's store.
    pub fn set_session(&self, session: CheckoutSessionObject) {
        let id = session.id.clone();
        self.state().sessions.insert(id, session);
    }

    /// Mark a stored session as paid through the given payment intent.
    ///
    /// Returns false if the session is unknown.
    pub fn complete_session(&self, session_id: &str, payment_intent: &str) -> bool {
        let mut state = self.state();
        match state.sessions.get_mut(session_id) {
            Some(session) => {
                session.status = Some("complete".to_string());
                session.payment_status = Some("paid".to_string());
                session.payment_intent = Some(payment_intent.to_string());
                true
            }
            None => false,
        }
    }

    /// Get a stored session.
    pub fn session(&self, session_id: &str) -> Option<CheckoutSessionObject> {
        self.state().sessions.get(session_id).cloned()
    }

    /// Checkout requests received so far.
    pub fn requests(&self) -> Vec<CheckoutSessionRequest> {
        self.state().requests.clone()
    }

    /// Most recent checkout request.
    pub fn last_request(&self) -> Option<CheckoutSessionRequest> {
        self.state().requests.last().cloned()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Error Injection
    // ════════════════════════════════════════════════════════════════════════════

    /// Set an error to return on the next call to any method.
    pub fn set_error(&self, error: PaymentError) {
        self.state().next_error = Some(error);
    }

    /// Set an error for a specific method.
    pub fn set_method_error(&self, method: &str, error: PaymentError) {
        self.state().method_errors.insert(method.to_string(), error);
    }

    /// Clear all configured errors.
    pub fn clear_errors(&self) {
        let mut state = self.state();
        state.next_error = None;
        state.method_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    /// Get all recorded method calls.
    pub fn calls(&self) -> Vec<MethodCall> {
        self.state().call_log.clone()
    }

    /// Check if a method was called.
    pub fn was_called(&self, method: &str) -> bool {
        self.state().call_log.iter().any(|c| c.method == method)
    }

    /// Get count of calls to a method.
    pub fn call_count(&self, method: &str) -> usize {
        self.state()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.state().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), PaymentError> {
        let mut state = self.state();

        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }

        // Global error is consumed
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        Ok(())
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_checkout_session(
        &self,
        request: CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        self.record_call(
            "create_checkout_session",
            vec![
                request.line_item.name.clone(),
                request.line_item.unit_amount.to_string(),
                request.mode.as_str().to_string(),
            ],
        );
        self.check_error("create_checkout_session")?;

        let mut state = self.state();
        state.sequence += 1;
        let id = format!("cs_mock_{}", state.sequence);
        let expires_at = chrono::Utc::now().timestamp() + 24 * 60 * 60;

        let (url, client_secret) = match request.mode {
            crate::domain::payment::CheckoutMode::Hosted => {
                (Some(format!("https://checkout.stripe.com/c/pay/{}", id)), None)
            }
            crate::domain::payment::CheckoutMode::Embedded => {
                (None, Some(format!("{}_secret_mock", id)))
            }
        };

        let stored = CheckoutSessionObject {
            id: id.clone(),
            status: Some("open".to_string()),
            payment_status: Some("unpaid".to_string()),
            amount_total: Some(request.line_item.unit_amount * i64::from(request.line_item.quantity)),
            currency: Some(request.line_item.currency.to_provider_code()),
            customer_email: request.customer_email.clone(),
            url: url.clone(),
            client_secret: client_secret.clone(),
            expires_at: Some(expires_at),
            metadata: request.metadata.clone().into_iter().collect(),
            ..Default::default()
        };
        state.sessions.insert(id.clone(), stored);
        state.requests.push(request);

        Ok(CheckoutSession {
            id,
            url,
            client_secret,
            expires_at: Some(expires_at),
        })
    }

    async fn retrieve_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<Option<CheckoutSessionObject>, PaymentError> {
        self.record_call("retrieve_checkout_session", vec![session_id.to_string()]);
        self.check_error("retrieve_checkout_session")?;

        Ok(self.session(session_id))
    }
}
