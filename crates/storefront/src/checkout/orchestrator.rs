//! Order/payment orchestration.
//!
//! Drives one payment attempt per session through order creation, the
//! external payment widget, and backend verification:
//!
//! ```text
//! Idle -> CollectingCustomerInfo -> CreatingOrder -> AwaitingPaymentWidget
//!      -> VerifyingPayment -> Succeeded | Failed
//! ```
//!
//! `Failed` is retryable (the next attempt starts from `CreatingOrder` with
//! a fresh receipt); `Succeeded` is terminal for the cart's contents. The
//! orchestrator's only write to shared state is clearing the cart, and only
//! after the backend confirms the payment. Attempt state lives in process
//! memory keyed by session id - an in-flight attempt deliberately does not
//! survive a reload, because the widget callback it is waiting for will
//! never arrive in the new process.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use aurum_core::{OrderId, UserId};

use crate::api::ApiError;
use crate::api::types::{Address, CreateOrderRequest, CreatedOrder, OrderNotes, VerifiedPayment};
use crate::checkout::CheckoutError;
use crate::checkout::cart::Cart;
use crate::checkout::form::CustomerIdentity;
use crate::checkout::gateway::{PaymentConfirmation, WidgetEvent, WidgetOptions, WidgetPrefill};
use crate::config::GatewayConfig;

/// Error message surfaced when the user dismisses the widget.
const CANCELLED_MESSAGE: &str = "payment cancelled";
/// Error message surfaced when verification does not confirm the payment.
const VERIFICATION_FAILED_MESSAGE: &str = "payment verification failed";

// =============================================================================
// Backend Capability
// =============================================================================

/// The slice of the backend the orchestrator needs.
///
/// Implemented by the real API client; tests substitute a double.
#[async_trait]
pub trait OrderBackend: Send + Sync {
    /// Create an order for the given payload.
    async fn create_order(
        &self,
        auth: Option<&str>,
        request: &CreateOrderRequest,
    ) -> Result<CreatedOrder, ApiError>;

    /// Verify a widget payment.
    async fn verify_payment(
        &self,
        auth: Option<&str>,
        confirmation: &PaymentConfirmation,
    ) -> Result<VerifiedPayment, ApiError>;
}

// =============================================================================
// Attempt State
// =============================================================================

/// Where a payment attempt currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptState {
    /// No attempt underway.
    Idle,
    /// Checkout began without a known customer identity.
    CollectingCustomerInfo,
    /// The create-order call is in flight.
    CreatingOrder,
    /// Control is with the out-of-process widget.
    AwaitingPaymentWidget,
    /// The verify call is in flight.
    VerifyingPayment,
    /// Payment verified; the cart has been cleared.
    Succeeded,
    /// The attempt failed or was cancelled; retry allowed.
    Failed,
}

impl AttemptState {
    /// Whether a new attempt must not begin right now.
    #[must_use]
    pub const fn is_processing(self) -> bool {
        matches!(
            self,
            Self::CreatingOrder | Self::AwaitingPaymentWidget | Self::VerifyingPayment
        )
    }
}

/// One session's payment attempt.
#[derive(Debug, Clone)]
struct PaymentAttempt {
    state: AttemptState,
    receipt: Option<String>,
    order: Option<CreatedOrder>,
    error: Option<String>,
}

impl PaymentAttempt {
    const fn idle() -> Self {
        Self {
            state: AttemptState::Idle,
            receipt: None,
            order: None,
            error: None,
        }
    }
}

/// Read-only snapshot of an attempt, for the UI.
#[derive(Debug, Clone, Serialize)]
pub struct AttemptStatus {
    /// Current state.
    pub state: AttemptState,
    /// Whether the pay action should be disabled.
    pub is_processing: bool,
    /// Surfaced error message, if any.
    pub error: Option<String>,
    /// Active order id, once one exists.
    pub order_id: Option<OrderId>,
}

// =============================================================================
// Attempt Registry
// =============================================================================

/// In-memory payment attempts, keyed by session id.
///
/// Deliberately not backed by the session store: attempt state must die with
/// the process (see module docs).
#[derive(Debug, Default)]
pub struct AttemptRegistry {
    inner: Mutex<HashMap<String, PaymentAttempt>>,
}

impl AttemptRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_attempt<R>(&self, session: &str, f: impl FnOnce(&mut PaymentAttempt) -> R) -> R {
        let mut attempts = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let attempt = attempts
            .entry(session.to_owned())
            .or_insert_with(PaymentAttempt::idle);
        f(attempt)
    }

    /// Snapshot a session's attempt.
    #[must_use]
    pub fn status(&self, session: &str) -> AttemptStatus {
        self.with_attempt(session, |attempt| AttemptStatus {
            state: attempt.state,
            is_processing: attempt.state.is_processing(),
            error: attempt.error.clone(),
            order_id: attempt.order.as_ref().map(|order| order.id.clone()),
        })
    }

    /// Note that checkout began, before any network call.
    ///
    /// With no known identity the attempt parks in `CollectingCustomerInfo`;
    /// otherwise it stays where it is (an in-flight attempt is untouched).
    pub fn begin(&self, session: &str, identity_known: bool) {
        self.with_attempt(session, |attempt| {
            if attempt.state.is_processing() {
                return;
            }
            attempt.state = if identity_known {
                AttemptState::Idle
            } else {
                AttemptState::CollectingCustomerInfo
            };
        });
    }

    /// Transition into `CreatingOrder`, enforcing the single-attempt guard
    /// and resetting any prior outcome.
    fn start_creating(&self, session: &str, receipt: String) -> Result<(), CheckoutError> {
        self.with_attempt(session, |attempt| {
            if attempt.state.is_processing() {
                return Err(CheckoutError::AttemptInProgress);
            }
            *attempt = PaymentAttempt {
                state: AttemptState::CreatingOrder,
                receipt: Some(receipt),
                order: None,
                error: None,
            };
            Ok(())
        })
    }

    /// Record the created order and hand control to the widget.
    fn await_widget(&self, session: &str, order: CreatedOrder) {
        self.with_attempt(session, |attempt| {
            attempt.order = Some(order);
            attempt.state = AttemptState::AwaitingPaymentWidget;
        });
    }

    /// Transition into `VerifyingPayment`, guarding against stale or
    /// mismatched widget callbacks.
    fn start_verifying(&self, session: &str, order_id: &OrderId) -> Result<(), CheckoutError> {
        self.with_attempt(session, |attempt| {
            if attempt.state != AttemptState::AwaitingPaymentWidget {
                return Err(CheckoutError::NoActiveAttempt);
            }
            let matches = attempt
                .order
                .as_ref()
                .is_some_and(|order| &order.id == order_id);
            if !matches {
                return Err(CheckoutError::AttemptMismatch);
            }
            attempt.state = AttemptState::VerifyingPayment;
            Ok(())
        })
    }

    /// Mark the attempt failed with a surfaced message.
    fn fail(&self, session: &str, message: impl Into<String>) {
        self.with_attempt(session, |attempt| {
            attempt.state = AttemptState::Failed;
            attempt.error = Some(message.into());
        });
    }

    /// Mark the attempt succeeded.
    fn succeed(&self, session: &str) {
        self.with_attempt(session, |attempt| {
            attempt.state = AttemptState::Succeeded;
            attempt.error = None;
        });
    }

    /// Drop a session's attempt (logout / session expiry).
    pub fn forget(&self, session: &str) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(session);
    }
}

// =============================================================================
// Checkout Flow
// =============================================================================

/// The checkout driver: wires the cart, identity, and address selection to
/// the backend and the widget boundary for one request.
///
/// Constructed per request from app state; holds no state of its own beyond
/// the borrowed registry.
pub struct CheckoutFlow<'a, B> {
    backend: &'a B,
    attempts: &'a AttemptRegistry,
    gateway: &'a GatewayConfig,
}

impl<'a, B: OrderBackend> CheckoutFlow<'a, B> {
    /// Create a flow over the given backend, registry, and gateway config.
    pub const fn new(
        backend: &'a B,
        attempts: &'a AttemptRegistry,
        gateway: &'a GatewayConfig,
    ) -> Self {
        Self {
            backend,
            attempts,
            gateway,
        }
    }

    /// Note that checkout began for this session.
    pub fn begin(&self, session: &str, identity_known: bool) -> AttemptStatus {
        self.attempts.begin(session, identity_known);
        self.attempts.status(session)
    }

    /// Current attempt status for this session.
    #[must_use]
    pub fn status(&self, session: &str) -> AttemptStatus {
        self.attempts.status(session)
    }

    /// Create the order and produce the widget options.
    ///
    /// The order payload - including the per-product counts - is built from
    /// the cart at this moment, so edits up to the button press are honored.
    /// Edits made while the call is in flight are not re-validated; the
    /// backend's receipt uniqueness is the authoritative duplicate guard.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::GatewayUnavailable`] when no widget can be offered
    /// - [`CheckoutError::EmptyCart`] with nothing to buy
    /// - [`CheckoutError::AttemptInProgress`] while a prior attempt is live
    /// - [`CheckoutError::OrderCreation`] when the backend refuses; the
    ///   attempt parks in `Failed` and may be retried
    #[instrument(skip_all, fields(session = %session))]
    pub async fn start(
        &self,
        session: &str,
        auth: Option<&str>,
        cart: &Cart,
        identity: &CustomerIdentity,
        user_id: Option<UserId>,
        shipping: Option<&Address>,
    ) -> Result<WidgetOptions, CheckoutError> {
        if self.gateway.key_id.is_empty() {
            return Err(CheckoutError::GatewayUnavailable);
        }
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        // Fresh receipt per attempt so a retry never collides with a
        // still-settling prior order.
        let receipt = format!("rcpt_{}", Uuid::new_v4().simple());
        self.attempts.start_creating(session, receipt.clone())?;

        let request = CreateOrderRequest {
            amount: cart.total_price(),
            currency: self.gateway.currency.clone(),
            receipt,
            notes: OrderNotes {
                user_id,
                name: identity.name.clone(),
                email: identity.email.as_str().to_owned(),
                phone: identity.phone.as_str().to_owned(),
                product_ids: cart.product_ids(),
                product_counts: cart.product_counts(),
                shipping_address: shipping.map(Address::single_line),
            },
        };

        match self.backend.create_order(auth, &request).await {
            Ok(order) => {
                info!(order_id = %order.id, "order created");
                self.attempts.await_widget(session, order.clone());
                Ok(WidgetOptions {
                    key: self.gateway.key_id.clone(),
                    amount: order.amount,
                    currency: order.currency,
                    order_id: order.id,
                    prefill: WidgetPrefill::from_identity(identity),
                })
            }
            Err(e) => {
                warn!(error = %e, "order creation failed");
                self.attempts.fail(session, e.to_string());
                Err(CheckoutError::OrderCreation(e))
            }
        }
    }

    /// Consume a widget callback.
    ///
    /// On a completed payment the signature triple is verified against the
    /// backend; only a confirmed verification clears the cart. On dismissal
    /// the attempt fails softly with a "payment cancelled" message and the
    /// cart is untouched. Verification is never retried here - a stale
    /// signature must not be replayed.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::NoActiveAttempt`] / [`CheckoutError::AttemptMismatch`]
    ///   for callbacks that do not belong to the live attempt
    /// - [`CheckoutError::Verification`] when the backend cannot confirm the
    ///   payment; the cart is left intact
    #[instrument(skip_all, fields(session = %session))]
    pub async fn handle_widget_event(
        &self,
        session: &str,
        auth: Option<&str>,
        cart: &mut Cart,
        event: WidgetEvent,
    ) -> Result<Option<VerifiedPayment>, CheckoutError> {
        match event {
            WidgetEvent::Dismissed => {
                self.attempts.with_attempt(session, |attempt| {
                    if attempt.state == AttemptState::AwaitingPaymentWidget {
                        attempt.state = AttemptState::Failed;
                        attempt.error = Some(CANCELLED_MESSAGE.to_string());
                    }
                });
                info!("payment widget dismissed");
                Ok(None)
            }
            WidgetEvent::Completed(confirmation) => {
                self.attempts
                    .start_verifying(session, &confirmation.razorpay_order_id)?;

                match self.backend.verify_payment(auth, &confirmation).await {
                    Ok(verified) => {
                        info!(order_id = %confirmation.razorpay_order_id, "payment verified");
                        cart.clear();
                        self.attempts.succeed(session);
                        Ok(Some(verified))
                    }
                    Err(e) => {
                        // Money may have moved without confirmation; keep the
                        // cart and surface the failure without retrying.
                        warn!(error = %e, "payment verification failed");
                        self.attempts.fail(session, VERIFICATION_FAILED_MESSAGE);
                        Err(CheckoutError::Verification(e))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use secrecy::SecretString;

    use aurum_core::{Email, Phone, Price, ProductId};

    use crate::checkout::cart::ProductSnapshot;

    // =========================================================================
    // Test Double
    // =========================================================================

    #[derive(Default)]
    struct MockBackend {
        create_results: Mutex<Vec<Result<CreatedOrder, ApiError>>>,
        verify_results: Mutex<Vec<Result<VerifiedPayment, ApiError>>>,
        create_calls: AtomicUsize,
        verify_calls: AtomicUsize,
    }

    impl MockBackend {
        fn with_create(self, result: Result<CreatedOrder, ApiError>) -> Self {
            self.create_results.lock().unwrap().push(result);
            self
        }

        fn with_verify(self, result: Result<VerifiedPayment, ApiError>) -> Self {
            self.verify_results.lock().unwrap().push(result);
            self
        }
    }

    #[async_trait]
    impl OrderBackend for MockBackend {
        async fn create_order(
            &self,
            _auth: Option<&str>,
            _request: &CreateOrderRequest,
        ) -> Result<CreatedOrder, ApiError> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            self.create_results
                .lock()
                .unwrap()
                .pop()
                .expect("unexpected create_order call")
        }

        async fn verify_payment(
            &self,
            _auth: Option<&str>,
            _confirmation: &PaymentConfirmation,
        ) -> Result<VerifiedPayment, ApiError> {
            self.verify_calls.fetch_add(1, Ordering::SeqCst);
            self.verify_results
                .lock()
                .unwrap()
                .pop()
                .expect("unexpected verify_payment call")
        }
    }

    // =========================================================================
    // Fixtures
    // =========================================================================

    const SESSION: &str = "sess-1";

    fn gateway() -> GatewayConfig {
        GatewayConfig {
            key_id: "rzp_test_k3y".to_string(),
            key_secret: SecretString::from("s3cr3t_v4lu3"),
            currency: "INR".to_string(),
        }
    }

    fn identity() -> CustomerIdentity {
        CustomerIdentity {
            name: "Priya Sharma".to_string(),
            email: Email::parse("priya@example.com").unwrap(),
            phone: Phone::parse("9876543210").unwrap(),
        }
    }

    fn cart_with_ring() -> Cart {
        let mut cart = Cart::new();
        cart.add_item(
            ProductSnapshot {
                id: ProductId::new("ring-001"),
                name: "Emerald Halo Ring".to_string(),
                price: Price::from_minor_units(299_999),
                image: None,
                category: Some("rings".to_string()),
                preorder: false,
            },
            1,
            None,
        );
        cart
    }

    fn created_order() -> CreatedOrder {
        CreatedOrder {
            id: OrderId::new("order_9A33XWu170gUtm"),
            amount: Price::from_minor_units(299_999),
            currency: "INR".to_string(),
        }
    }

    fn confirmation() -> PaymentConfirmation {
        PaymentConfirmation {
            razorpay_order_id: OrderId::new("order_9A33XWu170gUtm"),
            razorpay_payment_id: "pay_29QQoUBi66xm2f".to_string(),
            razorpay_signature: "deadbeef".to_string(),
        }
    }

    fn verified() -> VerifiedPayment {
        VerifiedPayment {
            message: "Payment verified successfully".to_string(),
            order: None,
        }
    }

    // =========================================================================
    // Tests
    // =========================================================================

    #[tokio::test]
    async fn test_full_flow_success_clears_cart() {
        let backend = MockBackend::default()
            .with_create(Ok(created_order()))
            .with_verify(Ok(verified()));
        let attempts = AttemptRegistry::new();
        let gateway = gateway();
        let flow = CheckoutFlow::new(&backend, &attempts, &gateway);
        let mut cart = cart_with_ring();

        let options = flow
            .start(SESSION, None, &cart, &identity(), None, None)
            .await
            .unwrap();
        assert_eq!(options.order_id.as_str(), "order_9A33XWu170gUtm");
        assert_eq!(options.amount, Price::from_minor_units(299_999));
        assert_eq!(
            flow.status(SESSION).state,
            AttemptState::AwaitingPaymentWidget
        );

        let verified = flow
            .handle_widget_event(
                SESSION,
                None,
                &mut cart,
                WidgetEvent::Completed(confirmation()),
            )
            .await
            .unwrap();

        assert!(verified.is_some());
        assert!(cart.is_empty());
        let status = flow.status(SESSION);
        assert_eq!(status.state, AttemptState::Succeeded);
        assert!(!status.is_processing);
        assert!(status.error.is_none());
    }

    #[tokio::test]
    async fn test_envelope_error_on_http_200_fails_attempt() {
        let backend = MockBackend::default().with_create(Err(ApiError::Envelope {
            code: 2000,
            message: "error".to_string(),
        }));
        let attempts = AttemptRegistry::new();
        let gateway = gateway();
        let flow = CheckoutFlow::new(&backend, &attempts, &gateway);
        let cart = cart_with_ring();

        let err = flow
            .start(SESSION, None, &cart, &identity(), None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::OrderCreation(_)));
        let status = flow.status(SESSION);
        assert_eq!(status.state, AttemptState::Failed);
        assert_ne!(status.state, AttemptState::AwaitingPaymentWidget);
        assert!(status.error.is_some());
    }

    #[tokio::test]
    async fn test_dismissal_fails_softly_and_keeps_cart() {
        let backend = MockBackend::default().with_create(Ok(created_order()));
        let attempts = AttemptRegistry::new();
        let gateway = gateway();
        let flow = CheckoutFlow::new(&backend, &attempts, &gateway);
        let mut cart = cart_with_ring();

        flow.start(SESSION, None, &cart, &identity(), None, None)
            .await
            .unwrap();
        let outcome = flow
            .handle_widget_event(SESSION, None, &mut cart, WidgetEvent::Dismissed)
            .await
            .unwrap();

        assert!(outcome.is_none());
        assert!(!cart.is_empty());
        let status = flow.status(SESSION);
        assert_eq!(status.state, AttemptState::Failed);
        assert_eq!(status.error.as_deref(), Some("payment cancelled"));
        assert_eq!(backend.verify_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_verification_failure_keeps_cart() {
        let backend = MockBackend::default()
            .with_create(Ok(created_order()))
            .with_verify(Err(ApiError::Status {
                status: 502,
                body: "bad gateway".to_string(),
            }));
        let attempts = AttemptRegistry::new();
        let gateway = gateway();
        let flow = CheckoutFlow::new(&backend, &attempts, &gateway);
        let mut cart = cart_with_ring();

        flow.start(SESSION, None, &cart, &identity(), None, None)
            .await
            .unwrap();
        let err = flow
            .handle_widget_event(
                SESSION,
                None,
                &mut cart,
                WidgetEvent::Completed(confirmation()),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Verification(_)));
        assert!(!cart.is_empty());
        let status = flow.status(SESSION);
        assert_eq!(status.state, AttemptState::Failed);
        assert_eq!(status.error.as_deref(), Some("payment verification failed"));
        assert!(!status.is_processing);
    }

    #[tokio::test]
    async fn test_second_start_blocked_while_processing() {
        let backend = MockBackend::default().with_create(Ok(created_order()));
        let attempts = AttemptRegistry::new();
        let gateway = gateway();
        let flow = CheckoutFlow::new(&backend, &attempts, &gateway);
        let cart = cart_with_ring();

        flow.start(SESSION, None, &cart, &identity(), None, None)
            .await
            .unwrap();

        // Attempt is parked on the widget; a double-click must be a no-op.
        let err = flow
            .start(SESSION, None, &cart, &identity(), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::AttemptInProgress));
        assert_eq!(backend.create_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retry_after_failure_resets_prior_outcome() {
        let backend = MockBackend::default()
            .with_create(Ok(created_order()))
            .with_create(Err(ApiError::Envelope {
                code: 2000,
                message: "error".to_string(),
            }));
        let attempts = AttemptRegistry::new();
        let gateway = gateway();
        let flow = CheckoutFlow::new(&backend, &attempts, &gateway);
        let cart = cart_with_ring();

        // First attempt fails (results pop LIFO: the envelope error first).
        assert!(
            flow.start(SESSION, None, &cart, &identity(), None, None)
                .await
                .is_err()
        );
        assert!(flow.status(SESSION).error.is_some());

        // Retry succeeds and the stale error is gone.
        flow.start(SESSION, None, &cart, &identity(), None, None)
            .await
            .unwrap();
        let status = flow.status(SESSION);
        assert_eq!(status.state, AttemptState::AwaitingPaymentWidget);
        assert!(status.error.is_none());
    }

    #[tokio::test]
    async fn test_mismatched_callback_never_verifies() {
        let backend = MockBackend::default().with_create(Ok(created_order()));
        let attempts = AttemptRegistry::new();
        let gateway = gateway();
        let flow = CheckoutFlow::new(&backend, &attempts, &gateway);
        let mut cart = cart_with_ring();

        flow.start(SESSION, None, &cart, &identity(), None, None)
            .await
            .unwrap();

        let mut stale = confirmation();
        stale.razorpay_order_id = OrderId::new("order_stale");
        let err = flow
            .handle_widget_event(SESSION, None, &mut cart, WidgetEvent::Completed(stale))
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::AttemptMismatch));
        assert_eq!(backend.verify_calls.load(Ordering::SeqCst), 0);
        assert!(!cart.is_empty());
    }

    #[tokio::test]
    async fn test_callback_without_attempt_rejected() {
        let backend = MockBackend::default();
        let attempts = AttemptRegistry::new();
        let gateway = gateway();
        let flow = CheckoutFlow::new(&backend, &attempts, &gateway);
        let mut cart = cart_with_ring();

        let err = flow
            .handle_widget_event(
                SESSION,
                None,
                &mut cart,
                WidgetEvent::Completed(confirmation()),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::NoActiveAttempt));
    }

    #[tokio::test]
    async fn test_empty_cart_and_missing_gateway_are_hard_stops() {
        let backend = MockBackend::default();
        let attempts = AttemptRegistry::new();

        let gateway = gateway();
        let flow = CheckoutFlow::new(&backend, &attempts, &gateway);
        let err = flow
            .start(SESSION, None, &Cart::new(), &identity(), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));

        let unconfigured = gateway_without_key();
        let flow = CheckoutFlow::new(&backend, &attempts, &unconfigured);
        let err = flow
            .start(SESSION, None, &cart_with_ring(), &identity(), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::GatewayUnavailable));
        assert_eq!(backend.create_calls.load(Ordering::SeqCst), 0);
    }

    fn gateway_without_key() -> GatewayConfig {
        GatewayConfig {
            key_id: String::new(),
            key_secret: SecretString::from("s3cr3t_v4lu3"),
            currency: "INR".to_string(),
        }
    }

    #[test]
    fn test_begin_parks_in_collecting_without_identity() {
        let attempts = AttemptRegistry::new();
        attempts.begin(SESSION, false);
        assert_eq!(
            attempts.status(SESSION).state,
            AttemptState::CollectingCustomerInfo
        );

        // With identity known the collecting step is skipped.
        attempts.begin("sess-2", true);
        assert_eq!(attempts.status("sess-2").state, AttemptState::Idle);
    }
}
