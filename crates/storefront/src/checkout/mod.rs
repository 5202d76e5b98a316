//! Checkout domain: cart, customer form, address book, and the payment flow.
//!
//! # Architecture
//!
//! Everything here is session-scoped state orchestration over the commerce
//! backend; nothing persists locally beyond the session store. The pieces:
//!
//! - [`cart`] - the items the user intends to purchase and the derived totals
//! - [`form`] - checkout identity fields with local validation
//! - [`address`] - remote-sourced address book with a local selection pointer
//! - [`gateway`] - the payment widget boundary (options out, callback in)
//! - [`orchestrator`] - the order/payment state machine tying it together
//!
//! Ownership is strict: the cart owns its line items; the orchestrator owns
//! payment-attempt state and is the only writer that may clear the cart, and
//! only on a verified payment. Address and form state are never mutated by
//! the orchestrator.

pub mod address;
pub mod cart;
pub mod form;
pub mod gateway;
pub mod orchestrator;

use thiserror::Error;

use crate::api::ApiError;
use crate::checkout::form::FormErrors;

/// Errors produced while driving a checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout cannot start with an empty cart.
    #[error("cart is empty")]
    EmptyCart,

    /// Customer identity fields failed local validation.
    #[error("invalid customer details: {0}")]
    InvalidCustomer(#[from] FormErrors),

    /// The payment widget cannot be offered (gateway key missing or the
    /// widget script failed to load). Hard stop; the user should reload.
    #[error("payment gateway is not available")]
    GatewayUnavailable,

    /// A payment attempt is already being processed for this session.
    #[error("a payment attempt is already in progress")]
    AttemptInProgress,

    /// A widget callback arrived with no attempt awaiting it.
    #[error("no payment attempt is awaiting the widget")]
    NoActiveAttempt,

    /// A widget callback arrived for a different order than the active
    /// attempt's. A stale callback must never drive verification.
    #[error("widget callback does not match the active order")]
    AttemptMismatch,

    /// The backend refused or failed to create the order.
    #[error("order creation failed: {0}")]
    OrderCreation(#[source] ApiError),

    /// The backend could not confirm the payment. The user may have been
    /// charged; the cart is left untouched and nothing is retried.
    #[error("payment verification failed: {0}")]
    Verification(#[source] ApiError),
}
