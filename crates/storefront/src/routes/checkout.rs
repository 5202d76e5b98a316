//! Checkout route handlers.
//!
//! These endpoints drive the payment orchestrator. The browser opens the
//! payment widget with the options `start` answers with; the widget's
//! success handler posts the signature triple to `confirm`, its dismiss
//! hook posts to `cancel`. Between requests the attempt state lives in the
//! in-process registry, keyed by session id.

use axum::{Json, extract::State};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::api::types::{Address, OrderSummary};
use crate::checkout::CheckoutError;
use crate::checkout::address::AddressBook;
use crate::checkout::form::CheckoutForm;
use crate::checkout::gateway::{PaymentConfirmation, WidgetEvent, WidgetOptions};
use crate::checkout::orchestrator::{AttemptStatus, CheckoutFlow};
use crate::error::Result;
use crate::middleware::OptionalAuth;
use crate::models::session_keys;
use crate::routes::{
    backend_token, load_cart, load_checkout_form, session_key, store_cart, store_checkout_form,
};
use crate::state::AppState;

// =============================================================================
// View Models
// =============================================================================

/// Answer to `begin`: where the attempt is and what identity we already have.
#[derive(Debug, Serialize)]
pub struct BeginView {
    pub status: AttemptStatus,
    /// Saved form fields for prefilling; blank for a fresh checkout.
    pub form: CheckoutForm,
    /// Whether the saved identity passes validation (the collecting step is
    /// skipped when it does).
    pub identity_known: bool,
}

/// Answer to a verified payment.
#[derive(Debug, Serialize)]
pub struct ConfirmView {
    pub message: String,
    pub order: Option<OrderSummary>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Enter checkout.
#[instrument(skip(state, session))]
pub async fn begin(State(state): State<AppState>, session: Session) -> Result<Json<BeginView>> {
    let key = session_key(&session).await?;
    let form = load_checkout_form(&session).await;
    let identity_known = form.validate().is_ok();

    let gateway = &state.config().gateway;
    let flow = CheckoutFlow::new(state.backend(), state.attempts(), gateway);
    let status = flow.begin(&key, identity_known);

    Ok(Json(BeginView {
        status,
        form,
        identity_known,
    }))
}

/// Submit the customer identity form.
///
/// The raw fields are saved to the session before validation so a reload
/// mid-checkout keeps whatever was typed; progression to order creation
/// still requires the fields to validate.
#[instrument(skip(state, session, form))]
pub async fn form(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<CheckoutForm>,
) -> Result<Json<BeginView>> {
    store_checkout_form(&session, &form).await?;
    form.validate().map_err(CheckoutError::InvalidCustomer)?;

    // Identity is now known; the collecting step (if any) is done.
    let key = session_key(&session).await?;
    let gateway = &state.config().gateway;
    let flow = CheckoutFlow::new(state.backend(), state.attempts(), gateway);
    let status = flow.begin(&key, true);

    Ok(Json(BeginView {
        status,
        form,
        identity_known: true,
    }))
}

/// Create the order and answer with widget options.
///
/// The order payload is built from the cart as it is at this moment; edits
/// racing the in-flight call are not re-validated, the backend's receipt
/// uniqueness is the real duplicate guard.
#[instrument(skip(state, session, auth))]
pub async fn start(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(auth): OptionalAuth,
) -> Result<Json<WidgetOptions>> {
    let key = session_key(&session).await?;
    let cart = load_cart(&session).await;
    let identity = load_checkout_form(&session)
        .await
        .validate()
        .map_err(CheckoutError::InvalidCustomer)?;

    let token = backend_token(&session).await;
    let shipping = shipping_address(&state, &session, token.as_deref()).await;

    let gateway = &state.config().gateway;
    let flow = CheckoutFlow::new(state.backend(), state.attempts(), gateway);
    let options = flow
        .start(
            &key,
            token.as_deref(),
            &cart,
            &identity,
            auth.map(|user| user.id),
            shipping.as_ref(),
        )
        .await?;

    Ok(Json(options))
}

/// Widget success callback: verify the payment.
///
/// Only a confirmed verification clears the cart and resets the checkout
/// form; on a verification failure both are left untouched and nothing is
/// retried.
#[instrument(skip(state, session, confirmation))]
pub async fn confirm(
    State(state): State<AppState>,
    session: Session,
    Json(confirmation): Json<PaymentConfirmation>,
) -> Result<Json<ConfirmView>> {
    let key = session_key(&session).await?;
    let token = backend_token(&session).await;
    let mut cart = load_cart(&session).await;

    let gateway = &state.config().gateway;
    let flow = CheckoutFlow::new(state.backend(), state.attempts(), gateway);
    let verified = flow
        .handle_widget_event(
            &key,
            token.as_deref(),
            &mut cart,
            WidgetEvent::Completed(confirmation),
        )
        .await?;

    // Reached only on confirmed success: persist the cleared cart and reset
    // the checkout form for the next order.
    store_cart(&session, &cart).await?;
    store_checkout_form(&session, &CheckoutForm::default()).await?;

    let view = verified.map_or_else(
        || ConfirmView {
            message: "payment verified".to_string(),
            order: None,
        },
        |verified| ConfirmView {
            message: verified.message,
            order: verified.order,
        },
    );
    Ok(Json(view))
}

/// Widget dismiss callback: soft-fail the attempt, cart untouched.
#[instrument(skip(state, session))]
pub async fn cancel(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<AttemptStatus>> {
    let key = session_key(&session).await?;
    let mut cart = load_cart(&session).await;

    let gateway = &state.config().gateway;
    let flow = CheckoutFlow::new(state.backend(), state.attempts(), gateway);
    flow.handle_widget_event(&key, None, &mut cart, WidgetEvent::Dismissed)
        .await?;

    Ok(Json(flow.status(&key)))
}

/// Current attempt state for the UI.
#[instrument(skip(state, session))]
pub async fn status(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<AttemptStatus>> {
    let key = session_key(&session).await?;
    Ok(Json(state.attempts().status(&key)))
}

// =============================================================================
// Helpers
// =============================================================================

/// Resolve the shipping address for the order notes: the session's selected
/// pointer when it still resolves, else the user's default.
///
/// An address fetch failure is logged and tolerated - checkout proceeds
/// without shipping notes rather than blocking the payment.
async fn shipping_address(
    state: &AppState,
    session: &Session,
    token: Option<&str>,
) -> Option<Address> {
    token?;

    let selected = session
        .get(session_keys::SELECTED_ADDRESS)
        .await
        .ok()
        .flatten();

    let mut book = AddressBook::with_selection(selected);
    match book.load(state.backend(), token).await {
        Ok(()) => book.shipping_address().cloned(),
        Err(e) => {
            tracing::warn!("Failed to load addresses for checkout: {e}");
            None
        }
    }
}
