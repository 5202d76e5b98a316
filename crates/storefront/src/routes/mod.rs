//! HTTP route handlers for storefront.
//!
//! All handlers serve JSON fragments consumed by the page layer; rendering
//! lives entirely client-side.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database connectivity)
//!
//! # Products
//! GET  /products               - Product listing (paginated, ?category=)
//! GET  /products/{id}          - Product detail
//!
//! # Cart
//! GET    /cart                 - Cart contents and totals
//! POST   /cart/add             - Add a product (quantity defaults to 1)
//! POST   /cart/update          - Set a line's quantity (0 removes)
//! POST   /cart/remove          - Remove a line
//! POST   /cart/clear           - Empty the cart (explicit user action)
//! GET    /cart/count           - Item count badge
//!
//! # Checkout
//! POST /checkout/begin         - Enter checkout; reports whether identity is known
//! POST /checkout/form          - Submit customer identity (local validation)
//! POST /checkout/start         - Create the order, answer with widget options
//! POST /checkout/confirm       - Widget success callback (signature triple)
//! POST /checkout/cancel        - Widget dismiss callback
//! GET  /checkout/status        - Current attempt state for the UI
//!
//! # Account (requires auth)
//! GET    /account/profile               - Profile passthrough
//! GET    /account/orders                - Order history passthrough
//! GET    /account/addresses             - Address list
//! POST   /account/addresses             - Create address
//! PUT    /account/addresses/{id}        - Update address
//! DELETE /account/addresses/{id}        - Delete address
//! POST   /account/addresses/{id}/default - Set default address
//! POST   /account/addresses/{id}/select  - Select address for checkout (local)
//! ```

pub mod account;
pub mod addresses;
pub mod cart;
pub mod checkout;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};
use tower_sessions::Session;

use crate::checkout::cart::Cart;
use crate::checkout::form::CheckoutForm;
use crate::error::{AppError, Result};
use crate::models::session_keys;
use crate::state::AppState;

// =============================================================================
// Session Helpers
// =============================================================================

/// Read the cart from the session, defaulting to empty.
pub(crate) async fn load_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(session_keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Write the cart back to the session.
pub(crate) async fn store_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}

/// Read the checkout form from the session, defaulting to blank.
pub(crate) async fn load_checkout_form(session: &Session) -> CheckoutForm {
    session
        .get::<CheckoutForm>(session_keys::CHECKOUT_FORM)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Write the checkout form back to the session.
pub(crate) async fn store_checkout_form(session: &Session, form: &CheckoutForm) -> Result<()> {
    session.insert(session_keys::CHECKOUT_FORM, form).await?;
    Ok(())
}

/// Read the forwarded backend session token, if the user is logged in.
pub(crate) async fn backend_token(session: &Session) -> Option<String> {
    session
        .get::<String>(session_keys::BACKEND_TOKEN)
        .await
        .ok()
        .flatten()
}

/// Stable key for this session's payment attempt.
///
/// Forces the session record to exist first, since tower-sessions assigns
/// ids lazily on first save.
pub(crate) async fn session_key(session: &Session) -> Result<String> {
    if session.id().is_none() {
        session.save().await?;
    }
    session
        .id()
        .map(|id| id.to_string())
        .ok_or_else(|| AppError::Internal("session id unavailable".to_string()))
}

// =============================================================================
// Routers
// =============================================================================

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/begin", post(checkout::begin))
        .route("/form", post(checkout::form))
        .route("/start", post(checkout::start))
        .route("/confirm", post(checkout::confirm))
        .route("/cancel", post(checkout::cancel))
        .route("/status", get(checkout::status))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    use axum::routing::put;

    Router::new()
        .route("/profile", get(account::profile))
        .route("/orders", get(account::orders))
        .route(
            "/addresses",
            get(addresses::list).post(addresses::create),
        )
        .route(
            "/addresses/{id}",
            put(addresses::update).delete(addresses::remove),
        )
        .route("/addresses/{id}/default", post(addresses::set_default))
        .route("/addresses/{id}/select", post(addresses::select))
}

/// Create all routes for the storefront.
///
/// Checkout endpoints get the strict rate limiter (they create orders);
/// cart endpoints get the general API limiter.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest(
            "/cart",
            cart_routes().layer(crate::middleware::api_rate_limiter()),
        )
        .nest(
            "/checkout",
            checkout_routes().layer(crate::middleware::checkout_rate_limiter()),
        )
        .nest("/account", account_routes())
}
