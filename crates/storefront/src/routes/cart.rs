//! Cart route handlers.
//!
//! The cart lives in the session; handlers mutate it and answer with a JSON
//! view the page layer renders. Price authority on add comes from the
//! backend catalog, never from the request body.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use aurum_core::ProductId;

use crate::checkout::cart::{Cart, CartItem, ProductSnapshot};
use crate::error::Result;
use crate::routes::{load_cart, store_cart};
use crate::state::AppState;

// =============================================================================
// View Models
// =============================================================================

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub name: String,
    pub image: Option<String>,
    pub quantity: u32,
    /// Unit price in minor units.
    pub unit_price: i64,
    /// Line total in minor units.
    pub line_total: i64,
    pub is_preorder: bool,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product.id.clone(),
            name: item.product.name.clone(),
            image: item.product.image.clone(),
            quantity: item.quantity,
            unit_price: item.product.price.minor_units(),
            line_total: item.line_total().minor_units(),
            is_preorder: item.is_preorder,
        }
    }
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total_items: u32,
    /// Grand total in minor units.
    pub total_price: i64,
    /// Grand total in major units, formatted for display.
    pub total_display: String,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            total_items: cart.total_items(),
            total_price: cart.total_price().minor_units(),
            total_display: cart.total_price().to_decimal().to_string(),
        }
    }
}

/// Cart count badge data.
#[derive(Debug, Clone, Serialize)]
pub struct CartCountView {
    pub count: u32,
}

// =============================================================================
// Request Payloads
// =============================================================================

/// Add to cart payload.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
    /// Override the catalog's preorder flag for this line.
    pub preorder: Option<bool>,
}

/// Update cart payload.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Remove from cart payload.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub product_id: ProductId,
}

// =============================================================================
// Handlers
// =============================================================================

/// Show cart contents.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await;
    Ok(Json(CartView::from(&cart)))
}

/// Add an item to the cart.
///
/// Fetches the product from the backend so the snapshot carries the
/// authoritative price, then accumulates into an existing line or appends a
/// new one.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let product = state.backend().get_product(&request.product_id).await?;

    let mut cart = load_cart(&session).await;
    cart.add_item(
        ProductSnapshot::from(&product),
        request.quantity.unwrap_or(1),
        request.preorder,
    );
    store_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// Set a line's quantity exactly; zero removes it.
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    Json(request): Json<UpdateCartRequest>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await;
    cart.update_quantity(&request.product_id, request.quantity);
    store_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// Remove a line.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Json(request): Json<RemoveFromCartRequest>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await;
    cart.remove_item(&request.product_id);
    store_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// Empty the cart on explicit user action.
///
/// The only other path that empties the cart is the payment orchestrator,
/// after a verified payment.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await;
    cart.clear();
    store_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// Item count for the cart badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<Json<CartCountView>> {
    let cart = load_cart(&session).await;
    Ok(Json(CartCountView {
        count: cart.total_items(),
    }))
}
