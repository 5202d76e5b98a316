//! Product route handlers.
//!
//! Read-only catalog proxies over the cached backend client. The cart's add
//! flow depends on these for authoritative price snapshots.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use aurum_core::ProductId;

use crate::api::types::{Product, ProductPage};
use crate::error::Result;
use crate::state::AppState;

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    pub page: Option<u32>,
    pub category: Option<String>,
}

/// Product listing.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<ProductPage>> {
    let listing = state
        .backend()
        .get_products(query.page.unwrap_or(1), query.category.as_deref())
        .await?;
    Ok(Json(listing))
}

/// Product detail.
#[instrument(skip(state), fields(product_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = state.backend().get_product(&id).await?;
    Ok(Json(product))
}
