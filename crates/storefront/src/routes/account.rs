//! Account route handlers.
//!
//! These routes require authentication. Profile and order history are thin
//! passthroughs; the backend is authoritative and nothing is cached
//! client-side (history is re-fetched on every visit).

use axum::{Json, extract::State};
use tower_sessions::Session;
use tracing::instrument;

use crate::api::types::{OrderSummary, Profile};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::routes::backend_token;
use crate::state::AppState;

async fn require_token(session: &Session) -> Result<String> {
    backend_token(session)
        .await
        .ok_or_else(|| AppError::Unauthorized("no backend session".to_string()))
}

/// The user's profile.
#[instrument(skip_all)]
pub async fn profile(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<Profile>> {
    let token = require_token(&session).await?;
    let profile = state.backend().get_profile(Some(&token)).await?;
    Ok(Json(profile))
}

/// The user's order history.
#[instrument(skip_all)]
pub async fn orders(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<Vec<OrderSummary>>> {
    let token = require_token(&session).await?;
    let orders = state.backend().get_orders(Some(&token)).await?;
    Ok(Json(orders))
}
