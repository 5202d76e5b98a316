//! Address route handlers.
//!
//! Thin orchestration over the address book: every mutation goes to the
//! backend and the answer is always the freshly reloaded list, so the page
//! never renders a locally patched collection. Selecting an address for
//! checkout is the one purely local operation.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use aurum_core::AddressId;

use crate::api::types::{Address, AddressInput};
use crate::checkout::address::AddressBook;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::session_keys;
use crate::routes::backend_token;
use crate::state::AppState;

// =============================================================================
// View Models
// =============================================================================

/// The address list plus the checkout selection.
#[derive(Debug, Serialize)]
pub struct AddressListView {
    pub addresses: Vec<Address>,
    pub selected_id: Option<AddressId>,
}

impl From<&AddressBook> for AddressListView {
    fn from(book: &AddressBook) -> Self {
        Self {
            addresses: book.addresses().to_vec(),
            selected_id: book.selection().cloned(),
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Load the address book for the logged-in user.
async fn load_book(state: &AppState, session: &Session) -> Result<(AddressBook, String)> {
    let token = backend_token(session)
        .await
        .ok_or_else(|| AppError::Unauthorized("no backend session".to_string()))?;

    let selected = session
        .get(session_keys::SELECTED_ADDRESS)
        .await
        .ok()
        .flatten();

    let mut book = AddressBook::with_selection(selected);
    book.load(state.backend(), Some(&token)).await?;
    Ok((book, token))
}

/// Persist the selection pointer back to the session.
async fn store_selection(session: &Session, book: &AddressBook) -> Result<()> {
    session
        .insert(session_keys::SELECTED_ADDRESS, book.selection())
        .await?;
    Ok(())
}

// =============================================================================
// Handlers
// =============================================================================

/// List the user's addresses.
#[instrument(skip_all)]
pub async fn list(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<AddressListView>> {
    let (book, _) = load_book(&state, &session).await?;
    Ok(Json(AddressListView::from(&book)))
}

/// Create an address, answer with the reloaded list.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(_user): RequireAuth,
    Json(input): Json<AddressInput>,
) -> Result<Json<AddressListView>> {
    let (mut book, token) = load_book(&state, &session).await?;
    book.add(state.backend(), Some(&token), &input).await?;
    Ok(Json(AddressListView::from(&book)))
}

/// Update an address, answer with the reloaded list.
#[instrument(skip_all, fields(address_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<AddressId>,
    Json(input): Json<AddressInput>,
) -> Result<Json<AddressListView>> {
    let (mut book, token) = load_book(&state, &session).await?;
    book.update(state.backend(), Some(&token), &id, &input)
        .await?;
    Ok(Json(AddressListView::from(&book)))
}

/// Delete an address, answer with the reloaded list.
#[instrument(skip_all, fields(address_id = %id))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<AddressId>,
) -> Result<Json<AddressListView>> {
    let (mut book, token) = load_book(&state, &session).await?;
    book.delete(state.backend(), Some(&token), &id).await?;
    store_selection(&session, &book).await?;
    Ok(Json(AddressListView::from(&book)))
}

/// Set the default address, answer with the reloaded list.
///
/// The default flag is never toggled locally; what the answer shows is what
/// the reload fetched after the backend applied the change.
#[instrument(skip_all, fields(address_id = %id))]
pub async fn set_default(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<AddressId>,
) -> Result<Json<AddressListView>> {
    let (mut book, token) = load_book(&state, &session).await?;
    book.set_default(state.backend(), Some(&token), &id).await?;
    Ok(Json(AddressListView::from(&book)))
}

/// Select the address used at checkout. Local pointer only, no remote call.
#[instrument(skip_all, fields(address_id = %id))]
pub async fn select(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<AddressId>,
) -> Result<Json<AddressListView>> {
    let (mut book, _) = load_book(&state, &session).await?;
    if !book.select(id) {
        return Err(AppError::NotFound("address not found".to_string()));
    }
    store_selection(&session, &book).await?;
    Ok(Json(AddressListView::from(&book)))
}
