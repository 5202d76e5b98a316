//! Session-related types.
//!
//! Everything the storefront keeps between requests lives in the session
//! store: cart contents, checkout form, the selected-address pointer, and
//! the logged-in user set by the external auth flow. The one deliberate
//! exception is in-flight payment-attempt state, which stays in process
//! memory (see `checkout::orchestrator`).

use serde::{Deserialize, Serialize};

use aurum_core::{Email, UserId};

/// Session-stored user identity.
///
/// Minimal data set by the external auth service to identify the logged-in
/// user; the full profile is fetched from the backend on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Backend user id.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Display name.
    pub name: String,
}

/// Session keys for storefront state.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the backend session token forwarded on user-scoped API calls.
    pub const BACKEND_TOKEN: &str = "backend_token";

    /// Key for the cart contents.
    pub const CART: &str = "cart";

    /// Key for the checkout identity form.
    pub const CHECKOUT_FORM: &str = "checkout_form";

    /// Key for the selected delivery address pointer.
    pub const SELECTED_ADDRESS: &str = "selected_address";
}
