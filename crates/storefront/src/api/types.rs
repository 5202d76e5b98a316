//! Domain types for the commerce backend API.
//!
//! These types provide a clean, ergonomic API separate from the raw JSON
//! shapes the backend serves. Monetary amounts are integer minor units
//! (paise) everywhere; see `aurum_core::Price`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use aurum_core::{AddressId, OrderId, Price, ProductId, UserId};

// =============================================================================
// Catalog Types
// =============================================================================

/// A catalog product, as served by the backend.
///
/// Only the fields the storefront needs to render listings and to snapshot
/// into the cart; the backend holds the full record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Backend product id.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price in minor units.
    pub price: Price,
    /// Primary image URL.
    pub image: Option<String>,
    /// Category slug (e.g., "rings").
    pub category: Option<String>,
    /// Whether the product is sold on preorder.
    #[serde(default)]
    pub is_preorder: bool,
    /// Whether the product is currently in stock.
    #[serde(default = "default_true")]
    pub in_stock: bool,
}

const fn default_true() -> bool {
    true
}

/// A page of products.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    /// Products on this page.
    pub items: Vec<Product>,
    /// Total products matching the query.
    pub total: u64,
    /// 1-based page number.
    pub page: u32,
}

// =============================================================================
// Address Types
// =============================================================================

/// Kind of delivery address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    Home,
    Office,
    Other,
}

/// A saved delivery address.
///
/// The backend is authoritative for the whole record, including the
/// at-most-one-default invariant; the client never patches one locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Backend address id.
    pub id: AddressId,
    /// Owning user.
    pub user_id: UserId,
    /// Recipient full name.
    pub full_name: String,
    /// Recipient mobile number (ten digits).
    pub mobile_number: String,
    /// Postal PIN code.
    pub pincode: String,
    /// House/flat number.
    pub house_number: String,
    /// Street or area.
    pub street_area: String,
    /// Optional landmark.
    pub landmark: Option<String>,
    /// City.
    pub city: String,
    /// State.
    pub state: String,
    /// Kind of address.
    pub address_type: AddressType,
    /// Whether this is the user's default address.
    pub is_default: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Address {
    /// Format the address as a single line for order notes.
    #[must_use]
    pub fn single_line(&self) -> String {
        let mut parts = vec![
            self.house_number.clone(),
            self.street_area.clone(),
        ];
        if let Some(landmark) = &self.landmark
            && !landmark.is_empty()
        {
            parts.push(landmark.clone());
        }
        parts.push(self.city.clone());
        parts.push(self.state.clone());
        parts.push(self.pincode.clone());
        parts.join(", ")
    }
}

/// Payload for creating or updating an address.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    pub full_name: String,
    pub mobile_number: String,
    pub pincode: String,
    pub house_number: String,
    pub street_area: String,
    pub landmark: Option<String>,
    pub city: String,
    pub state: String,
    pub address_type: AddressType,
}

// =============================================================================
// Order Types
// =============================================================================

/// Request body for order creation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// Total in minor units.
    pub amount: Price,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Client-chosen receipt, unique per attempt.
    pub receipt: String,
    /// Order notes carried through to the payment record.
    pub notes: OrderNotes,
}

/// Order notes: customer identity plus the cart composition at the moment of
/// order creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderNotes {
    /// Authenticated user id, when known.
    pub user_id: Option<UserId>,
    /// Customer display name.
    pub name: String,
    /// Customer email.
    pub email: String,
    /// Customer phone.
    pub phone: String,
    /// Product ids in the cart.
    pub product_ids: Vec<ProductId>,
    /// Quantity per product id.
    pub product_counts: BTreeMap<String, u32>,
    /// Selected shipping address, flattened to one line.
    pub shipping_address: Option<String>,
}

/// The backend's view of a freshly created order.
///
/// Only the identifiers needed to open the payment widget and to verify the
/// payment afterwards; order history is re-fetched on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedOrder {
    /// Gateway order id, handed to the widget.
    pub id: OrderId,
    /// Amount in minor units, echoed by the backend.
    pub amount: Price,
    /// ISO 4217 currency code.
    pub currency: String,
}

/// Order lifecycle status, as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Created,
    Paid,
    Failed,
}

/// A past order in the user's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: OrderId,
    pub amount: Price,
    pub currency: String,
    pub receipt: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// Result of a successful payment verification.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifiedPayment {
    /// Backend confirmation message.
    pub message: String,
    /// The settled order, when the backend includes it.
    pub order: Option<OrderSummary>,
}

// =============================================================================
// Account Types
// =============================================================================

/// The user's profile, as served by `/user/profile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}
