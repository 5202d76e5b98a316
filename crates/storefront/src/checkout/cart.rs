//! Cart state: line items and derived totals.
//!
//! The cart is the authoritative holder of what the user intends to buy.
//! Product data is denormalized into each line at add time so the cart
//! renders consistently even if the catalog changes underneath it; price
//! authority at add time comes from the backend, not the browser.
//!
//! Totals are derived reads computed from the item collection on every call,
//! so no mutation path can leave them stale.

use serde::{Deserialize, Serialize};

use aurum_core::{Price, ProductId};

use crate::api::types::Product;

/// Product data frozen into a cart line at add time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    /// Backend product id.
    pub id: ProductId,
    /// Name at time of adding.
    pub name: String,
    /// Unit price in minor units at time of adding.
    pub price: Price,
    /// Primary image URL.
    pub image: Option<String>,
    /// Category slug.
    pub category: Option<String>,
    /// Whether the product was flagged preorder in the catalog.
    pub preorder: bool,
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            category: product.category.clone(),
            preorder: product.is_preorder,
        }
    }
}

/// A single cart line.
///
/// Unique by product id; quantity is always >= 1 (anything lower removes the
/// line instead).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Frozen product data.
    pub product: ProductSnapshot,
    /// Units of this product in the cart.
    pub quantity: u32,
    /// Whether this line is a preorder.
    pub is_preorder: bool,
}

impl CartItem {
    /// Line total: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// The session cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// The current line items.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add a product to the cart.
    ///
    /// If a line for the same product already exists its quantity is
    /// incremented by `quantity`; otherwise a new line is appended with
    /// `is_preorder` taken from the snapshot's catalog flag unless
    /// `preorder_override` says otherwise. A zero `quantity` adds nothing.
    pub fn add_item(
        &mut self,
        snapshot: ProductSnapshot,
        quantity: u32,
        preorder_override: Option<bool>,
    ) {
        if quantity == 0 {
            return;
        }

        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.product.id == snapshot.id)
        {
            item.quantity = item.quantity.saturating_add(quantity);
            return;
        }

        let is_preorder = preorder_override.unwrap_or(snapshot.preorder);
        self.items.push(CartItem {
            product: snapshot,
            quantity,
            is_preorder,
        });
    }

    /// Set a line's quantity exactly (not incremental).
    ///
    /// A quantity of zero removes the line. Unknown product ids are a no-op.
    pub fn update_quantity(&mut self, product_id: &ProductId, new_quantity: u32) {
        if new_quantity == 0 {
            self.remove_item(product_id);
            return;
        }

        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| &item.product.id == product_id)
        {
            item.quantity = new_quantity;
        }
    }

    /// Remove a line if present; no-op otherwise.
    pub fn remove_item(&mut self, product_id: &ProductId) {
        self.items.retain(|item| &item.product.id != product_id);
    }

    /// Empty the cart.
    ///
    /// Called exactly once per successfully completed order (by the payment
    /// orchestrator, after verification) or on explicit user action - never
    /// on a failed or cancelled payment.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, item| acc.saturating_add(item.quantity))
    }

    /// Total price across all lines, in minor units.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// The product ids currently in the cart, in line order.
    #[must_use]
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.items
            .iter()
            .map(|item| item.product.id.clone())
            .collect()
    }

    /// Quantity per product id, built fresh from the current lines.
    ///
    /// Order creation reads this at the moment the order payload is built so
    /// that last-second cart edits are honored.
    #[must_use]
    pub fn product_counts(&self) -> std::collections::BTreeMap<String, u32> {
        self.items
            .iter()
            .map(|item| (item.product.id.to_string(), item.quantity))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(id: &str, price: i64) -> ProductSnapshot {
        ProductSnapshot {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Price::from_minor_units(price),
            image: None,
            category: Some("rings".to_string()),
            preorder: false,
        }
    }

    #[test]
    fn test_single_item_total() {
        let mut cart = Cart::new();
        cart.add_item(snapshot("ring-001", 299_999), 1, None);
        assert_eq!(cart.total_price(), Price::from_minor_units(299_999));
        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn test_add_same_product_accumulates_quantity() {
        let mut cart = Cart::new();
        cart.add_item(snapshot("p1", 1000), 2, None);
        cart.add_item(snapshot("p1", 1000), 3, None);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 5);
        assert_eq!(cart.total_price(), Price::from_minor_units(5000));
    }

    #[test]
    fn test_totals_track_every_mutation() {
        let mut cart = Cart::new();

        cart.add_item(snapshot("a", 100), 2, None);
        assert_eq!(cart.total_price(), Price::from_minor_units(200));

        cart.add_item(snapshot("b", 250), 1, None);
        assert_eq!(cart.total_price(), Price::from_minor_units(450));

        cart.update_quantity(&ProductId::new("a"), 5);
        assert_eq!(cart.total_price(), Price::from_minor_units(750));

        cart.remove_item(&ProductId::new("b"));
        assert_eq!(cart.total_price(), Price::from_minor_units(500));

        cart.clear();
        assert_eq!(cart.total_price(), Price::ZERO);
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_update_to_zero_equals_remove() {
        let mut zeroed = Cart::new();
        zeroed.add_item(snapshot("a", 100), 2, None);
        zeroed.add_item(snapshot("b", 200), 1, None);

        let mut removed = zeroed.clone();

        zeroed.update_quantity(&ProductId::new("a"), 0);
        removed.remove_item(&ProductId::new("a"));

        assert_eq!(zeroed, removed);
    }

    #[test]
    fn test_update_quantity_sets_exactly() {
        let mut cart = Cart::new();
        cart.add_item(snapshot("a", 100), 4, None);
        cart.update_quantity(&ProductId::new("a"), 2);
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let mut cart = Cart::new();
        cart.add_item(snapshot("a", 100), 1, None);
        let before = cart.clone();

        cart.update_quantity(&ProductId::new("missing"), 3);
        cart.remove_item(&ProductId::new("missing"));

        assert_eq!(cart, before);
    }

    #[test]
    fn test_add_zero_quantity_adds_nothing() {
        let mut cart = Cart::new();
        cart.add_item(snapshot("a", 100), 0, None);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_preorder_flag_from_catalog_and_override() {
        let mut cart = Cart::new();
        let mut preorder_snapshot = snapshot("a", 100);
        preorder_snapshot.preorder = true;

        cart.add_item(preorder_snapshot, 1, None);
        assert!(cart.items()[0].is_preorder);

        cart.add_item(snapshot("b", 100), 1, Some(true));
        assert!(cart.items()[1].is_preorder);
    }

    #[test]
    fn test_product_counts_fresh_from_lines() {
        let mut cart = Cart::new();
        cart.add_item(snapshot("a", 100), 2, None);
        cart.add_item(snapshot("b", 200), 1, None);
        cart.update_quantity(&ProductId::new("a"), 7);

        let counts = cart.product_counts();
        assert_eq!(counts.get("a"), Some(&7));
        assert_eq!(counts.get("b"), Some(&1));
        assert_eq!(counts.len(), 2);
    }
}
