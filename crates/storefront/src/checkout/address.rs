//! Address book: the checkout-relevant slice of saved delivery addresses.
//!
//! The backend owns every address record, including the at-most-one-default
//! invariant. The client never patches an address locally: every mutation is
//! a remote call followed by a wholesale reload, so the local collection can
//! never drift from server truth. The only purely local piece of state is
//! the selection pointer, which decides which address populates the order's
//! shipping notes at checkout time.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use aurum_core::AddressId;

use crate::api::ApiError;
use crate::api::types::{Address, AddressInput};

/// The slice of the backend the address book needs.
///
/// Implemented by the real API client; tests substitute a double.
#[async_trait]
pub trait AddressBackend: Send + Sync {
    /// Fetch all of the user's addresses.
    async fn list_addresses(&self, auth: Option<&str>) -> Result<Vec<Address>, ApiError>;
    /// Create an address.
    async fn create_address(&self, auth: Option<&str>, input: &AddressInput)
    -> Result<(), ApiError>;
    /// Update an address.
    async fn update_address(
        &self,
        auth: Option<&str>,
        address_id: &AddressId,
        input: &AddressInput,
    ) -> Result<(), ApiError>;
    /// Delete an address.
    async fn delete_address(
        &self,
        auth: Option<&str>,
        address_id: &AddressId,
    ) -> Result<(), ApiError>;
    /// Mark an address as the default.
    async fn set_default_address(
        &self,
        auth: Option<&str>,
        address_id: &AddressId,
    ) -> Result<(), ApiError>;
}

/// The user's addresses as last fetched, plus the local selection pointer.
///
/// Only the pointer is session-persisted; the collection itself is re-fetched
/// rather than trusted across requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressBook {
    addresses: Vec<Address>,
    selected: Option<AddressId>,
}

impl AddressBook {
    /// Create an empty book with an optional previously selected pointer.
    #[must_use]
    pub const fn with_selection(selected: Option<AddressId>) -> Self {
        Self {
            addresses: Vec::new(),
            selected,
        }
    }

    /// The addresses as last loaded.
    #[must_use]
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    /// The selected address, if the pointer still resolves.
    ///
    /// A pointer left over from a deleted address resolves to `None`; the
    /// default address (when any) is the sensible fallback for callers.
    #[must_use]
    pub fn selected(&self) -> Option<&Address> {
        let id = self.selected.as_ref()?;
        self.addresses.iter().find(|address| &address.id == id)
    }

    /// The user's default address, if any.
    #[must_use]
    pub fn default_address(&self) -> Option<&Address> {
        self.addresses.iter().find(|address| address.is_default)
    }

    /// The address to ship to: the explicit selection, else the default.
    #[must_use]
    pub fn shipping_address(&self) -> Option<&Address> {
        self.selected().or_else(|| self.default_address())
    }

    /// Point the selection at an address.
    ///
    /// Pure local assignment with no remote effect. Returns `false` (and
    /// leaves the pointer alone) when the id is not in the loaded
    /// collection.
    pub fn select(&mut self, id: AddressId) -> bool {
        if self.addresses.iter().any(|address| address.id == id) {
            self.selected = Some(id);
            true
        } else {
            false
        }
    }

    /// The raw selection pointer, for session persistence.
    #[must_use]
    pub const fn selection(&self) -> Option<&AddressId> {
        self.selected.as_ref()
    }

    /// Replace the collection wholesale from the backend. Never merges.
    ///
    /// # Errors
    ///
    /// Returns an error when the fetch fails; the local collection is left
    /// as it was.
    pub async fn load<B: AddressBackend>(
        &mut self,
        backend: &B,
        auth: Option<&str>,
    ) -> Result<(), ApiError> {
        self.addresses = backend.list_addresses(auth).await?;
        Ok(())
    }

    /// Create an address remotely, then reload.
    ///
    /// # Errors
    ///
    /// Returns an error when the create or the reload fails.
    pub async fn add<B: AddressBackend>(
        &mut self,
        backend: &B,
        auth: Option<&str>,
        input: &AddressInput,
    ) -> Result<(), ApiError> {
        backend.create_address(auth, input).await?;
        self.load(backend, auth).await
    }

    /// Update an address remotely, then reload.
    ///
    /// # Errors
    ///
    /// Returns an error when the update or the reload fails.
    pub async fn update<B: AddressBackend>(
        &mut self,
        backend: &B,
        auth: Option<&str>,
        id: &AddressId,
        input: &AddressInput,
    ) -> Result<(), ApiError> {
        backend.update_address(auth, id, input).await?;
        self.load(backend, auth).await
    }

    /// Delete an address remotely, then reload.
    ///
    /// Clears the selection pointer if it pointed at the deleted address.
    ///
    /// # Errors
    ///
    /// Returns an error when the delete or the reload fails.
    pub async fn delete<B: AddressBackend>(
        &mut self,
        backend: &B,
        auth: Option<&str>,
        id: &AddressId,
    ) -> Result<(), ApiError> {
        backend.delete_address(auth, id).await?;
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        self.load(backend, auth).await
    }

    /// Set the default remotely, then reload.
    ///
    /// The default flag is never toggled locally; the reload is what makes
    /// the new flags visible.
    ///
    /// # Errors
    ///
    /// Returns an error when the call or the reload fails.
    pub async fn set_default<B: AddressBackend>(
        &mut self,
        backend: &B,
        auth: Option<&str>,
        id: &AddressId,
    ) -> Result<(), ApiError> {
        backend.set_default_address(auth, id).await?;
        self.load(backend, auth).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Utc;

    use aurum_core::UserId;

    use crate::api::types::AddressType;

    /// Backend double that applies mutations to an in-memory list, so tests
    /// can observe that reads always come from a reload.
    #[derive(Default)]
    struct FakeBackend {
        records: Mutex<Vec<Address>>,
        list_calls: AtomicUsize,
    }

    fn address(id: &str, is_default: bool) -> Address {
        Address {
            id: AddressId::new(id),
            user_id: UserId::new("usr_1"),
            full_name: "Priya Sharma".to_string(),
            mobile_number: "9876543210".to_string(),
            pincode: "560001".to_string(),
            house_number: "14B".to_string(),
            street_area: "MG Road".to_string(),
            landmark: None,
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            address_type: AddressType::Home,
            is_default,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn input() -> AddressInput {
        AddressInput {
            full_name: "Priya Sharma".to_string(),
            mobile_number: "9876543210".to_string(),
            pincode: "560001".to_string(),
            house_number: "14B".to_string(),
            street_area: "MG Road".to_string(),
            landmark: None,
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            address_type: AddressType::Home,
        }
    }

    #[async_trait]
    impl AddressBackend for FakeBackend {
        async fn list_addresses(&self, _auth: Option<&str>) -> Result<Vec<Address>, ApiError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.records.lock().unwrap().clone())
        }

        async fn create_address(
            &self,
            _auth: Option<&str>,
            input: &AddressInput,
        ) -> Result<(), ApiError> {
            let mut records = self.records.lock().unwrap();
            let id = format!("addr_{}", records.len() + 1);
            let mut created = address(&id, false);
            created.full_name = input.full_name.clone();
            records.push(created);
            Ok(())
        }

        async fn update_address(
            &self,
            _auth: Option<&str>,
            address_id: &AddressId,
            input: &AddressInput,
        ) -> Result<(), ApiError> {
            let mut records = self.records.lock().unwrap();
            if let Some(record) = records.iter_mut().find(|a| &a.id == address_id) {
                record.full_name = input.full_name.clone();
            }
            Ok(())
        }

        async fn delete_address(
            &self,
            _auth: Option<&str>,
            address_id: &AddressId,
        ) -> Result<(), ApiError> {
            self.records.lock().unwrap().retain(|a| &a.id != address_id);
            Ok(())
        }

        async fn set_default_address(
            &self,
            _auth: Option<&str>,
            address_id: &AddressId,
        ) -> Result<(), ApiError> {
            let mut records = self.records.lock().unwrap();
            for record in records.iter_mut() {
                record.is_default = &record.id == address_id;
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_load_replaces_wholesale() {
        let backend = FakeBackend::default();
        backend.records.lock().unwrap().push(address("addr_1", true));

        let mut book = AddressBook::default();
        book.load(&backend, None).await.unwrap();
        assert_eq!(book.addresses().len(), 1);

        // Server-side change shows up on the next load, nothing is merged.
        backend.records.lock().unwrap().clear();
        book.load(&backend, None).await.unwrap();
        assert!(book.addresses().is_empty());
    }

    #[tokio::test]
    async fn test_every_mutation_reloads() {
        let backend = FakeBackend::default();
        let mut book = AddressBook::default();

        book.add(&backend, None, &input()).await.unwrap();
        let id = book.addresses()[0].id.clone();
        book.update(&backend, None, &id, &input()).await.unwrap();
        book.set_default(&backend, None, &id).await.unwrap();
        book.delete(&backend, None, &id).await.unwrap();

        assert_eq!(backend.list_calls.load(Ordering::SeqCst), 4);
        assert!(book.addresses().is_empty());
    }

    #[tokio::test]
    async fn test_set_default_visible_only_after_reload() {
        let backend = FakeBackend::default();
        {
            let mut records = backend.records.lock().unwrap();
            records.push(address("addr_1", true));
            records.push(address("addr_2", false));
        }

        let mut book = AddressBook::default();
        book.load(&backend, None).await.unwrap();
        book.set_default(&backend, None, &AddressId::new("addr_2"))
            .await
            .unwrap();

        let defaults: Vec<_> = book
            .addresses()
            .iter()
            .filter(|a| a.is_default)
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(defaults, vec!["addr_2"]);
    }

    #[tokio::test]
    async fn test_selection_is_local_and_validated() {
        let backend = FakeBackend::default();
        backend.records.lock().unwrap().push(address("addr_1", false));

        let mut book = AddressBook::default();
        book.load(&backend, None).await.unwrap();

        assert!(!book.select(AddressId::new("addr_missing")));
        assert!(book.select(AddressId::new("addr_1")));
        assert_eq!(book.selected().unwrap().id.as_str(), "addr_1");

        // Selecting is purely local: no extra backend traffic.
        assert_eq!(backend.list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_delete_clears_matching_selection() {
        let backend = FakeBackend::default();
        backend.records.lock().unwrap().push(address("addr_1", false));

        let mut book = AddressBook::default();
        book.load(&backend, None).await.unwrap();
        book.select(AddressId::new("addr_1"));
        book.delete(&backend, None, &AddressId::new("addr_1"))
            .await
            .unwrap();

        assert!(book.selected().is_none());
        assert!(book.selection().is_none());
    }

    #[tokio::test]
    async fn test_shipping_address_falls_back_to_default() {
        let backend = FakeBackend::default();
        {
            let mut records = backend.records.lock().unwrap();
            records.push(address("addr_1", true));
            records.push(address("addr_2", false));
        }

        let mut book = AddressBook::default();
        book.load(&backend, None).await.unwrap();
        assert_eq!(book.shipping_address().unwrap().id.as_str(), "addr_1");

        book.select(AddressId::new("addr_2"));
        assert_eq!(book.shipping_address().unwrap().id.as_str(), "addr_2");
    }
}
