//! Commerce backend REST client implementation.
//!
//! Uses `reqwest` 0.13 for HTTP and `moka` for catalog caching (5-minute
//! TTL). User-scoped calls forward the backend session cookie captured at
//! login; unauthenticated calls simply omit it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use aurum_core::{AddressId, OrderId, Price, ProductId};

use crate::api::cache::CacheValue;
use crate::api::types::{
    Address, AddressInput, CreateOrderRequest, CreatedOrder, OrderSummary, Product, ProductPage,
    Profile, VerifiedPayment,
};
use crate::api::{ApiError, Envelope, codes};
use crate::checkout::address::AddressBackend;
use crate::checkout::gateway::PaymentConfirmation;
use crate::checkout::orchestrator::OrderBackend;
use crate::config::CommerceApiConfig;

/// Name of the cookie carrying the backend session token.
const BACKEND_SESSION_COOKIE: &str = "connect.sid";

// =============================================================================
// BackendClient
// =============================================================================

/// Client for the commerce backend API.
///
/// Provides typed access to the catalog, orders, payments, addresses, and
/// account reads. Catalog responses are cached for 5 minutes; everything
/// else is live.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, CacheValue>,
}

impl BackendClient {
    /// Create a new backend API client.
    ///
    /// # Panics
    ///
    /// Panics if the underlying `reqwest` client cannot be constructed,
    /// which only happens when the TLS backend is unavailable at startup.
    #[must_use]
    pub fn new(config: &CommerceApiConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("reqwest client construction only fails without a TLS backend");

        Self {
            inner: Arc::new(BackendClientInner {
                client,
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
                cache,
            }),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.inner.base_url)
    }

    /// Attach the forwarded backend session cookie, when present.
    fn with_auth(builder: reqwest::RequestBuilder, auth: Option<&str>) -> reqwest::RequestBuilder {
        match auth {
            Some(token) => builder.header(
                reqwest::header::COOKIE,
                format!("{BACKEND_SESSION_COOKIE}={token}"),
            ),
            None => builder,
        }
    }

    /// Send a request and decode the response body.
    ///
    /// Handles rate limiting and non-success statuses before attempting to
    /// parse; the body is read as text first for better error diagnostics.
    async fn send<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(body.chars().take(200).collect()));
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "Failed to parse backend response"
                );
                Err(ApiError::Parse(e))
            }
        }
    }

    // =========================================================================
    // Catalog Methods
    // =========================================================================

    /// Get a product by its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product(&self, product_id: &ProductId) -> Result<Product, ApiError> {
        let cache_key = format!("product:{product_id}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = self.endpoint(&format!("products/{product_id}"));
        let envelope: Envelope<Product> = self.send(self.inner.client.get(url)).await?;
        let product = envelope.into_result(codes::OK)?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get a paginated list of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products(
        &self,
        page: u32,
        category: Option<&str>,
    ) -> Result<ProductPage, ApiError> {
        let cache_key = format!("products:{page}:{}", category.unwrap_or(""));

        // Check cache (only for uncategorized listings)
        if category.is_none()
            && let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let url = self.endpoint("products");
        let mut query = vec![("page", page.to_string())];
        if let Some(category) = category {
            query.push(("category", category.to_string()));
        }

        let envelope: Envelope<ProductPage> =
            self.send(self.inner.client.get(url).query(&query)).await?;
        let listing = envelope.into_result(codes::OK)?;

        if category.is_none() {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Products(listing.clone()))
                .await;
        }

        Ok(listing)
    }

    // =========================================================================
    // Order & Payment Methods (not cached - money)
    // =========================================================================

    /// Create an order for the current cart total.
    ///
    /// The create-order endpoint answers with the bare order identifiers on
    /// success but may answer HTTP 200 with an envelope-style error body.
    /// Both shapes are decoded and the error shape is surfaced as
    /// [`ApiError::Envelope`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails at the transport level or the
    /// backend refuses to create the order.
    #[instrument(skip(self, auth, request), fields(receipt = %request.receipt))]
    pub async fn create_order(
        &self,
        auth: Option<&str>,
        request: &CreateOrderRequest,
    ) -> Result<CreatedOrder, ApiError> {
        let url = self.endpoint("payments/create-order");
        let builder = Self::with_auth(self.inner.client.post(url), auth).json(request);
        let response: CreateOrderResponse = self.send(builder).await?;
        response.into_result()
    }

    /// Verify a completed widget payment against the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails at the transport level or the
    /// backend does not confirm the payment.
    #[instrument(skip_all, fields(order_id = %confirmation.razorpay_order_id))]
    pub async fn verify_payment(
        &self,
        auth: Option<&str>,
        confirmation: &PaymentConfirmation,
    ) -> Result<VerifiedPayment, ApiError> {
        let url = self.endpoint("payments/payment/verify");
        let builder = Self::with_auth(self.inner.client.post(url), auth).json(confirmation);
        let response: VerifyPaymentResponse = self.send(builder).await?;

        if response.success {
            Ok(VerifiedPayment {
                message: response.message,
                order: response.order,
            })
        } else {
            Err(ApiError::Envelope {
                code: response.code.unwrap_or(0),
                message: response.message,
            })
        }
    }

    // =========================================================================
    // Address Methods (user-scoped, never cached)
    // =========================================================================

    /// Fetch the user's saved addresses.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the envelope signals
    /// failure.
    #[instrument(skip(self, auth))]
    pub async fn list_addresses(&self, auth: Option<&str>) -> Result<Vec<Address>, ApiError> {
        let url = self.endpoint("user/addresses");
        let builder = Self::with_auth(self.inner.client.get(url), auth);
        let envelope: Envelope<Vec<Address>> = self.send(builder).await?;
        envelope.into_result(codes::ADDRESS_LISTED)
    }

    /// Create a new address.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the envelope signals
    /// failure.
    #[instrument(skip(self, auth, input))]
    pub async fn create_address(
        &self,
        auth: Option<&str>,
        input: &AddressInput,
    ) -> Result<(), ApiError> {
        let url = self.endpoint("user/addresses");
        let builder = Self::with_auth(self.inner.client.post(url), auth).json(input);
        let envelope: Envelope<Address> = self.send(builder).await?;
        envelope.check(codes::ADDRESS_CREATED).map(|_| ())
    }

    /// Update an existing address.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the envelope signals
    /// failure.
    #[instrument(skip(self, auth, input), fields(address_id = %address_id))]
    pub async fn update_address(
        &self,
        auth: Option<&str>,
        address_id: &AddressId,
        input: &AddressInput,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("user/addresses/{address_id}"));
        let builder = Self::with_auth(self.inner.client.put(url), auth).json(input);
        let envelope: Envelope<Address> = self.send(builder).await?;
        envelope.check(codes::ADDRESS_UPDATED).map(|_| ())
    }

    /// Delete an address.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the envelope signals
    /// failure.
    #[instrument(skip(self, auth), fields(address_id = %address_id))]
    pub async fn delete_address(
        &self,
        auth: Option<&str>,
        address_id: &AddressId,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("user/addresses/{address_id}"));
        let builder = Self::with_auth(self.inner.client.delete(url), auth);
        let envelope: Envelope<serde_json::Value> = self.send(builder).await?;
        envelope.check(codes::ADDRESS_DELETED).map(|_| ())
    }

    /// Mark an address as the user's default.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the envelope signals
    /// failure.
    #[instrument(skip(self, auth), fields(address_id = %address_id))]
    pub async fn set_default_address(
        &self,
        auth: Option<&str>,
        address_id: &AddressId,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("user/addresses/{address_id}/default"));
        let builder = Self::with_auth(self.inner.client.post(url), auth);
        let envelope: Envelope<serde_json::Value> = self.send(builder).await?;
        envelope.check(codes::ADDRESS_DEFAULT_SET).map(|_| ())
    }

    // =========================================================================
    // Account Methods
    // =========================================================================

    /// Fetch the user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the envelope signals
    /// failure.
    #[instrument(skip(self, auth))]
    pub async fn get_profile(&self, auth: Option<&str>) -> Result<Profile, ApiError> {
        let url = self.endpoint("user/profile");
        let builder = Self::with_auth(self.inner.client.get(url), auth);
        let envelope: Envelope<Profile> = self.send(builder).await?;
        envelope.into_result(codes::OK)
    }

    /// Fetch the user's order history.
    ///
    /// Always fetched fresh; there is no client-side order cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the envelope signals
    /// failure.
    #[instrument(skip(self, auth))]
    pub async fn get_orders(&self, auth: Option<&str>) -> Result<Vec<OrderSummary>, ApiError> {
        let url = self.endpoint("user/orders");
        let builder = Self::with_auth(self.inner.client.get(url), auth);
        let envelope: Envelope<Vec<OrderSummary>> = self.send(builder).await?;
        envelope.into_result(codes::OK)
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate a cached product.
    pub async fn invalidate_product(&self, product_id: &ProductId) {
        let cache_key = format!("product:{product_id}");
        self.inner.cache.invalidate(&cache_key).await;
    }

    /// Invalidate all cached catalog data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

// =============================================================================
// Wire Shapes
// =============================================================================

/// Lenient decoding of the create-order response.
///
/// On success the backend answers `{ id, amount, currency }`; on failure it
/// may answer HTTP 200 with `{ code, message }`.
#[derive(Debug, Deserialize)]
struct CreateOrderResponse {
    id: Option<OrderId>,
    amount: Option<Price>,
    currency: Option<String>,
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    success: Option<bool>,
}

impl CreateOrderResponse {
    fn into_result(self) -> Result<CreatedOrder, ApiError> {
        let refused = self.success == Some(false)
            || self
                .code
                .is_some_and(|code| code != codes::ORDER_CREATED && code != codes::OK);

        if refused || self.id.is_none() {
            return Err(ApiError::Envelope {
                code: self.code.unwrap_or(0),
                message: self
                    .message
                    .unwrap_or_else(|| "order creation refused".to_string()),
            });
        }

        // id presence checked above
        let id = self.id.unwrap_or_else(|| OrderId::new(""));
        Ok(CreatedOrder {
            id,
            amount: self.amount.unwrap_or(Price::ZERO),
            currency: self.currency.unwrap_or_else(|| "INR".to_string()),
        })
    }
}

#[derive(Debug, Deserialize)]
struct VerifyPaymentResponse {
    success: bool,
    #[serde(default)]
    message: String,
    order: Option<OrderSummary>,
    code: Option<i64>,
}

// =============================================================================
// Checkout Capability Impls
// =============================================================================

#[async_trait]
impl OrderBackend for BackendClient {
    async fn create_order(
        &self,
        auth: Option<&str>,
        request: &CreateOrderRequest,
    ) -> Result<CreatedOrder, ApiError> {
        Self::create_order(self, auth, request).await
    }

    async fn verify_payment(
        &self,
        auth: Option<&str>,
        confirmation: &PaymentConfirmation,
    ) -> Result<VerifiedPayment, ApiError> {
        Self::verify_payment(self, auth, confirmation).await
    }
}

#[async_trait]
impl AddressBackend for BackendClient {
    async fn list_addresses(&self, auth: Option<&str>) -> Result<Vec<Address>, ApiError> {
        Self::list_addresses(self, auth).await
    }

    async fn create_address(
        &self,
        auth: Option<&str>,
        input: &AddressInput,
    ) -> Result<(), ApiError> {
        Self::create_address(self, auth, input).await
    }

    async fn update_address(
        &self,
        auth: Option<&str>,
        address_id: &AddressId,
        input: &AddressInput,
    ) -> Result<(), ApiError> {
        Self::update_address(self, auth, address_id, input).await
    }

    async fn delete_address(
        &self,
        auth: Option<&str>,
        address_id: &AddressId,
    ) -> Result<(), ApiError> {
        Self::delete_address(self, auth, address_id).await
    }

    async fn set_default_address(
        &self,
        auth: Option<&str>,
        address_id: &AddressId,
    ) -> Result<(), ApiError> {
        Self::set_default_address(self, auth, address_id).await
    }
}
