//! Commerce backend API client.
//!
//! # Architecture
//!
//! - REST over JSON with `reqwest`; the backend is the source of truth -
//!   NO local sync, direct API calls
//! - In-memory caching via `moka` for catalog reads (5 minute TTL); cart,
//!   order, payment, and address calls are never cached
//! - Session-cookie auth: the browser's backend session token is stored in
//!   our session and forwarded on user-scoped calls
//!
//! # Response envelope
//!
//! Most endpoints wrap their payload in `{ code, message, result }`, where
//! specific numeric `code` values signal success per operation (not merely
//! HTTP status). A call counts as successful only when the transport call
//! succeeds (2xx) AND the envelope signals success - HTTP 200 with an error
//! code in the body is a failure and must be treated as one.
//!
//! # Example
//!
//! ```rust,ignore
//! use aurum_storefront::api::BackendClient;
//!
//! let client = BackendClient::new(&config.commerce);
//!
//! // Get a product (cached)
//! let product = client.get_product(&"ring-001".into()).await?;
//!
//! // Create an order for checkout
//! let order = client.create_order(&request).await?;
//! ```

mod cache;
mod client;
pub mod types;

pub use client::BackendClient;

use serde::Deserialize;
use thiserror::Error;

/// Per-operation success codes used by the backend envelope.
pub mod codes {
    /// Generic read success.
    pub const OK: i64 = 1000;
    /// Order created.
    pub const ORDER_CREATED: i64 = 1001;
    /// Address list fetched.
    pub const ADDRESS_LISTED: i64 = 4000;
    /// Address created.
    pub const ADDRESS_CREATED: i64 = 4001;
    /// Address updated.
    pub const ADDRESS_UPDATED: i64 = 4002;
    /// Address deleted.
    pub const ADDRESS_DELETED: i64 = 4003;
    /// Default address set.
    pub const ADDRESS_DEFAULT_SET: i64 = 4004;
}

/// Errors that can occur when talking to the commerce backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Non-success HTTP status from the backend.
    #[error("Backend returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// First part of the response body, for diagnostics.
        body: String,
    },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Transport succeeded but the envelope carried an error code.
    #[error("Backend rejected request (code {code}): {message}")]
    Envelope {
        /// Envelope `code` field.
        code: i64,
        /// Envelope `message` field.
        message: String,
    },
}

/// Response envelope used by most backend endpoints.
///
/// `success` is carried by some newer endpoints in addition to `code`; when
/// present it wins, otherwise the `code` is compared against the operation's
/// expected success code.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    /// Operation result code.
    pub code: i64,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// Payload, present on success.
    pub result: Option<T>,
    /// Explicit success flag (newer endpoints only).
    #[serde(default)]
    pub success: Option<bool>,
}

impl<T> Envelope<T> {
    /// Check the envelope against the operation's expected success code.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Envelope`] when the envelope signals failure.
    pub fn check(self, expected: i64) -> Result<Option<T>, ApiError> {
        let ok = self.success.map_or(self.code == expected, |s| s);
        if ok {
            Ok(self.result)
        } else {
            Err(ApiError::Envelope {
                code: self.code,
                message: self.message,
            })
        }
    }

    /// Like [`Envelope::check`], but a missing `result` is also a failure.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Envelope`] when the envelope signals failure or
    /// carries no payload.
    pub fn into_result(self, expected: i64) -> Result<T, ApiError> {
        let code = self.code;
        self.check(expected)?.ok_or(ApiError::Envelope {
            code,
            message: "missing result payload".to_string(),
        })
    }
}
