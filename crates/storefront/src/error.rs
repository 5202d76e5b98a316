//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Nothing here is fatal to the process: every failure bubbles to a
//! UI-visible JSON body and the user recovers by retrying or navigating.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::api::ApiError;
use crate::checkout::CheckoutError;
use crate::checkout::form::FormErrors;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Commerce backend API operation failed.
    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    /// Checkout flow error.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body returned to the page layer.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<FormErrors>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Session(_) | Self::Internal(_) | Self::Api(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Api(err) => match err {
                ApiError::NotFound(_) => StatusCode::NOT_FOUND,
                ApiError::RateLimited(_) => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Checkout(err) => match err {
                CheckoutError::EmptyCart | CheckoutError::InvalidCustomer(_) => {
                    StatusCode::BAD_REQUEST
                }
                CheckoutError::AttemptInProgress
                | CheckoutError::NoActiveAttempt
                | CheckoutError::AttemptMismatch => StatusCode::CONFLICT,
                CheckoutError::GatewayUnavailable => StatusCode::SERVICE_UNAVAILABLE,
                CheckoutError::OrderCreation(_) | CheckoutError::Verification(_) => {
                    StatusCode::BAD_GATEWAY
                }
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients; checkout errors
        // are the user-facing ones and surface verbatim.
        let (message, fields) = match self {
            Self::Session(_) | Self::Internal(_) => ("Internal server error".to_string(), None),
            Self::Api(ApiError::NotFound(_)) => ("Not found".to_string(), None),
            Self::Api(_) => ("External service error".to_string(), None),
            Self::Checkout(CheckoutError::InvalidCustomer(fields)) => {
                ("invalid customer details".to_string(), Some(fields))
            }
            Self::Checkout(err) => (err.to_string(), None),
            other => (other.to_string(), None),
        };

        (status, Json(ErrorBody { error: message, fields })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
