//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers return `Result<T, AppError>`.
//! Every error response body is `{"error": "<message>"}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{CartError, CatalogError, CustomerError};

/// Message for request bodies that fail the required-field rules.
pub const INVALID_INPUT: &str = "Invalid input";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Customer operation failed.
    #[error("Customer error: {0}")]
    Customer(#[from] CustomerError),

    /// Catalog operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Status code and client-facing message.
    ///
    /// Internal error details never reach the client.
    fn status_and_message(&self) -> (StatusCode, &str) {
        const INTERNAL: &str = "Internal server error";

        match self {
            Self::Database(_) | Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            Self::Customer(err) => match err {
                CustomerError::InvalidEmail(_) => (StatusCode::BAD_REQUEST, "Invalid email address"),
                CustomerError::InvalidCredentials => {
                    (StatusCode::UNAUTHORIZED, "Invalid email or password")
                }
                CustomerError::WrongOldPassword => {
                    (StatusCode::UNAUTHORIZED, "Invalid old password")
                }
                CustomerError::NotFound => (StatusCode::NOT_FOUND, "Customer not found"),
                CustomerError::EmailTaken => (StatusCode::CONFLICT, "Email already exists"),
                CustomerError::Repository(_) | CustomerError::PasswordHash(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL)
                }
            },
            Self::Catalog(err) => match err {
                CatalogError::InvalidMinPrice => (StatusCode::BAD_REQUEST, "Invalid min_price"),
                CatalogError::InvalidMaxPrice => (StatusCode::BAD_REQUEST, "Invalid max_price"),
                CatalogError::Repository(_) => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL),
            },
            Self::Cart(err) => match err {
                CartError::MissingCustomerId => (StatusCode::BAD_REQUEST, "customer_id is required"),
                CartError::InvalidCustomerId(_) => (StatusCode::BAD_REQUEST, "Invalid customer_id"),
                CartError::ProductMissing(_) | CartError::Repository(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL)
                }
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a customer ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added product", Some(&[("product_id", "7")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
