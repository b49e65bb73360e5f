//! Authentication route handlers.
//!
//! Login and registration. Neither issues a session or token; a successful
//! call answers with the customer record, password omitted.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::{Result, set_sentry_user};
use crate::models::CustomerView;
use crate::routes::extract::{ApiJson, RequiredFields, present};
use crate::services::{CustomerService, Registration};
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl RequiredFields for LoginRequest {
    fn has_required_fields(&self) -> bool {
        present(&self.email) && present(&self.password)
    }
}

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub password: String,
}

impl RequiredFields for RegisterRequest {
    fn has_required_fields(&self) -> bool {
        [
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.phone_number,
            &self.address,
            &self.password,
        ]
        .into_iter()
        .all(|field| present(field))
    }
}

impl From<RegisterRequest> for Registration {
    fn from(request: RegisterRequest) -> Self {
        Self {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone_number: request.phone_number,
            address: request.address,
            password: request.password,
        }
    }
}

/// Response carrying a message and the (redacted) customer.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub message: &'static str,
    pub user: CustomerView,
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /auth/login`
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<UserResponse>> {
    let customer = CustomerService::new(state.store(), state.hasher())
        .login(&request.email, &request.password)
        .await?;

    set_sentry_user(&customer.id, Some(customer.email.as_str()));
    tracing::info!(customer_id = %customer.id, "Customer logged in");

    Ok(Json(UserResponse {
        message: "Login successful",
        user: CustomerView::redacted(customer),
    }))
}

/// `POST /auth/register`
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<Json<UserResponse>> {
    let customer = CustomerService::new(state.store(), state.hasher())
        .register(request.into())
        .await?;

    Ok(Json(UserResponse {
        message: "Registration successful",
        user: CustomerView::redacted(customer),
    }))
}
