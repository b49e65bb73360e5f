//! Customer account route handlers.
//!
//! The address and password endpoints answer with the full customer record,
//! including the stored password hash. Existing API clients read it back, so
//! it stays; every other endpoint omits it.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::CustomerView;
use crate::routes::DataResponse;
use crate::routes::extract::{ApiJson, RequiredFields, present};
use crate::services::CustomerService;
use crate::state::AppState;

/// Address update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateAddressRequest {
    pub customer_id: String,
    pub new_address: String,
}

impl RequiredFields for UpdateAddressRequest {
    fn has_required_fields(&self) -> bool {
        present(&self.customer_id) && present(&self.new_address)
    }
}

/// Password change request body.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub customer_id: String,
    pub old_password: String,
    pub new_password: String,
}

impl RequiredFields for ChangePasswordRequest {
    fn has_required_fields(&self) -> bool {
        present(&self.customer_id) && present(&self.old_password) && present(&self.new_password)
    }
}

/// Response carrying a message and the customer with its password hash.
#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub message: &'static str,
    pub customer: CustomerView,
}

/// `GET /get/user`
pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<CustomerView>>>> {
    let customers = CustomerService::new(state.store(), state.hasher())
        .list_all()
        .await?;

    Ok(Json(DataResponse {
        data: customers.into_iter().map(CustomerView::redacted).collect(),
    }))
}

/// `PUT /upAdd`
pub async fn update_address(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UpdateAddressRequest>,
) -> Result<Json<CustomerResponse>> {
    let customer = CustomerService::new(state.store(), state.hasher())
        .update_address(&request.customer_id, &request.new_address)
        .await?;

    Ok(Json(CustomerResponse {
        message: "Address updated successfully",
        customer: CustomerView::with_password_hash(customer),
    }))
}

/// `PUT /changePass`
pub async fn change_password(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ChangePasswordRequest>,
) -> Result<Json<CustomerResponse>> {
    let customer = CustomerService::new(state.store(), state.hasher())
        .change_password(
            &request.customer_id,
            &request.old_password,
            &request.new_password,
        )
        .await?;

    Ok(Json(CustomerResponse {
        message: "Password updated successfully",
        customer: CustomerView::with_password_hash(customer),
    }))
}
