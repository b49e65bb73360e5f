//! Cart route handlers.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use cartline_core::ProductId;

use crate::error::{Result, add_breadcrumb};
use crate::models::{CartListing, CartView};
use crate::routes::MessageResponse;
use crate::routes::extract::{ApiJson, ApiQuery, RequiredFields, nonzero, present};
use crate::services::CartService;
use crate::state::AppState;

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub customer_id: String,
    pub cart_name: String,
    pub product_id: ProductId,
    pub quantity: i32,
}

impl RequiredFields for AddToCartRequest {
    fn has_required_fields(&self) -> bool {
        present(&self.customer_id)
            && present(&self.cart_name)
            && nonzero(self.product_id)
            && nonzero(self.quantity)
    }
}

/// Query parameters for listing carts.
#[derive(Debug, Default, Deserialize)]
pub struct CartQuery {
    #[serde(default)]
    pub customer_id: String,
}

#[derive(Debug, Serialize)]
struct CartsResponse {
    carts: Vec<CartView>,
}

/// `POST /cart`
pub async fn add(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AddToCartRequest>,
) -> Result<Json<MessageResponse>> {
    let outcome = CartService::new(state.store())
        .add_to_cart(
            &request.customer_id,
            &request.cart_name,
            request.product_id,
            request.quantity,
        )
        .await?;

    let product_id = request.product_id.to_string();
    add_breadcrumb(
        "cart",
        outcome.message(),
        Some(&[("product_id", product_id.as_str())]),
    );

    Ok(Json(MessageResponse {
        message: outcome.message(),
    }))
}

/// `GET /showcartbyid`
pub async fn show(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CartQuery>,
) -> Result<Response> {
    let listing = CartService::new(state.store())
        .list_carts_for_customer(&query.customer_id)
        .await?;

    Ok(match listing {
        CartListing::NoCarts => Json(MessageResponse {
            message: "No carts found for this customer",
        })
        .into_response(),
        CartListing::Carts(carts) => Json(CartsResponse { carts }).into_response(),
    })
}
