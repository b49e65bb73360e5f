//! Product catalog route handlers.

use axum::{
    Json,
    extract::State,
};
use serde::Deserialize;

use crate::error::Result;
use crate::models::Product;
use crate::routes::DataResponse;
use crate::routes::extract::ApiQuery;
use crate::services::CatalogService;
use crate::state::AppState;

/// Query parameters for product search.
///
/// A bound that is present but empty is invalid, not defaulted.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub description: String,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}

/// `GET /get/pd`
pub async fn index(State(state): State<AppState>) -> Result<Json<DataResponse<Vec<Product>>>> {
    let products = CatalogService::new(state.store()).list_all().await?;
    Ok(Json(DataResponse { data: products }))
}

/// `GET /get/searcP`
pub async fn search(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> Result<Json<DataResponse<Vec<Product>>>> {
    let products = CatalogService::new(state.store())
        .search(
            &query.description,
            query.min_price.as_deref(),
            query.max_price.as_deref(),
        )
        .await?;

    Ok(Json(DataResponse { data: products }))
}
