//! Order asset endpoints, used by the order backend when an order is placed.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    errors::AppError,
    models::asset::AssetRecord,
    services::{AppState, order_service::OrderAsset},
};

pub const ORDER_ASSET_ROUTE: &str = "/client/assets/order";

/// Body of `POST /client/assets/order`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeriveOrderAssetReq {
    /// Name of the product's first image in the product namespace.
    pub source_name: String,
    pub product_id: i64,
}

/// `GET /client/assets/order/{name}`
pub async fn get_order_asset(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<AssetRecord>, AppError> {
    Ok(Json(state.orders.fetch(&name).await?))
}

/// `POST /client/assets/order`
///
/// 201 with a `Location` header when the copy was made now, 200 when an
/// existing copy is reused. The body only carries the name.
pub async fn derive_order_asset(
    State(state): State<AppState>,
    Json(req): Json<DeriveOrderAssetReq>,
) -> Result<Response, AppError> {
    let asset = state
        .orders
        .derive_or_reuse(&req.source_name, req.product_id)
        .await?;

    let body = Json(AssetRecord::named(asset.name()));
    let response = match asset {
        OrderAsset::Created(name) => {
            let mut response = (StatusCode::CREATED, body).into_response();
            let location = format!("{}/{}", ORDER_ASSET_ROUTE, name);
            if let Ok(value) = HeaderValue::from_str(&location) {
                response.headers_mut().insert(header::LOCATION, value);
            }
            response
        }
        OrderAsset::Reused(_) => (StatusCode::OK, body).into_response(),
    };
    Ok(response)
}
