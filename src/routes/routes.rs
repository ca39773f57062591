//! Defines routes for all asset operations.
//!
//! ## Structure
//! - **Product assets** (images and videos)
//!   - `GET    /public/assets/product/{names}` - fetch by comma separated names
//!   - `POST   /admin/assets/product`          - create a batch
//!   - `PUT    /admin/assets/product`          - replace a batch
//!   - `DELETE /admin/assets/product/{names}`  - delete a batch
//!
//! - **Order assets**
//!   - `POST   /client/assets/order`           - derive or reuse from a product image
//!   - `GET    /client/assets/order/{name}`    - fetch
//!
//! - **Profile pictures**
//!   - `POST   /client/assets/profile`         - upload
//!   - `GET|PUT|DELETE /client/assets/profile/{name}`
//!
//! Authorization of the `admin` and `client` scopes happens in front of
//! this service.

use crate::{
    handlers::{
        health_handlers::{healthz, readyz},
        order_handlers::{derive_order_asset, get_order_asset},
        product_handlers::{
            create_product_assets, delete_product_assets, list_product_assets,
            replace_product_assets,
        },
        profile_handlers::{
            delete_profile_picture, get_profile_picture, replace_profile_picture,
            upload_profile_picture,
        },
    },
    services::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};

/// Build and return the router for all asset routes.
///
/// The router carries shared state (`AppState`) to all handlers and caps
/// request bodies at `max_upload_bytes`.
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Product assets
        .route("/public/assets/product/{names}", get(list_product_assets))
        .route(
            "/admin/assets/product",
            post(create_product_assets).put(replace_product_assets),
        )
        .route("/admin/assets/product/{names}", delete(delete_product_assets))
        // Order assets
        .route("/client/assets/order", post(derive_order_asset))
        .route("/client/assets/order/{name}", get(get_order_asset))
        // Profile pictures
        .route("/client/assets/profile", post(upload_profile_picture))
        .route(
            "/client/assets/profile/{name}",
            get(get_profile_picture)
                .put(replace_profile_picture)
                .delete(delete_profile_picture),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}
