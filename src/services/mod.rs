//! Asset management engine: naming, media-type checks, blob storage and
//! the batch services built on top of them.

pub mod asset_error;
pub mod asset_store;
pub mod batch;
pub mod media_type;
pub mod naming;
pub mod order_service;
pub mod product_service;
pub mod profile_service;

use crate::{config::AppConfig, models::namespace::NamespaceRoots};

use self::{
    asset_store::AssetStore, order_service::OrderAssetService,
    product_service::ProductAssetService, profile_service::ProfileAssetService,
};

/// Shared state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub store: AssetStore,
    pub products: ProductAssetService,
    pub orders: OrderAssetService,
    pub profiles: ProfileAssetService,
}

impl AppState {
    pub fn new(roots: NamespaceRoots, public_base_url: &str, batch_concurrency: usize) -> Self {
        let store = AssetStore::new(roots);
        Self {
            products: ProductAssetService::new(store.clone(), public_base_url, batch_concurrency),
            orders: OrderAssetService::new(store.clone()),
            profiles: ProfileAssetService::new(store.clone()),
            store,
        }
    }

    pub fn from_config(cfg: &AppConfig) -> Self {
        Self::new(
            cfg.namespace_roots(),
            &cfg.public_base_url,
            cfg.batch_concurrency,
        )
    }
}
