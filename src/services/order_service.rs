//! OrderAssetService - the order picture is a copy of the product's first
//! image, stored once under a name derived from the product id and reused
//! by every later order of that product.

use tracing::{debug, info};

use crate::{
    models::{asset::AssetRecord, namespace::Namespace},
    services::{
        asset_error::{AssetError, AssetResult},
        asset_store::AssetStore,
        naming,
    },
};

/// Result of a derive-or-reuse request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OrderAsset {
    /// An order asset for the source already existed; nothing was written.
    Reused(String),
    /// The source bytes were copied under a newly derived name.
    Created(String),
}

impl OrderAsset {
    pub fn name(&self) -> &str {
        match self {
            OrderAsset::Reused(name) | OrderAsset::Created(name) => name,
        }
    }
}

#[derive(Clone, Debug)]
pub struct OrderAssetService {
    store: AssetStore,
}

impl OrderAssetService {
    pub fn new(store: AssetStore) -> Self {
        Self { store }
    }

    /// Read an order asset by its stored name.
    pub async fn fetch(&self, name: &str) -> AssetResult<AssetRecord> {
        let bytes = self.store.read(Namespace::Order, name).await?;
        Ok(AssetRecord::with_bytes(name, bytes))
    }

    /// Return the order asset for `source_name`, copying it from the product
    /// namespace the first time it is requested.
    ///
    /// Lookup checks the exact derived name, then any earlier copy whose
    /// name ends with `-<source_name>`. Materialization publishes with
    /// create-if-absent, so two concurrent first requests cannot both write:
    /// the loser observes the collision and reuses the winner's copy.
    pub async fn derive_or_reuse(
        &self,
        source_name: &str,
        product_id: i64,
    ) -> AssetResult<OrderAsset> {
        let derived = naming::derive_order_asset_name(product_id, source_name)?;

        if self.store.contains(Namespace::Order, &derived).await? {
            debug!("order asset {} already present", derived);
            return Ok(OrderAsset::Reused(derived));
        }
        if let Some(existing) = self
            .store
            .exists(Namespace::Order, &format!("-{}", source_name))
            .await?
        {
            debug!("reusing order asset {} for {}", existing, source_name);
            return Ok(OrderAsset::Reused(existing));
        }

        let bytes = self.store.read(Namespace::Product, source_name).await?;
        match self.store.save(Namespace::Order, &derived, bytes).await {
            Ok(()) => {
                info!("materialized order asset {} from {}", derived, source_name);
                Ok(OrderAsset::Created(derived))
            }
            Err(AssetError::AlreadyExists { .. }) => {
                debug!("order asset {} written concurrently, reusing", derived);
                Ok(OrderAsset::Reused(derived))
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::namespace::NamespaceRoots, services::asset_error::ErrorKind};
    use bytes::Bytes;
    use tempfile::TempDir;

    async fn service_with_source() -> (TempDir, AssetStore, OrderAssetService) {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::new(NamespaceRoots::under(dir.path()));
        store.ensure_layout().await.unwrap();
        store
            .save(
                Namespace::Product,
                "abc1700000000000.jpeg",
                Bytes::from_static(b"product-image"),
            )
            .await
            .unwrap();
        (dir, store.clone(), OrderAssetService::new(store))
    }

    #[tokio::test]
    async fn first_request_copies_product_bytes() {
        let (_dir, store, service) = service_with_source().await;

        let asset = service
            .derive_or_reuse("abc1700000000000.jpeg", 9)
            .await
            .unwrap();
        assert_eq!(
            asset,
            OrderAsset::Created("PRODID9-abc1700000000000.jpeg".into())
        );

        let copied = service.fetch(asset.name()).await.unwrap();
        assert_eq!(copied.bytes, Some(Bytes::from_static(b"product-image")));
        assert_eq!(store.count(Namespace::Order).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn second_request_reuses_without_writing() {
        let (_dir, store, service) = service_with_source().await;

        let first = service
            .derive_or_reuse("abc1700000000000.jpeg", 9)
            .await
            .unwrap();
        let second = service
            .derive_or_reuse("abc1700000000000.jpeg", 9)
            .await
            .unwrap();

        assert_eq!(second, OrderAsset::Reused(first.name().to_string()));
        assert_eq!(store.count(Namespace::Order).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn earlier_copy_under_another_product_id_is_reused() {
        let (_dir, store, service) = service_with_source().await;
        store
            .save(
                Namespace::Order,
                "PRODID3-abc1700000000000.jpeg",
                Bytes::from_static(b"old-copy"),
            )
            .await
            .unwrap();

        let asset = service
            .derive_or_reuse("abc1700000000000.jpeg", 9)
            .await
            .unwrap();
        assert_eq!(
            asset,
            OrderAsset::Reused("PRODID3-abc1700000000000.jpeg".into())
        );
        assert_eq!(store.count(Namespace::Order).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn concurrent_first_requests_yield_one_copy() {
        let (_dir, store, service) = service_with_source().await;

        let (a, b) = tokio::join!(
            service.derive_or_reuse("abc1700000000000.jpeg", 9),
            service.derive_or_reuse("abc1700000000000.jpeg", 9),
        );
        assert_eq!(a.unwrap().name(), b.unwrap().name());
        assert_eq!(store.count(Namespace::Order).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn video_sources_are_rejected() {
        let (_dir, store, service) = service_with_source().await;
        let err = service.derive_or_reuse("clip.mp4", 9).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedMediaType);
        assert_eq!(store.count(Namespace::Order).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_source_is_not_found() {
        let (_dir, store, service) = service_with_source().await;
        let err = service.derive_or_reuse("ghost.png", 9).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(store.count(Namespace::Order).await.unwrap(), 0);
    }
}
