//! ProductAssetService - batch create, fetch, replace and delete of product
//! images and videos.
//!
//! Batches are fail-soft: each item is validated, named and stored on its
//! own and ends up as exactly one record at its input position.

use tracing::debug;

use crate::{
    models::{
        asset::{AssetRecord, NewAsset},
        namespace::Namespace,
    },
    services::{
        asset_error::{AssetError, AssetResult},
        asset_store::AssetStore,
        batch::{BatchOutcome, SplitOutcome, run_ordered, settle},
        media_type::MediaClass,
        naming,
    },
};

/// Public route product assets are served from.
pub const PRODUCT_ASSET_ROUTE: &str = "/public/assets/product";

const NAMESPACE: Namespace = Namespace::Product;
const DELETED_MESSAGE: &str = "asset deleted";

#[derive(Clone, Debug)]
pub struct ProductAssetService {
    store: AssetStore,
    public_base_url: String,
    concurrency: usize,
}

impl ProductAssetService {
    pub fn new(store: AssetStore, public_base_url: impl Into<String>, concurrency: usize) -> Self {
        Self {
            store,
            public_base_url: public_base_url.into(),
            concurrency: concurrency.max(1),
        }
    }

    /// Public URI a stored product asset is reachable at.
    pub fn access_uri(&self, name: &str) -> String {
        format!(
            "{}{}/{}",
            self.public_base_url.trim_end_matches('/'),
            PRODUCT_ASSET_ROUTE,
            name
        )
    }

    /// Store every upload under a freshly generated name.
    ///
    /// Fails as a whole only when no file was sent.
    pub async fn create_batch(&self, items: Vec<NewAsset>) -> AssetResult<BatchOutcome> {
        if items.is_empty() {
            return Err(AssetError::Validation(
                "at least one file must be sent".into(),
            ));
        }
        let records = run_ordered(items, self.concurrency, |item| self.create_one(item)).await;
        Ok(records.into())
    }

    /// Read every named asset; missing or unreadable ones become error records.
    pub async fn list_by_names(&self, names: Vec<String>) -> BatchOutcome {
        run_ordered(names, self.concurrency, |name| self.read_one(name))
            .await
            .into()
    }

    /// Delete every named asset and confirm or explain each one.
    pub async fn delete_batch(&self, names: Vec<String>) -> BatchOutcome {
        run_ordered(names, self.concurrency, |name| self.delete_one(name))
            .await
            .into()
    }

    /// Replace `names_to_delete[i]` with `new_items[i]` for every index.
    ///
    /// A failed deletion does not stop the replacement upload of the same
    /// index; both records are reported, deletion first.
    pub async fn replace_batch(
        &self,
        new_items: Vec<NewAsset>,
        names_to_delete: Vec<String>,
    ) -> AssetResult<SplitOutcome> {
        if new_items.is_empty() || names_to_delete.is_empty() {
            return Err(AssetError::Validation(
                "at least one file and one name to replace must be sent".into(),
            ));
        }
        if new_items.len() != names_to_delete.len() {
            return Err(AssetError::Validation(format!(
                "{} files sent to replace {} names, counts must match",
                new_items.len(),
                names_to_delete.len()
            )));
        }

        let pairs = names_to_delete.into_iter().zip(new_items);
        let results = run_ordered(pairs, self.concurrency, |(old, item)| async move {
            let deleted = self.delete_one(old).await;
            let created = self.create_one(item).await;
            [deleted, created]
        })
        .await;

        let outcome: BatchOutcome = results.into_iter().flatten().collect();
        Ok(outcome.split())
    }

    async fn create_one(&self, item: NewAsset) -> AssetRecord {
        let result = self.store_upload(&item).await.map(|name| {
            let uri = self.access_uri(&name);
            AssetRecord::created(name, item.filename.clone(), uri)
        });
        settle("create", None, item.filename.as_deref(), result)
    }

    async fn store_upload(&self, item: &NewAsset) -> AssetResult<String> {
        let content_type = item.content_type.as_deref().unwrap_or_default();
        let name = naming::derive_filename(
            content_type,
            &naming::unique_token(),
            MediaClass::ImageOrVideo,
        )?;
        self.store.save(NAMESPACE, &name, item.bytes.clone()).await?;
        debug!(
            "stored product asset {} ({} bytes, uploaded as {:?})",
            name,
            item.bytes.len(),
            item.filename
        );
        Ok(name)
    }

    async fn read_one(&self, name: String) -> AssetRecord {
        let result = self
            .store
            .read(NAMESPACE, &name)
            .await
            .map(|bytes| AssetRecord::with_bytes(name.as_str(), bytes));
        settle("read", Some(name.as_str()), None, result)
    }

    async fn delete_one(&self, name: String) -> AssetRecord {
        let result = self
            .store
            .delete(NAMESPACE, &name)
            .await
            .map(|()| AssetRecord::confirmed(name.as_str(), DELETED_MESSAGE));
        settle("delete", Some(name.as_str()), None, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::namespace::{DEFAULT_PLACEHOLDER, NamespaceRoots},
        services::asset_error::ErrorKind,
    };
    use bytes::Bytes;
    use tempfile::TempDir;

    async fn service() -> (TempDir, AssetStore, ProductAssetService) {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::new(NamespaceRoots::under(dir.path()));
        store.ensure_layout().await.unwrap();
        let service = ProductAssetService::new(store.clone(), "http://assets.test/", 4);
        (dir, store, service)
    }

    fn png(filename: &str, payload: &'static [u8]) -> NewAsset {
        NewAsset::new(filename, "image/png", Bytes::from_static(payload))
    }

    #[tokio::test]
    async fn create_stores_bytes_under_generated_name() {
        let (_dir, store, service) = service().await;

        let outcome = service
            .create_batch(vec![png("photo.png", b"png-bytes")])
            .await
            .unwrap();
        assert!(outcome.all_succeeded());

        let records = outcome.into_records();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        let name = record.name.clone().unwrap();
        assert!(name.ends_with(".png"));
        assert_eq!(record.original_name.as_deref(), Some("photo.png"));
        assert_eq!(
            record.source_uri.as_deref(),
            Some(format!("http://assets.test/public/assets/product/{}", name).as_str())
        );

        let stored = store.read(Namespace::Product, &name).await.unwrap();
        assert_eq!(stored, Bytes::from_static(b"png-bytes"));
    }

    #[tokio::test]
    async fn unsupported_type_writes_nothing() {
        let (_dir, store, service) = service().await;

        let outcome = service
            .create_batch(vec![NewAsset::new(
                "notes.txt",
                "text/plain",
                Bytes::from_static(b"hi"),
            )])
            .await
            .unwrap();

        let records = outcome.into_records();
        let record = &records[0];
        assert_eq!(record.error_kind, Some(ErrorKind::UnsupportedMediaType));
        assert_eq!(record.original_name.as_deref(), Some("notes.txt"));
        assert!(record.name.is_none());
        assert_eq!(store.count(Namespace::Product).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn one_bad_item_does_not_stop_the_batch() {
        let (_dir, store, service) = service().await;

        let mut missing_type = png("b.png", b"b");
        missing_type.content_type = None;
        let outcome = service
            .create_batch(vec![
                png("a.png", b"a"),
                missing_type,
                NewAsset::new("c.mp4", "video/mp4", Bytes::from_static(b"c")),
            ])
            .await
            .unwrap();

        let records = outcome.into_records();
        let errors: Vec<bool> = records.iter().map(|r| r.is_error()).collect();
        assert_eq!(errors, [false, true, false]);
        assert!(
            records[2]
                .name
                .as_deref()
                .unwrap()
                .ends_with(".mp4")
        );
        assert_eq!(store.count(Namespace::Product).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn empty_create_is_a_validation_error() {
        let (_dir, _store, service) = service().await;
        let err = service.create_batch(Vec::new()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn list_preserves_positions_around_missing_names() {
        let (_dir, store, service) = service().await;
        store
            .save(Namespace::Product, "a.png", Bytes::from_static(b"A"))
            .await
            .unwrap();
        store
            .save(Namespace::Product, "c.png", Bytes::from_static(b"C"))
            .await
            .unwrap();

        let records = service
            .list_by_names(vec!["a.png".into(), "b.png".into(), "c.png".into()])
            .await
            .into_records();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].bytes, Some(Bytes::from_static(b"A")));
        assert_eq!(records[1].name.as_deref(), Some("b.png"));
        assert_eq!(records[1].error_kind, Some(ErrorKind::NotFound));
        assert!(records[1].bytes.is_none());
        assert_eq!(records[2].bytes, Some(Bytes::from_static(b"C")));
    }

    #[tokio::test]
    async fn created_assets_round_trip_through_fetch() {
        let (_dir, _store, service) = service().await;
        let outcome = service
            .create_batch(vec![png("x.png", b"\x00\x01binary\xff")])
            .await
            .unwrap();
        let name = outcome.into_records()[0].name.clone().unwrap();

        let fetched = service.list_by_names(vec![name]).await.into_records();
        assert_eq!(
            fetched[0].bytes,
            Some(Bytes::from_static(b"\x00\x01binary\xff"))
        );
    }

    #[tokio::test]
    async fn delete_reports_each_name() {
        let (dir, store, service) = service().await;
        std::fs::write(dir.path().join("product").join(DEFAULT_PLACEHOLDER), b"d").unwrap();
        store
            .save(Namespace::Product, "old.png", Bytes::from_static(b"o"))
            .await
            .unwrap();

        let records = service
            .delete_batch(vec![
                DEFAULT_PLACEHOLDER.into(),
                "old.png".into(),
                "missing.png".into(),
            ])
            .await
            .into_records();

        assert_eq!(records[0].error_kind, Some(ErrorKind::ProtectedAsset));
        assert_eq!(records[1].message.as_deref(), Some(DELETED_MESSAGE));
        assert!(records[1].bytes.is_none());
        assert_eq!(records[2].error_kind, Some(ErrorKind::NotFound));
        assert!(!store.contains(Namespace::Product, "old.png").await.unwrap());
        assert!(
            store
                .contains(Namespace::Product, DEFAULT_PLACEHOLDER)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn placeholder_is_protected_even_when_absent() {
        let (_dir, _store, service) = service().await;
        let records = service
            .delete_batch(vec![DEFAULT_PLACEHOLDER.into()])
            .await
            .into_records();
        assert_eq!(records[0].error_kind, Some(ErrorKind::ProtectedAsset));
    }

    #[tokio::test]
    async fn replace_pairs_deletions_with_uploads() {
        let (_dir, store, service) = service().await;
        store
            .save(Namespace::Product, "old2.jpg", Bytes::from_static(b"old"))
            .await
            .unwrap();

        let split = service
            .replace_batch(
                vec![png("f1.png", b"one"), png("f2.png", b"two")],
                vec!["old1.jpg".into(), "old2.jpg".into()],
            )
            .await
            .unwrap();

        assert_eq!(split.failures.len(), 1);
        assert_eq!(split.failures[0].name.as_deref(), Some("old1.jpg"));
        assert_eq!(split.failures[0].error_kind, Some(ErrorKind::NotFound));

        // f1 upload, old2 deletion, f2 upload
        assert_eq!(split.successes.len(), 3);
        assert_eq!(split.successes[0].original_name.as_deref(), Some("f1.png"));
        assert_eq!(split.successes[1].name.as_deref(), Some("old2.jpg"));
        assert_eq!(split.successes[2].original_name.as_deref(), Some("f2.png"));

        assert!(!store.contains(Namespace::Product, "old2.jpg").await.unwrap());
        assert_eq!(store.count(Namespace::Product).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn replace_rejects_malformed_shapes_before_io() {
        let (_dir, store, service) = service().await;
        store
            .save(Namespace::Product, "keep.png", Bytes::from_static(b"k"))
            .await
            .unwrap();

        let err = service
            .replace_batch(Vec::new(), vec!["keep.png".into()])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = service
            .replace_batch(vec![png("a.png", b"a")], Vec::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = service
            .replace_batch(
                vec![png("a.png", b"a")],
                vec!["keep.png".into(), "other.png".into()],
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        assert!(store.contains(Namespace::Product, "keep.png").await.unwrap());
        assert_eq!(store.count(Namespace::Product).await.unwrap(), 1);
    }
}
