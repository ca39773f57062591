//! ProfileAssetService - single user profile pictures, images only.

use tracing::{debug, warn};

use crate::{
    models::{
        asset::{AssetRecord, NewAsset},
        namespace::{DEFAULT_PLACEHOLDER, Namespace},
    },
    services::{
        asset_error::{AssetError, AssetResult},
        asset_store::AssetStore,
        media_type::MediaClass,
        naming,
    },
};

const NAMESPACE: Namespace = Namespace::Profile;

#[derive(Clone, Debug)]
pub struct ProfileAssetService {
    store: AssetStore,
}

impl ProfileAssetService {
    pub fn new(store: AssetStore) -> Self {
        Self { store }
    }

    /// Store a profile picture and return its generated name.
    pub async fn upload(&self, item: NewAsset) -> AssetResult<String> {
        let name = Self::name_for(&item)?;
        self.store.save(NAMESPACE, &name, item.bytes).await?;
        debug!("stored profile picture {}", name);
        Ok(name)
    }

    pub async fn fetch(&self, name: &str) -> AssetResult<AssetRecord> {
        let bytes = self.store.read(NAMESPACE, name).await?;
        Ok(AssetRecord::with_bytes(name, bytes))
    }

    /// Swap `name_to_replace` for a new picture and return the new name.
    ///
    /// The new picture is stored before the previous one is removed, so a
    /// failed write leaves the previous picture in place. When the previous
    /// picture cannot be removed the new one is withdrawn again. A previous
    /// picture that is already gone is not an error.
    pub async fn replace(&self, item: NewAsset, name_to_replace: &str) -> AssetResult<String> {
        if name_to_replace.trim().is_empty() {
            return Err(AssetError::Validation(
                "the name of the picture to replace must be sent".into(),
            ));
        }
        if name_to_replace == DEFAULT_PLACEHOLDER {
            return Err(AssetError::ProtectedAsset(name_to_replace.to_string()));
        }
        let name = Self::name_for(&item)?;

        self.store.save(NAMESPACE, &name, item.bytes).await?;

        match self.store.delete(NAMESPACE, name_to_replace).await {
            Ok(()) => {}
            Err(err @ AssetError::NotFound { .. }) => warn!("replacing profile picture: {}", err),
            Err(err) => {
                if let Err(cleanup) = self.store.delete(NAMESPACE, &name).await {
                    warn!("could not withdraw profile picture {}: {}", name, cleanup);
                }
                return Err(err);
            }
        }

        debug!("replaced profile picture {} with {}", name_to_replace, name);
        Ok(name)
    }

    pub async fn delete(&self, name: &str) -> AssetResult<AssetRecord> {
        self.store.delete(NAMESPACE, name).await?;
        Ok(AssetRecord::confirmed(name, "profile picture deleted"))
    }

    fn name_for(item: &NewAsset) -> AssetResult<String> {
        naming::derive_filename(
            item.content_type.as_deref().unwrap_or_default(),
            &naming::unique_token(),
            MediaClass::ImageOnly,
        )
    }
}
