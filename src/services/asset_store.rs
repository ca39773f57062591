//! src/services/asset_store.rs
//!
//! AssetStore - save, read and delete single named blobs under a namespace
//! root on local disk. Namespaces are flat directories; the filename is the
//! lookup key. Blobs are immutable once published: there is no overwrite and
//! no append.

use bytes::Bytes;
use std::{
    fs as std_fs,
    io::{self, ErrorKind, Write},
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    models::namespace::{DEFAULT_PLACEHOLDER, Namespace, NamespaceRoots},
    services::asset_error::{AssetError, AssetResult},
};

const MAX_ASSET_NAME_LEN: usize = 255;
const TMP_PREFIX: &str = ".tmp-";

/// Blob storage over the namespace directories.
///
/// All operations block on filesystem I/O; none of them applies a timeout.
#[derive(Clone, Debug)]
pub struct AssetStore {
    roots: Arc<NamespaceRoots>,
}

impl AssetStore {
    pub fn new(roots: NamespaceRoots) -> Self {
        Self {
            roots: Arc::new(roots),
        }
    }

    pub fn roots(&self) -> &NamespaceRoots {
        &self.roots
    }

    /// Create every namespace directory that is missing and sweep temp
    /// files left behind by writes that never completed.
    pub async fn ensure_layout(&self) -> AssetResult<()> {
        for namespace in Namespace::ALL {
            let root = self.roots.root(namespace);
            fs::create_dir_all(root).await?;
            self.sweep_temp_files(root).await?;
        }
        Ok(())
    }

    async fn sweep_temp_files(&self, root: &Path) -> AssetResult<()> {
        let mut entries = fs::read_dir(root).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_name().to_string_lossy().starts_with(TMP_PREFIX) {
                continue;
            }
            let path = entry.path();
            match fs::remove_file(&path).await {
                Ok(()) => debug!("swept stale temp file {}", path.display()),
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(err) => warn!("could not sweep temp file {}: {}", path.display(), err),
            }
        }
        Ok(())
    }

    /// Basic name validation to keep lookups inside the namespace directory.
    ///
    /// Rejects separators, `..`, control characters and leading dots, which
    /// also keeps in-flight temp files unaddressable.
    fn ensure_name_safe(name: &str) -> AssetResult<()> {
        if name.is_empty() {
            return Err(AssetError::Validation("asset name must not be empty".into()));
        }
        if name.len() > MAX_ASSET_NAME_LEN {
            return Err(AssetError::Validation(format!(
                "asset name exceeds {} bytes",
                MAX_ASSET_NAME_LEN
            )));
        }
        if name.starts_with('.')
            || name.contains("..")
            || name
                .chars()
                .any(|c| c.is_control() || c == '/' || c == '\\')
        {
            return Err(AssetError::Validation(format!(
                "invalid asset name `{}`",
                name
            )));
        }
        Ok(())
    }

    fn asset_path(&self, namespace: Namespace, name: &str) -> PathBuf {
        self.roots.root(namespace).join(name)
    }

    /// Persist a new blob.
    ///
    /// The payload lands in a temp file first and is published with a
    /// create-if-absent link, so readers never see partial content and an
    /// existing name is never replaced. The write runs on the blocking pool
    /// and completes even if the caller stops waiting.
    pub async fn save(&self, namespace: Namespace, name: &str, bytes: Bytes) -> AssetResult<()> {
        Self::ensure_name_safe(name)?;
        let root = self.roots.root(namespace).to_path_buf();
        let owned_name = name.to_string();

        let written = tokio::task::spawn_blocking(move || write_new(&root, &owned_name, &bytes))
            .await
            .map_err(io::Error::other)?;

        match written {
            Ok(()) => {
                debug!("stored {}/{}", namespace, name);
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => Err(AssetError::AlreadyExists {
                namespace,
                name: name.to_string(),
            }),
            Err(err) => Err(AssetError::Io(err)),
        }
    }

    /// Read a whole blob.
    pub async fn read(&self, namespace: Namespace, name: &str) -> AssetResult<Bytes> {
        Self::ensure_name_safe(name)?;
        let path = self.asset_path(namespace, name);
        match fs::read(&path).await {
            Ok(bytes) => Ok(Bytes::from(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(AssetError::NotFound {
                namespace,
                name: name.to_string(),
            }),
            Err(err) => Err(AssetError::Io(err)),
        }
    }

    /// Delete a blob. The default placeholder is refused before any I/O.
    pub async fn delete(&self, namespace: Namespace, name: &str) -> AssetResult<()> {
        if name == DEFAULT_PLACEHOLDER {
            return Err(AssetError::ProtectedAsset(name.to_string()));
        }
        Self::ensure_name_safe(name)?;

        let path = self.asset_path(namespace, name);
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!("removed {}", path.display());
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Err(AssetError::NotFound {
                namespace,
                name: name.to_string(),
            }),
            Err(err) => Err(AssetError::Io(err)),
        }
    }

    /// Exact existence check.
    pub async fn contains(&self, namespace: Namespace, name: &str) -> AssetResult<bool> {
        Self::ensure_name_safe(name)?;
        Ok(fs::try_exists(self.asset_path(namespace, name)).await?)
    }

    /// Scan the namespace for the first entry whose name ends with `suffix`.
    ///
    /// Entries come in directory enumeration order, so when several names
    /// match, which one is returned is unspecified.
    pub async fn exists(&self, namespace: Namespace, suffix: &str) -> AssetResult<Option<String>> {
        Self::ensure_name_safe(suffix)?;
        let mut entries = fs::read_dir(self.roots.root(namespace)).await?;
        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if !file_name.starts_with('.') && file_name.ends_with(suffix) {
                return Ok(Some(file_name.to_string()));
            }
        }
        Ok(None)
    }

    /// Number of published blobs in a namespace.
    pub async fn count(&self, namespace: Namespace) -> AssetResult<usize> {
        let mut entries = fs::read_dir(self.roots.root(namespace)).await?;
        let mut count = 0;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_name().to_string_lossy().starts_with('.') {
                count += 1;
            }
        }
        Ok(count)
    }
}

/// Write `bytes` to a temp file under `root`, fsync it, then link it to
/// `root/name`. Linking fails with `AlreadyExists` when the name is taken.
fn write_new(root: &Path, name: &str, bytes: &[u8]) -> io::Result<()> {
    let tmp_path = root.join(format!("{}{}", TMP_PREFIX, Uuid::new_v4()));
    let target = root.join(name);

    let published = (|| -> io::Result<()> {
        let mut file = std_fs::File::create_new(&tmp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        std_fs::hard_link(&tmp_path, &target)
    })();

    if let Err(err) = std_fs::remove_file(&tmp_path) {
        if err.kind() != ErrorKind::NotFound {
            debug!("failed to remove temp file {}: {}", tmp_path.display(), err);
        }
    }

    published
}
