use serde::Serialize;
use std::io;
use thiserror::Error;

use crate::models::namespace::Namespace;

/// Failure taxonomy visible to callers.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Validation,
    UnsupportedMediaType,
    NotFound,
    ProtectedAsset,
    IoFailure,
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("{0}")]
    Validation(String),
    #[error("unsupported media type `{found}`, accepted types are {accepted}")]
    UnsupportedMediaType { found: String, accepted: String },
    #[error("asset `{name}` not found in {namespace} namespace")]
    NotFound { namespace: Namespace, name: String },
    #[error("asset `{0}` is the default placeholder and cannot be deleted")]
    ProtectedAsset(String),
    #[error("asset `{name}` already exists in {namespace} namespace")]
    AlreadyExists { namespace: Namespace, name: String },
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AssetResult<T> = Result<T, AssetError>;

impl AssetError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AssetError::Validation(_) => ErrorKind::Validation,
            AssetError::UnsupportedMediaType { .. } => ErrorKind::UnsupportedMediaType,
            AssetError::NotFound { .. } => ErrorKind::NotFound,
            AssetError::ProtectedAsset(_) => ErrorKind::ProtectedAsset,
            AssetError::AlreadyExists { .. } | AssetError::Io(_) => ErrorKind::IoFailure,
        }
    }

    /// Message safe to hand back to a caller. Storage causes stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AssetError::Io(_) => "storage failure, the operation could not be completed".into(),
            other => other.to_string(),
        }
    }

    pub(crate) fn unsupported(found: impl Into<String>, accepted: &[&str]) -> Self {
        AssetError::UnsupportedMediaType {
            found: found.into(),
            accepted: accepted.join(", "),
        }
    }
}
