//! Transient records exchanged with callers for every asset operation.

use base64::{Engine as _, engine::general_purpose};
use bytes::Bytes;
use serde::{Serialize, Serializer};

use crate::services::asset_error::{AssetError, ErrorKind};

/// An uploaded file as received from the boundary layer.
#[derive(Clone, Debug)]
pub struct NewAsset {
    /// Filename declared by the client, if any.
    pub filename: Option<String>,

    /// Declared MIME type (e.g. `image/png`).
    pub content_type: Option<String>,

    /// Full payload.
    pub bytes: Bytes,
}

#[cfg(test)]
impl NewAsset {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            filename: Some(filename.into()),
            content_type: Some(content_type.into()),
            bytes: bytes.into(),
        }
    }
}

/// Outcome of one item of an asset operation.
///
/// A record is built once and never mutated after it joins a batch result.
/// Terminal records carry either a payload/confirmation or an error, never both.
/// `name` is absent only when a failed upload never received a stored name.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    /// Stored name of the asset inside its namespace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Payload, base64-encoded on the wire.
    #[serde(
        serialize_with = "serialize_base64",
        skip_serializing_if = "Option::is_none"
    )]
    pub bytes: Option<Bytes>,

    /// Public URI the asset can be fetched from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_uri: Option<String>,

    /// Filename the client uploaded the asset under.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,

    /// Human-readable confirmation for operations with no payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Caller-safe failure description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl AssetRecord {
    /// A bare name, e.g. the answer to a derive-or-reuse request.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// A successfully read asset.
    pub fn with_bytes(name: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            name: Some(name.into()),
            bytes: Some(bytes),
            ..Self::default()
        }
    }

    /// A freshly stored upload.
    pub fn created(
        name: impl Into<String>,
        original_name: Option<String>,
        source_uri: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            source_uri: Some(source_uri.into()),
            original_name,
            ..Self::default()
        }
    }

    /// A confirmation with no payload.
    pub fn confirmed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// A failed item. `name` is the stored name when one was involved.
    pub fn failed(name: Option<String>, original_name: Option<String>, err: &AssetError) -> Self {
        Self {
            name,
            original_name,
            error: Some(err.public_message()),
            error_kind: Some(err.kind()),
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

fn serialize_base64<S>(bytes: &Option<Bytes>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match bytes {
        Some(bytes) => serializer.serialize_str(&general_purpose::STANDARD.encode(bytes)),
        None => serializer.serialize_none(),
    }
}
