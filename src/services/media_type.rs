//! Declared content-type checks per asset class.

use crate::services::asset_error::{AssetError, AssetResult};

/// Subtypes accepted for image-only namespaces.
pub const IMAGE_SUBTYPES: [&str; 3] = ["jpg", "jpeg", "png"];

/// Subtypes accepted for namespaces that also take video.
pub const IMAGE_OR_VIDEO_SUBTYPES: [&str; 5] = ["jpg", "jpeg", "png", "mp4", "avi"];

/// Accepted media family of a namespace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaClass {
    ImageOnly,
    ImageOrVideo,
}

impl MediaClass {
    pub fn top_level_types(self) -> &'static [&'static str] {
        match self {
            MediaClass::ImageOnly => &["image"],
            MediaClass::ImageOrVideo => &["image", "video"],
        }
    }

    pub fn subtypes(self) -> &'static [&'static str] {
        match self {
            MediaClass::ImageOnly => &IMAGE_SUBTYPES,
            MediaClass::ImageOrVideo => &IMAGE_OR_VIDEO_SUBTYPES,
        }
    }
}

/// Validate a declared content type and return its lower-cased subtype.
///
/// Parameters (`; charset=...`) are ignored. The top-level type is checked
/// before the subtype so `text/png` fails on `text`.
pub fn validate(content_type: &str, class: MediaClass) -> AssetResult<String> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    let Some((top, subtype)) = essence.split_once('/') else {
        return Err(AssetError::unsupported(content_type, class.top_level_types()));
    };

    if !class.top_level_types().contains(&top) {
        return Err(AssetError::unsupported(content_type, class.top_level_types()));
    }
    if !class.subtypes().contains(&subtype) {
        return Err(AssetError::unsupported(content_type, class.subtypes()));
    }

    Ok(subtype.to_string())
}
