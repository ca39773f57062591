//! Asset name generation.
//!
//! Upload names are `<token>.<subtype>` where the token is a random uuid
//! fragment followed by the millisecond timestamp. There is no shared
//! counter, so any number of tasks may generate names at once.
//!
//! Order asset names are derived deterministically from the product id and
//! the source product asset, which is what makes reuse lookups possible.

use chrono::Utc;
use uuid::Uuid;

use crate::services::{
    asset_error::{AssetError, AssetResult},
    media_type::{self, IMAGE_SUBTYPES, MediaClass},
};

/// Random fragment + millisecond timestamp.
pub fn unique_token() -> String {
    let id = Uuid::new_v4().to_string();
    let fragment = &id[..id.len() / 3];
    format!("{}{}", fragment, Utc::now().timestamp_millis())
}

/// Build a stored filename from a declared content type and a token.
pub fn derive_filename(content_type: &str, token: &str, class: MediaClass) -> AssetResult<String> {
    let subtype = media_type::validate(content_type, class)?;
    Ok(format!("{}.{}", token, subtype))
}

/// Derive the order asset name for a product's source image.
///
/// Only image sources are accepted; the result is stable for the same inputs.
pub fn derive_order_asset_name(product_id: i64, source_filename: &str) -> AssetResult<String> {
    let extension = source_filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if !IMAGE_SUBTYPES.contains(&extension.as_str()) {
        return Err(AssetError::unsupported(source_filename, &IMAGE_SUBTYPES));
    }

    Ok(format!("PRODID{}-{}", product_id, source_filename))
}
