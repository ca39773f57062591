//! HTTP handlers. They only decode requests, call the services in
//! `AppState` and pick status codes; all asset logic lives in `services`.

pub mod health_handlers;
pub mod order_handlers;
pub mod product_handlers;
pub mod profile_handlers;

use axum::extract::Multipart;
use std::collections::HashMap;

use crate::{errors::AppError, models::asset::NewAsset};

/// Files and text fields of a multipart upload.
#[derive(Debug, Default)]
pub(crate) struct UploadForm {
    pub files: Vec<NewAsset>,
    pub fields: HashMap<String, String>,
}

impl UploadForm {
    /// Collect every part named `file_field` as a file; other named parts
    /// are read as text.
    pub async fn read(mut multipart: Multipart, file_field: &str) -> Result<Self, AppError> {
        let mut form = UploadForm::default();
        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            if name == file_field {
                let filename = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                form.files.push(NewAsset {
                    filename,
                    content_type,
                    bytes,
                });
            } else {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }
        Ok(form)
    }

    /// The single file of a one-file upload.
    pub fn single_file(self) -> Result<NewAsset, AppError> {
        let mut files = self.files.into_iter();
        match (files.next(), files.next()) {
            (Some(file), None) => Ok(file),
            (None, _) => Err(AppError::bad_request("a file must be sent")),
            (Some(_), Some(_)) => Err(AppError::bad_request("only one file may be sent")),
        }
    }
}

/// Split a comma separated list of asset names, dropping blanks.
pub(crate) fn split_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed_and_blanks_dropped() {
        assert_eq!(split_names(" a.png, b.jpg ,,c.mp4,"), ["a.png", "b.jpg", "c.mp4"]);
        assert!(split_names(" , ").is_empty());
    }
}
