//! Product asset endpoints.
//!
//! - `GET    /public/assets/product/{names}` - fetch, comma separated names
//! - `POST   /admin/assets/product`          - create, multipart `files`
//! - `PUT    /admin/assets/product`          - replace, multipart `files` + `replace`
//! - `DELETE /admin/assets/product/{names}`  - delete, comma separated names

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    errors::AppError,
    handlers::{UploadForm, split_names},
    models::asset::AssetRecord,
    services::{AppState, batch::SplitOutcome},
};

/// Multipart part name carrying uploaded files.
pub const FILES_FIELD: &str = "files";
/// Multipart text part with the comma separated names being replaced.
pub const REPLACE_FIELD: &str = "replace";

pub async fn list_product_assets(
    State(state): State<AppState>,
    Path(names): Path<String>,
) -> Json<Vec<AssetRecord>> {
    let outcome = state.products.list_by_names(split_names(&names)).await;
    Json(outcome.into_records())
}

/// Answers 201 when every file was stored, 400 with the same per-file
/// list otherwise.
pub async fn create_product_assets(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let form = UploadForm::read(multipart, FILES_FIELD).await?;
    let outcome = state.products.create_batch(form.files).await?;

    let status = if outcome.all_succeeded() {
        StatusCode::CREATED
    } else {
        StatusCode::BAD_REQUEST
    };
    Ok((status, Json(outcome.into_records())).into_response())
}

pub async fn replace_product_assets(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<SplitOutcome>, AppError> {
    let form = UploadForm::read(multipart, FILES_FIELD).await?;
    let names = form
        .fields
        .get(REPLACE_FIELD)
        .map(|raw| split_names(raw))
        .unwrap_or_default();

    let split = state.products.replace_batch(form.files, names).await?;
    Ok(Json(split))
}

pub async fn delete_product_assets(
    State(state): State<AppState>,
    Path(names): Path<String>,
) -> Json<Vec<AssetRecord>> {
    let outcome = state.products.delete_batch(split_names(&names)).await;
    Json(outcome.into_records())
}
