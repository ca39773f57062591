//! Profile picture endpoints, one multipart `file` per upload.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};

use crate::{
    errors::AppError, handlers::UploadForm, models::asset::AssetRecord, services::AppState,
};

pub const FILE_FIELD: &str = "file";

pub async fn upload_profile_picture(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<AssetRecord>), AppError> {
    let file = UploadForm::read(multipart, FILE_FIELD).await?.single_file()?;
    let name = state.profiles.upload(file).await?;
    Ok((
        StatusCode::CREATED,
        Json(AssetRecord::confirmed(name, "profile picture stored")),
    ))
}

pub async fn get_profile_picture(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<AssetRecord>, AppError> {
    Ok(Json(state.profiles.fetch(&name).await?))
}

pub async fn replace_profile_picture(
    State(state): State<AppState>,
    Path(name): Path<String>,
    multipart: Multipart,
) -> Result<Json<AssetRecord>, AppError> {
    let file = UploadForm::read(multipart, FILE_FIELD).await?.single_file()?;
    let new_name = state.profiles.replace(file, &name).await?;
    Ok(Json(AssetRecord::confirmed(
        new_name,
        "profile picture replaced",
    )))
}

pub async fn delete_profile_picture(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<AssetRecord>, AppError> {
    Ok(Json(state.profiles.delete(&name).await?))
}
