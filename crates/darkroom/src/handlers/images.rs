//! Image handlers.
//!
//! Images live under their project; the collection routes are nested at
//! `/api/projects/{id}/images` and the cross-project listings sit under
//! `/api/images`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use darkroom_core::portfolio::{CreateImage, Image, PublishStatus, ReorderPair, UpdateImage};
use darkroom_core::storage::StoreError;

use crate::{handlers::AppError, state::AppState};

/// List visible images of a project in gallery order
/// (GET /api/projects/{id}/images).
pub async fn list_for_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Image>>, AppError> {
    let images = state.repository.list_images_for_project(&id).await?;
    Ok(Json(images))
}

/// Add an image to a project (POST /api/projects/{id}/images).
pub async fn add(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CreateImage>,
) -> Result<impl IntoResponse, AppError> {
    let image = state.repository.add_image(&id, payload).await?;

    tracing::info!(project_id = %id, image_id = %image.image_id, "Added image");

    Ok((StatusCode::CREATED, Json(image)))
}

/// Reorder a project's images (POST /api/projects/{id}/images/reorder).
pub async fn reorder(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(pairs): Json<Vec<ReorderPair>>,
) -> Result<StatusCode, AppError> {
    state.repository.reorder_images(&id, &pairs).await?;

    tracing::info!(project_id = %id, moved = pairs.len(), "Reordered images");

    Ok(StatusCode::NO_CONTENT)
}

/// Update an image (PUT /api/projects/{id}/images/{image_id}).
pub async fn update(
    State(state): State<AppState>,
    Path((id, image_id)): Path<(String, Uuid)>,
    Json(payload): Json<UpdateImage>,
) -> Result<Json<Image>, AppError> {
    let image = state.repository.update_image(&id, image_id, payload).await?;

    tracing::info!(project_id = %id, image_id = %image_id, "Updated image");

    Ok(Json(image))
}

/// Delete an image (DELETE /api/projects/{id}/images/{image_id}).
pub async fn delete(
    State(state): State<AppState>,
    Path((id, image_id)): Path<(String, Uuid)>,
) -> Result<StatusCode, AppError> {
    state.repository.delete_image(&id, image_id).await?;

    tracing::info!(project_id = %id, image_id = %image_id, "Deleted image");

    Ok(StatusCode::NO_CONTENT)
}

/// List images by publication status across all projects
/// (GET /api/images/status/{status}).
pub async fn list_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> Result<Json<Vec<Image>>, AppError> {
    let status = PublishStatus::parse(&status)
        .ok_or_else(|| StoreError::ValidationFailed(format!("Unknown status: {status}")))?;

    let images = state.repository.list_images_by_status(status).await?;
    Ok(Json(images))
}

/// List featured images across all projects (GET /api/images/featured).
pub async fn list_featured(State(state): State<AppState>) -> Result<Json<Vec<Image>>, AppError> {
    let images = state.repository.list_featured_images().await?;
    Ok(Json(images))
}
