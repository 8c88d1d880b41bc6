//! Carousel handlers.
//!
//! The carousel is a single global collection; the public site reads the
//! active rotation while the admin surface manages the full set and reads
//! the engagement analytics.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use darkroom_core::portfolio::{
    CarouselAnalytics, CarouselItem, CreateCarouselItem, ReorderPair, UpdateCarouselItem,
};

use crate::{handlers::AppError, state::AppState};

/// List active, visible items in rotation order (GET /api/carousel).
pub async fn list_active(
    State(state): State<AppState>,
) -> Result<Json<Vec<CarouselItem>>, AppError> {
    let items = state.repository.list_active_carousel_items().await?;
    Ok(Json(items))
}

/// List every carousel item regardless of status (GET /api/carousel/all).
pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<CarouselItem>>, AppError> {
    let items = state.repository.list_carousel_items().await?;
    Ok(Json(items))
}

/// Engagement totals and per-item click-through rates
/// (GET /api/carousel/analytics).
pub async fn analytics(State(state): State<AppState>) -> Result<Json<CarouselAnalytics>, AppError> {
    let analytics = state.repository.carousel_analytics().await?;
    Ok(Json(analytics))
}

/// Create a carousel item (POST /api/carousel).
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateCarouselItem>,
) -> Result<impl IntoResponse, AppError> {
    let item = state.repository.create_carousel_item(payload).await?;

    tracing::info!(item_id = %item.item_id, title = %item.title, "Created carousel item");

    Ok((StatusCode::CREATED, Json(item)))
}

/// Reorder the carousel (POST /api/carousel/reorder).
pub async fn reorder(
    State(state): State<AppState>,
    Json(pairs): Json<Vec<ReorderPair>>,
) -> Result<StatusCode, AppError> {
    state.repository.reorder_carousel_items(&pairs).await?;

    tracing::info!(moved = pairs.len(), "Reordered carousel");

    Ok(StatusCode::NO_CONTENT)
}

/// Get a single carousel item (GET /api/carousel/{id}).
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CarouselItem>, AppError> {
    let item = state.repository.get_carousel_item(id).await?;
    Ok(Json(item))
}

/// Update a carousel item (PUT /api/carousel/{id}).
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCarouselItem>,
) -> Result<Json<CarouselItem>, AppError> {
    let item = state.repository.update_carousel_item(id, payload).await?;

    tracing::info!(item_id = %id, "Updated carousel item");

    Ok(Json(item))
}

/// Delete a carousel item (DELETE /api/carousel/{id}).
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.repository.delete_carousel_item(id).await?;

    tracing::info!(item_id = %id, "Deleted carousel item");

    Ok(StatusCode::NO_CONTENT)
}

/// Record one view of a carousel item (POST /api/carousel/{id}/view).
pub async fn increment_view(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.repository.increment_carousel_view(id).await?;

    tracing::debug!(item_id = %id, "Recorded view");

    Ok(StatusCode::NO_CONTENT)
}

/// Record one click on a carousel item (POST /api/carousel/{id}/click).
pub async fn increment_click(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.repository.increment_carousel_click(id).await?;

    tracing::debug!(item_id = %id, "Recorded click");

    Ok(StatusCode::NO_CONTENT)
}
