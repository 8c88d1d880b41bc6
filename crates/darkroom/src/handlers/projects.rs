//! Project CRUD handlers.
//!
//! These handlers go through the [`PortfolioRepository`] on the shared
//! state; error mapping to HTTP status codes happens in [`AppError`].
//!
//! [`PortfolioRepository`]: darkroom_core::storage::PortfolioRepository

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use darkroom_core::portfolio::{CreateProject, Project, UpdateProject};
use darkroom_core::storage::ProjectWithImages;

use crate::{handlers::AppError, state::AppState};

/// List published projects, newest first (GET /api/projects).
pub async fn list_published(State(state): State<AppState>) -> Result<Json<Vec<Project>>, AppError> {
    let projects = state.repository.list_published_projects().await?;
    Ok(Json(projects))
}

/// List all projects regardless of status (GET /api/projects/all).
pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<Project>>, AppError> {
    let projects = state.repository.list_all_projects().await?;
    Ok(Json(projects))
}

/// Create a new project (POST /api/projects).
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateProject>,
) -> Result<impl IntoResponse, AppError> {
    let project = state.repository.create_project(payload).await?;

    tracing::info!(project_id = %project.project_id, title = %project.title, "Created project");

    Ok((StatusCode::CREATED, Json(project)))
}

/// Get a project with its images (GET /api/projects/{id}).
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProjectWithImages>, AppError> {
    let result = state.repository.get_project(&id).await?;
    Ok(Json(result))
}

/// Update a project (PUT /api/projects/{id}).
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProject>,
) -> Result<Json<Project>, AppError> {
    let project = state.repository.update_project(&id, payload).await?;

    tracing::info!(project_id = %project.project_id, "Updated project");

    Ok(Json(project))
}

/// Delete a project and its images (DELETE /api/projects/{id}).
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.repository.delete_project(&id).await?;

    tracing::info!(project_id = %id, "Deleted project");

    Ok(StatusCode::NO_CONTENT)
}

/// List published projects in a category (GET /api/projects/category/{category}).
pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Project>>, AppError> {
    let projects = state.repository.list_projects_by_category(&category).await?;
    Ok(Json(projects))
}
