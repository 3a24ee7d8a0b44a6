//! Handlers for the `/pages` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use sitebuilder_core::page::{CreatePage, Page, UpdatePage};

use crate::error::AppResult;
use crate::middleware::rbac::RequireOwner;
use crate::middleware::tenant::Tenant;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/pages
pub async fn list(
    State(state): State<AppState>,
    tenant: Tenant,
) -> AppResult<Json<DataResponse<Vec<Page>>>> {
    let pages = state.pages.list(&tenant.context()).await?;
    Ok(Json(DataResponse { data: pages }))
}

/// POST /api/v1/pages
pub async fn create(
    State(state): State<AppState>,
    tenant: Tenant,
    RequireOwner(user): RequireOwner,
    Json(input): Json<CreatePage>,
) -> AppResult<(StatusCode, Json<DataResponse<Page>>)> {
    let page = state.pages.create(&tenant.context_for(&user), &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: page })))
}

/// PATCH /api/v1/pages/{slug}
pub async fn update(
    State(state): State<AppState>,
    tenant: Tenant,
    RequireOwner(user): RequireOwner,
    Path(slug): Path<String>,
    Json(input): Json<UpdatePage>,
) -> AppResult<Json<DataResponse<Page>>> {
    let page = state
        .pages
        .update(&tenant.context_for(&user), &slug, &input)
        .await?;
    Ok(Json(DataResponse { data: page }))
}

/// DELETE /api/v1/pages/{slug}
pub async fn delete(
    State(state): State<AppState>,
    tenant: Tenant,
    RequireOwner(user): RequireOwner,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    state.pages.delete(&tenant.context_for(&user), &slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/pages/{slug}/publish
pub async fn publish(
    State(state): State<AppState>,
    tenant: Tenant,
    RequireOwner(user): RequireOwner,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    state.pages.publish(&tenant.context_for(&user), &slug).await?;
    Ok(StatusCode::NO_CONTENT)
}
