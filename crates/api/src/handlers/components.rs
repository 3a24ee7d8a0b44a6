//! Handlers for the components of a page.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use sitebuilder_core::component::{ComponentInstance, ComponentPatch};
use sitebuilder_core::page::ensure_slug;
use sitebuilder_gateway::CreateComponentRequest;

use crate::error::AppResult;
use crate::middleware::rbac::{OptionalOwner, RequireOwner};
use crate::middleware::tenant::Tenant;
use crate::query::StatusParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /pages/{slug}/components/order`.
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub component_ids: Vec<String>,
}

/// GET /api/v1/pages/{slug}/components?status=preview|published
///
/// The preview (the default) is only visible to the site owner.
pub async fn list(
    State(state): State<AppState>,
    tenant: Tenant,
    viewer: OptionalOwner,
    Path(slug): Path<String>,
    Query(params): Query<StatusParams>,
) -> AppResult<Json<DataResponse<Vec<ComponentInstance>>>> {
    ensure_slug(&slug)?;
    let mode = params.mode()?;
    let ctx = viewer.read_context(&tenant, mode)?;
    let components = state.cache.get_components(&ctx, &slug, mode).await?;
    Ok(Json(DataResponse {
        data: components.to_vec(),
    }))
}

/// POST /api/v1/pages/{slug}/components
pub async fn create(
    State(state): State<AppState>,
    tenant: Tenant,
    RequireOwner(user): RequireOwner,
    Path(slug): Path<String>,
    Json(input): Json<CreateComponentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ComponentInstance>>)> {
    let created = state
        .components
        .create_raw(&tenant.context_for(&user), &slug, input)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// PATCH /api/v1/pages/{slug}/components/{component_id}
///
/// `data` is merged into the stored payload; `null` members remove keys.
pub async fn update(
    State(state): State<AppState>,
    tenant: Tenant,
    RequireOwner(user): RequireOwner,
    Path((slug, component_id)): Path<(String, String)>,
    Json(patch): Json<ComponentPatch>,
) -> AppResult<Json<DataResponse<ComponentInstance>>> {
    let updated = state
        .components
        .update_raw(&tenant.context_for(&user), &slug, &component_id, patch)
        .await?;
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/pages/{slug}/components/{component_id}
///
/// Answers 204 whether the component was deleted or already gone.
pub async fn delete(
    State(state): State<AppState>,
    tenant: Tenant,
    RequireOwner(user): RequireOwner,
    Path((slug, component_id)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    state
        .components
        .delete(&tenant.context_for(&user), &slug, &component_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/pages/{slug}/components/order
pub async fn reorder(
    State(state): State<AppState>,
    tenant: Tenant,
    RequireOwner(user): RequireOwner,
    Path(slug): Path<String>,
    Json(input): Json<ReorderRequest>,
) -> AppResult<Json<DataResponse<Vec<ComponentInstance>>>> {
    let updated = state
        .components
        .reorder(&tenant.context_for(&user), &slug, &input.component_ids)
        .await?;
    Ok(Json(DataResponse { data: updated }))
}
