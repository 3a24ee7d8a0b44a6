//! Handlers for the tenant site as a whole: rendered pages and reset.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use sitebuilder_core::collections::CollectionKind;
use sitebuilder_core::error::CoreError;
use sitebuilder_core::page::{ensure_slug, ContentMode};
use sitebuilder_core::schema::Palette;
use sitebuilder_render::{
    render_document, render_item, render_page, required_collections, site_theme, PageOutcome,
    PageState, RenderContext, RenderedPage,
};

use crate::error::AppResult;
use crate::middleware::rbac::{OptionalOwner, RequireOwner};
use crate::middleware::tenant::Tenant;
use crate::query::RenderParams;
use crate::state::AppState;

/// Prefix of rendered page links.
const SITE_BASE_PATH: &str = "/api/v1/sites";

/// GET /api/v1/sites/{slug}?status=preview|published&edit=true
///
/// Renders the page as a full HTML document. The preview needs the site
/// owner's token; `edit` only applies to it and adds the inline-editing
/// hooks the builder uses.
pub async fn render(
    State(state): State<AppState>,
    tenant: Tenant,
    viewer: OptionalOwner,
    Path(slug): Path<String>,
    Query(params): Query<RenderParams>,
) -> AppResult<(StatusCode, Html<String>)> {
    ensure_slug(&slug)?;
    let mode = params.mode()?;
    let editable = params.edit && mode == ContentMode::Preview;
    let ctx = viewer.read_context(&tenant, mode)?;

    let page_state = match state.cache.get_components(&ctx, &slug, mode).await {
        Ok(components) => PageState::Loaded(components),
        // A missing page renders like an empty one.
        Err(err) if err.is_not_found() => PageState::Loaded(Arc::from(Vec::new())),
        Err(err) => PageState::Failed(err.to_string()),
    };

    let (kinds, theme) = match &page_state {
        PageState::Loaded(components) => {
            (required_collections(components), site_theme(components))
        }
        _ => (Vec::new(), Palette::default()),
    };
    let collections = state.pages.collections(&ctx, kinds).await;

    let title = match state.pages.list(&ctx).await {
        Ok(pages) => pages
            .into_iter()
            .find(|p| p.slug == slug)
            .map(|p| p.title)
            .unwrap_or_else(|| slug.clone()),
        Err(err) => {
            tracing::debug!(page_slug = %slug, error = %err, "Page title unavailable");
            slug.clone()
        }
    };

    let render_ctx = RenderContext::new(mode)
        .editable(editable)
        .with_theme(theme)
        .with_collections(collections)
        .with_base_path(SITE_BASE_PATH);
    let page = render_page(&page_state, &render_ctx);

    let status = status_for(&page);
    tracing::debug!(
        page_slug = %slug,
        mode = %mode,
        rendered = page.rendered.len(),
        skipped = page.skipped.len(),
        "Page rendered"
    );
    Ok((status, Html(render_document(&title, &page, &render_ctx))))
}

/// GET /api/v1/sites/{kind}/{item_slug}
///
/// Page of one collection item, the target of the links collection
/// sections render. Items are looked up by slug, or by id when they have
/// none.
pub async fn render_collection_item(
    State(state): State<AppState>,
    tenant: Tenant,
    Path((segment, item_slug)): Path<(String, String)>,
) -> AppResult<(StatusCode, Html<String>)> {
    let kind = CollectionKind::from_route_segment(&segment).ok_or_else(|| {
        CoreError::NotFound {
            entity: "Collection",
            id: segment.clone(),
        }
    })?;
    let ctx = tenant.context();
    let render_ctx = RenderContext::new(ContentMode::Published).with_base_path(SITE_BASE_PATH);

    let (title, page) = match state.pages.collection(&ctx, kind).await {
        Ok(items) => {
            let item = items.iter().find(|item| item.link_slug() == item_slug);
            let title = item.map_or_else(|| item_slug.clone(), |item| item.title.clone());
            (title, render_item(kind, item))
        }
        Err(err) => {
            tracing::warn!(collection = %kind, error = %err, "Collection unavailable");
            (
                item_slug.clone(),
                render_page(&PageState::Failed(err.to_string()), &render_ctx),
            )
        }
    };
    Ok((status_for(&page), Html(render_document(&title, &page, &render_ctx))))
}

fn status_for(page: &RenderedPage) -> StatusCode {
    match page.outcome {
        PageOutcome::NotFound => StatusCode::NOT_FOUND,
        PageOutcome::Failed => StatusCode::BAD_GATEWAY,
        _ => StatusCode::OK,
    }
}

/// POST /api/v1/site/reset
///
/// Deletes every page of the tenant. Collections are kept.
pub async fn reset(
    State(state): State<AppState>,
    tenant: Tenant,
    RequireOwner(user): RequireOwner,
) -> AppResult<StatusCode> {
    tracing::info!(user_id = user.user_id, tenant = ?tenant.as_deref(), "Site reset requested");
    state.pages.reset(&tenant.context_for(&user)).await?;
    Ok(StatusCode::NO_CONTENT)
}
