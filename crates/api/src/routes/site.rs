//! Route definitions for whole-site operations.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::site;
use crate::state::AppState;

/// ```text
/// POST   /site/reset                              -> site::reset
/// GET    /sites/{slug}                            -> site::render
/// GET    /sites/{kind}/{item_slug}                -> site::render_collection_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/site/reset", post(site::reset))
        .route("/sites/{slug}", get(site::render))
        .route(
            "/sites/{kind}/{item_slug}",
            get(site::render_collection_item),
        )
}
