//! Route definitions for the `/pages` resource and its components.

use axum::routing::{get, patch, post, put};
use axum::Router;

use crate::handlers::{components, pages};
use crate::state::AppState;

/// Routes mounted at `/pages`.
///
/// ```text
/// GET    /                                        -> pages::list
/// POST   /                                        -> pages::create
/// PATCH  /{slug}                                  -> pages::update
/// DELETE /{slug}                                  -> pages::delete
/// POST   /{slug}/publish                          -> pages::publish
///
/// GET    /{slug}/components                       -> components::list
/// POST   /{slug}/components                       -> components::create
/// PUT    /{slug}/components/order                 -> components::reorder
/// PATCH  /{slug}/components/{component_id}        -> components::update
/// DELETE /{slug}/components/{component_id}        -> components::delete
/// ```
pub fn router() -> Router<AppState> {
    let component_routes = Router::new()
        .route("/", get(components::list).post(components::create))
        .route("/order", put(components::reorder))
        .route(
            "/{component_id}",
            patch(components::update).delete(components::delete),
        );

    Router::new()
        .route("/", get(pages::list).post(pages::create))
        .route("/{slug}", patch(pages::update).delete(pages::delete))
        .route("/{slug}/publish", post(pages::publish))
        .nest("/{slug}/components", component_routes)
}
