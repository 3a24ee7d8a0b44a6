pub mod health;
pub mod pages;
pub mod site;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                              invalidation push (WebSocket)
///
/// /pages                                           list, create
/// /pages/{slug}                                    rename, delete
/// /pages/{slug}/publish                            publish preview (POST)
/// /pages/{slug}/components                         list (?status=), create
/// /pages/{slug}/components/order                   reorder (PUT)
/// /pages/{slug}/components/{component_id}          partial update, delete
///
/// /site/reset                                      reset the tenant site (POST)
/// /sites/{slug}                                    rendered HTML (?status=&edit=)
/// /sites/{kind}/{item_slug}                        collection item page
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/pages", pages::router())
        .merge(site::router())
}
