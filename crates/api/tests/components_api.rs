//! HTTP-level integration tests for the component endpoints of a page.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, body_text, owner_token, token_for_role, TestApp};
use serde_json::json;
use sitebuilder_backend::{DeletePolicy, MemoryBackend};
use sitebuilder_events::bus::PAGE_COMPONENTS_INVALIDATED;

async fn app_with_home() -> TestApp {
    let app = TestApp::new();
    app.create_page("Home", "home").await;
    app
}

async fn list(app: &TestApp, slug: &str) -> Vec<serde_json::Value> {
    let response = app
        .get_as_owner(&format!("/api/v1/pages/{slug}/components"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].as_array().unwrap().clone()
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_generates_id_and_appends() {
    let app = app_with_home().await;

    let hero = app
        .create_component("home", json!({"component_type": "hero", "data": {"title": "Hi"}}))
        .await;
    let faq = app
        .create_component("home", json!({"component_type": "faq"}))
        .await;

    assert!(hero["component_id"].as_str().unwrap().starts_with("hero"));
    assert_eq!(hero["order"], 0);
    assert_eq!(faq["order"], 1);
    // Missing data falls back to the type's defaults.
    assert_eq!(faq["data"]["title"], "Frequently asked questions");

    let components = list(&app, "home").await;
    assert_eq!(components.len(), 2);
    assert_eq!(components[0]["component_type"], "hero");
}

#[tokio::test]
async fn unknown_component_type_returns_400() {
    let app = app_with_home().await;
    let response = app
        .send(
            Method::POST,
            "/api/v1/pages/home/components",
            Some(json!({"component_type": "carousel", "data": {}})),
            Some(&owner_token()),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Unknown component_type: 'carousel'");
    assert!(list(&app, "home").await.is_empty());
}

#[tokio::test]
async fn invalid_payload_is_rejected_before_reaching_the_backend() {
    let app = app_with_home().await;
    let response = app
        .send(
            Method::POST,
            "/api/v1/pages/home/components",
            Some(json!({"component_type": "hero", "data": {"title": 42}})),
            Some(&owner_token()),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn invalid_style_is_rejected() {
    let app = app_with_home().await;
    let response = app
        .send(
            Method::POST,
            "/api/v1/pages/home/components",
            Some(json!({"component_type": "hero", "data": {"style": "zigzag"}})),
            Some(&owner_token()),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_component_id_returns_409() {
    let app = app_with_home().await;
    let body = json!({"component_id": "hero-main", "component_type": "hero"});
    app.create_component("home", body.clone()).await;

    let response = app
        .send(
            Method::POST,
            "/api/v1/pages/home/components",
            Some(body),
            Some(&owner_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn create_on_missing_page_returns_404() {
    let app = TestApp::new();
    let response = app
        .send(
            Method::POST,
            "/api/v1/pages/ghost/components",
            Some(json!({"component_type": "hero"})),
            Some(&owner_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn patch_merges_and_null_removes() {
    let app = app_with_home().await;
    app.create_component(
        "home",
        json!({
            "component_id": "hero-1",
            "component_type": "hero",
            "data": {"title": "Welcome", "subtitle": "Fresh bread", "button_text": "Order"}
        }),
    )
    .await;

    let response = app
        .send(
            Method::PATCH,
            "/api/v1/pages/home/components/hero-1",
            Some(json!({"data": {"title": "Welcome Back", "button_text": null}})),
            Some(&owner_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let components = list(&app, "home").await;
    let data = &components[0]["data"];
    assert_eq!(data["title"], "Welcome Back");
    assert_eq!(data["subtitle"], "Fresh bread");
    assert!(data.get("button_text").is_none());
}

#[tokio::test]
async fn patch_with_invalid_field_type_returns_400() {
    let app = app_with_home().await;
    app.create_component("home", json!({"component_id": "hero-1", "component_type": "hero"}))
        .await;

    let response = app
        .send(
            Method::PATCH,
            "/api/v1/pages/home/components/hero-1",
            Some(json!({"data": {"title": ["not", "a", "string"]}})),
            Some(&owner_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_patch_returns_400() {
    let app = app_with_home().await;
    app.create_component("home", json!({"component_id": "hero-1", "component_type": "hero"}))
        .await;

    let response = app
        .send(
            Method::PATCH,
            "/api/v1/pages/home/components/hero-1",
            Some(json!({})),
            Some(&owner_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Delete & reorder
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_is_idempotent() {
    let app = app_with_home().await;
    app.create_component("home", json!({"component_id": "faq-1", "component_type": "faq"}))
        .await;

    for _ in 0..2 {
        let response = app
            .send(
                Method::DELETE,
                "/api/v1/pages/home/components/faq-1",
                None,
                Some(&owner_token()),
            )
            .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
    assert!(list(&app, "home").await.is_empty());
}

#[tokio::test]
async fn delete_of_missing_id_is_204_against_a_strict_backend() {
    let app = TestApp::with_backend(MemoryBackend::new().with_delete_policy(DeletePolicy::Strict));
    app.create_page("Home", "home").await;

    let response = app
        .send(
            Method::DELETE,
            "/api/v1/pages/home/components/missing-1",
            None,
            Some(&owner_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn reorder_rewrites_positions() {
    let app = app_with_home().await;
    for id in ["hero-1", "about-1", "faq-1"] {
        let component_type = id.split('-').next().unwrap();
        app.create_component(
            "home",
            json!({"component_id": id, "component_type": component_type}),
        )
        .await;
    }

    let response = app
        .send(
            Method::PUT,
            "/api/v1/pages/home/components/order",
            Some(json!({"component_ids": ["faq-1", "hero-1", "about-1"]})),
            Some(&owner_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let ids: Vec<_> = list(&app, "home")
        .await
        .iter()
        .map(|c| c["component_id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, ["faq-1", "hero-1", "about-1"]);
}

#[tokio::test]
async fn reorder_with_duplicates_returns_400() {
    let app = app_with_home().await;
    let response = app
        .send(
            Method::PUT,
            "/api/v1/pages/home/components/order",
            Some(json!({"component_ids": ["a", "a"]})),
            Some(&owner_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Reads & invalidation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn preview_requires_the_owner() {
    let app = app_with_home().await;
    app.create_component(
        "home",
        json!({"component_id": "hero-1", "component_type": "hero", "data": {"title": "Secret sale"}}),
    )
    .await;

    for uri in [
        "/api/v1/pages/home/components",
        "/api/v1/pages/home/components?status=preview",
    ] {
        let response = app.get(uri).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(!body_text(response).await.contains("Secret sale"));
    }

    let response = app
        .send(
            Method::GET,
            "/api/v1/pages/home/components?status=preview",
            None,
            Some(&token_for_role("viewer")),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .get_as_owner("/api/v1/pages/home/components?status=preview")
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"][0]["data"]["title"], "Secret sale");
}

#[tokio::test]
async fn published_components_are_public() {
    let app = app_with_home().await;
    app.create_component("home", json!({"component_type": "hero"}))
        .await;

    let response = app.get("/api/v1/pages/home/components?status=published").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn path_segments_cannot_escape_the_component() {
    let app = app_with_home().await;
    app.create_component("home", json!({"component_id": "hero-1", "component_type": "hero"}))
        .await;

    // `%2E%2E` decodes to `..`; `%2F` to `/`.
    for uri in [
        "/api/v1/pages/home/components/%2E%2E",
        "/api/v1/pages/home/components/hero-1%2F..",
        "/api/v1/pages/%2E%2E/components/hero-1",
    ] {
        let response = app
            .send(Method::DELETE, uri, None, Some(&owner_token()))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
    }

    let response = app
        .send(
            Method::PATCH,
            "/api/v1/pages/home/components/%2E%2E",
            Some(json!({"order": 4})),
            Some(&owner_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(list(&app, "home").await.len(), 1);
    let pages = body_json(app.get("/api/v1/pages").await).await;
    assert_eq!(pages["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_status_returns_400() {
    let app = app_with_home().await;
    let response = app.get("/api/v1/pages/home/components?status=draft").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reads_are_served_from_the_cache_until_a_write() {
    let app = app_with_home().await;

    list(&app, "home").await;
    list(&app, "home").await;
    assert_eq!(app.backend.component_fetch_count(), 1);

    app.create_component("home", json!({"component_type": "hero"}))
        .await;
    assert_eq!(list(&app, "home").await.len(), 1);
}

#[tokio::test]
async fn writes_publish_a_tenant_scoped_invalidation() {
    let app = app_with_home().await;
    let mut events = app.state.event_bus.subscribe();

    app.create_component("home", json!({"component_type": "hero"}))
        .await;

    let invalidation = loop {
        let event = events.recv().await.unwrap();
        if event.event_type == PAGE_COMPONENTS_INVALIDATED {
            break event;
        }
    };
    assert_eq!(invalidation.tenant.as_deref(), Some("acme"));
    assert_eq!(
        invalidation.cache_key().unwrap(),
        ["pageComponents", "home"]
    );
}

#[tokio::test]
async fn writes_without_a_token_never_reach_the_backend() {
    let app = app_with_home().await;
    let response = app
        .send(
            Method::POST,
            "/api/v1/pages/home/components",
            Some(json!({"component_type": "hero"})),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(list(&app, "home").await.is_empty());
}
