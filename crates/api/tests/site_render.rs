//! Integration tests for the rendered site pages.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_text, owner_token, TestApp};
use serde_json::json;
use sitebuilder_backend::{Backend, RequestContext};
use sitebuilder_core::collections::{CollectionItem, CollectionKind};
use sitebuilder_core::component::NewComponent;

async fn app_with_hero(title: &str) -> TestApp {
    let app = TestApp::new();
    app.create_page("Home", "home").await;
    app.create_component(
        "home",
        json!({"component_id": "hero-1", "component_type": "hero", "data": {"title": title}}),
    )
    .await;
    app
}

async fn publish(app: &TestApp, slug: &str) {
    let response = app
        .send(
            Method::POST,
            &format!("/api/v1/pages/{slug}/publish"),
            None,
            Some(&owner_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn unpublished_page_is_404_for_visitors() {
    let app = app_with_hero("Fresh bread daily").await;

    let response = app.get("/api/v1/sites/home").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let html = body_text(response).await;
    assert!(html.contains("page-not-found"));
    assert!(!html.contains("Fresh bread daily"));
}

#[tokio::test]
async fn published_page_renders_as_html_document() {
    let app = app_with_hero("Fresh bread daily").await;
    publish(&app, "home").await;

    let response = app.get("/api/v1/sites/home").await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));

    let html = body_text(response).await;
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Home</title>"));
    assert!(html.contains("Fresh bread daily"));
    assert!(!html.contains("contenteditable"));
}

#[tokio::test]
async fn preview_shows_unpublished_changes() {
    let app = app_with_hero("Draft headline").await;

    let response = app.get_as_owner("/api/v1/sites/home?status=preview").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Draft headline"));
}

#[tokio::test]
async fn preview_is_hidden_from_visitors() {
    let app = app_with_hero("Draft headline").await;

    for uri in [
        "/api/v1/sites/home?status=preview",
        "/api/v1/sites/home?status=preview&edit=true",
    ] {
        let response = app.get(uri).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(!body_text(response).await.contains("Draft headline"));
    }
}

#[tokio::test]
async fn edit_mode_adds_builder_hooks_to_the_preview_only() {
    let app = app_with_hero("Editable").await;
    publish(&app, "home").await;

    let html = body_text(app.get_as_owner("/api/v1/sites/home?status=preview&edit=true").await).await;
    assert!(html.contains("contenteditable=\"true\""));
    assert!(html.contains("data-component-id=\"hero-1\""));

    let html = body_text(app.get("/api/v1/sites/home?status=published&edit=true").await).await;
    assert!(!html.contains("contenteditable"));
}

#[tokio::test]
async fn empty_preview_in_edit_mode_prompts_for_a_section() {
    let app = TestApp::new();
    app.create_page("Home", "home").await;

    let response = app.get_as_owner("/api/v1/sites/home?status=preview&edit=true").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Add a section"));
}

#[tokio::test]
async fn unknown_component_types_are_skipped() {
    let app = app_with_hero("Still here").await;
    let ctx = RequestContext::for_tenant("acme").with_token("owner-token");
    app.backend
        .create_component(
            &ctx,
            "home",
            &NewComponent {
                component_id: "carousel-1".into(),
                component_type: "carousel".into(),
                data: json!({"slides": []}),
                order: Some(0),
            },
        )
        .await
        .unwrap();

    let response = app.get_as_owner("/api/v1/sites/home?status=preview&edit=true").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Still here"));
    assert!(!html.contains("carousel-1"));
}

#[tokio::test]
async fn collection_sections_list_tenant_items() {
    let app = TestApp::new();
    app.create_page("Blog", "blog").await;
    app.create_component("blog", json!({"component_type": "blog"}))
        .await;
    app.backend
        .seed_collection(
            Some("acme"),
            CollectionKind::Blogs,
            vec![CollectionItem {
                id: "1".into(),
                title: "Sourdough secrets".into(),
                slug: "sourdough-secrets".into(),
                description: Some("Patience and flour.".into()),
                image: None,
                price: None,
            }],
        )
        .await;

    let html = body_text(app.get_as_owner("/api/v1/sites/blog?status=preview").await).await;
    assert!(html.contains("Sourdough secrets"));
    assert!(html.contains("sourdough-secrets"));
}

#[tokio::test]
async fn collection_links_lead_to_item_pages() {
    let app = TestApp::new();
    app.create_page("Blog", "blog").await;
    app.create_component("blog", json!({"component_type": "blog"}))
        .await;
    publish(&app, "blog").await;
    app.backend
        .seed_collection(
            Some("acme"),
            CollectionKind::Blogs,
            vec![CollectionItem {
                id: "1".into(),
                title: "Sourdough".into(),
                slug: "sourdough".into(),
                description: Some("Flour, water, salt.".into()),
                image: None,
                price: None,
            }],
        )
        .await;

    let html = body_text(app.get("/api/v1/sites/blog").await).await;
    let href = html
        .split("href=\"")
        .skip(1)
        .map(|rest| &rest[..rest.find('"').unwrap()])
        .find(|href| href.ends_with("/sourdough"))
        .expect("item link")
        .to_string();

    let response = app.get(&href).await;
    assert_eq!(response.status(), StatusCode::OK);
    let item = body_text(response).await;
    assert!(item.contains("<title>Sourdough</title>"));
    assert!(item.contains("Flour, water, salt."));

    let response = app.get("/api/v1/sites/blog/rye").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = app.get("/api/v1/sites/recipes/sourdough").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn page_of_only_unknown_types_is_404() {
    let app = TestApp::new();
    app.create_page("Home", "home").await;
    let ctx = RequestContext::for_tenant("acme").with_token("owner-token");
    app.backend
        .create_component(
            &ctx,
            "home",
            &NewComponent {
                component_id: "carousel-1".into(),
                component_type: "carousel".into(),
                data: json!({}),
                order: None,
            },
        )
        .await
        .unwrap();
    publish(&app, "home").await;

    let response = app.get("/api/v1/sites/home").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("page-not-found"));
}

#[tokio::test]
async fn navbar_theme_colours_the_document() {
    let app = TestApp::new();
    app.create_page("Home", "home").await;
    app.create_component(
        "home",
        json!({
            "component_type": "navbar",
            "data": {"brand": "Acme", "theme": {"primary": "#0f766e"}}
        }),
    )
    .await;
    publish(&app, "home").await;

    let html = body_text(app.get("/api/v1/sites/home").await).await;
    assert!(html.contains("--color-primary:#0f766e"));
    // Colours the navbar leaves out keep their defaults.
    assert!(html.contains("--color-text:#111827"));
}

#[tokio::test]
async fn missing_page_is_404() {
    let app = TestApp::new();
    let response = app.get_as_owner("/api/v1/sites/nowhere?status=preview").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_slug_is_400() {
    let app = TestApp::new();
    let response = app.get("/api/v1/sites/Not_A_Slug").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
