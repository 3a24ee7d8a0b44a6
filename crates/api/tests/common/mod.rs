#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, HOST};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use tower::ServiceExt;

use sitebuilder_api::auth::jwt::{Claims, JwtConfig};
use sitebuilder_api::config::ServerConfig;
use sitebuilder_api::router::build_app_router;
use sitebuilder_api::state::AppState;
use sitebuilder_api::ws::WsManager;
use sitebuilder_backend::MemoryBackend;
use sitebuilder_events::EventBus;

pub const TEST_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Host of the tenant most tests run against.
pub const ACME_HOST: &str = "acme.localhost";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        backend_url: "http://backend.invalid/api".to_string(),
        root_domain: "localhost".to_string(),
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
        },
    }
}

/// Application state over an in-memory backend.
///
/// Each call to [`TestApp::router`] builds a fresh router around the same
/// state, so requests share the cache, the event bus and the backend.
pub struct TestApp {
    pub backend: Arc<MemoryBackend>,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_backend(MemoryBackend::new())
    }

    pub fn with_backend(backend: MemoryBackend) -> Self {
        let backend = Arc::new(backend);
        let state = AppState::new(
            test_config(),
            backend.clone(),
            Arc::new(EventBus::default()),
            Arc::new(WsManager::new()),
        );
        Self { backend, state }
    }

    pub fn router(&self) -> Router {
        build_app_router(self.state.clone(), &self.state.config)
    }

    /// Create a page through the API as the site owner.
    pub async fn create_page(&self, title: &str, slug: &str) {
        let response = self
            .send(
                Method::POST,
                "/api/v1/pages",
                Some(serde_json::json!({"title": title, "slug": slug})),
                Some(&owner_token()),
            )
            .await;
        assert_eq!(response.status(), 201, "page creation failed");
    }

    /// Add a component through the API as the site owner.
    pub async fn create_component(&self, slug: &str, body: Value) -> Value {
        let response = self
            .send(
                Method::POST,
                &format!("/api/v1/pages/{slug}/components"),
                Some(body),
                Some(&owner_token()),
            )
            .await;
        assert_eq!(response.status(), 201, "component creation failed");
        body_json(response).await["data"].clone()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Method::GET, uri, None, None).await
    }

    /// GET as the site owner, e.g. for preview reads.
    pub async fn get_as_owner(&self, uri: &str) -> Response<Body> {
        self.send(Method::GET, uri, None, Some(&owner_token())).await
    }

    /// Send a request to the `acme` tenant.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> Response<Body> {
        self.send_to_host(ACME_HOST, method, uri, body, token).await
    }

    pub async fn send_to_host(
        &self,
        host: &str,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri).header(HOST, host);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router().oneshot(request).await.unwrap()
    }
}

/// Sign an access token for `role` with the test secret.
pub fn token_for_role(role: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: 7,
        role: role.to_string(),
        exp: now + 900,
        iat: now,
        jti: uuid::Uuid::new_v4().to_string(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn owner_token() -> String {
    token_for_role("owner")
}

/// Read the full response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Read the full response body as text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
