//! REST client for the site backend.
//!
//! Wraps the backend HTTP API using [`reqwest`]. Every request carries the
//! tenant header and, when present, the caller's bearer token.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use sitebuilder_core::collections::{CollectionItem, CollectionKind};
use sitebuilder_core::component::{ComponentInstance, ComponentPatch, NewComponent};
use sitebuilder_core::page::{ContentMode, CreatePage, Page, UpdatePage};
use sitebuilder_core::tenant::TENANT_HEADER;

use crate::{Backend, BackendError, RequestContext};

/// HTTP client for the backend API.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a client for the backend at `base_url`, e.g.
    /// `http://localhost:8000/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ---- private helpers ----

    /// Build an endpoint URL from path segments.
    ///
    /// Segments are percent-encoded one by one, so a `/` inside a slug or
    /// component id can never address a different resource. Empty and
    /// dot segments are refused outright.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(BackendError::InvalidUrl(format!(
                "Invalid path segment: '{bad}'"
            )));
        }
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| BackendError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        segments: &[&str],
        ctx: &RequestContext,
    ) -> Result<RequestBuilder, BackendError> {
        let mut builder = self.client.request(method, self.endpoint(segments)?);
        if let Some(tenant) = &ctx.tenant {
            builder = builder.header(TENANT_HEADER, tenant);
        }
        if let Some(token) = &ctx.token {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    /// Ensure the response has a success status code, otherwise turn the
    /// body into a [`BackendError::Api`] carrying the backend's message.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Backend request failed")
                .to_string()
        });
        tracing::debug!(status = status.as_u16(), %message, "Backend rejected request");
        Err(BackendError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Parse a successful JSON body, accepting both bare payloads and the
    /// `{ "data": ... }` envelope.
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        let response = Self::ensure_success(response).await?;
        let body: Value = response.json().await?;
        serde_json::from_value(unwrap_envelope(body))
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    async fn check_status(response: reqwest::Response) -> Result<(), BackendError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

/// Strip a `{ "data": ... }` envelope if present.
fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.len() == 1 && map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Pull the human-readable message out of an error body.
///
/// Looks for `error`, `message` or `detail` string fields in a JSON body,
/// falling back to the raw text. Returns `None` for an empty body.
fn extract_error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    let from_json = serde_json::from_str::<Value>(trimmed).ok().and_then(|v| {
        ["error", "message", "detail"]
            .iter()
            .find_map(|key| v.get(key).and_then(Value::as_str).map(str::to_string))
    });
    Some(from_json.unwrap_or_else(|| trimmed.to_string()))
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list_pages(&self, ctx: &RequestContext) -> Result<Vec<Page>, BackendError> {
        let response = self.request(Method::GET, &["pages"], ctx)?.send().await?;
        Self::parse_response(response).await
    }

    async fn create_page(
        &self,
        ctx: &RequestContext,
        input: &CreatePage,
    ) -> Result<Page, BackendError> {
        let response = self
            .request(Method::POST, &["pages"], ctx)?
            .json(input)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn update_page(
        &self,
        ctx: &RequestContext,
        slug: &str,
        input: &UpdatePage,
    ) -> Result<Page, BackendError> {
        let response = self
            .request(Method::PATCH, &["pages", slug], ctx)?
            .json(input)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn delete_page(&self, ctx: &RequestContext, slug: &str) -> Result<(), BackendError> {
        let response = self
            .request(Method::DELETE, &["pages", slug], ctx)?
            .send()
            .await?;
        Self::check_status(response).await
    }

    async fn list_components(
        &self,
        ctx: &RequestContext,
        slug: &str,
        mode: ContentMode,
    ) -> Result<Vec<ComponentInstance>, BackendError> {
        let response = self
            .request(Method::GET, &["pages", slug, "components"], ctx)?
            .query(&[("status", mode.as_str())])
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn create_component(
        &self,
        ctx: &RequestContext,
        slug: &str,
        input: &NewComponent,
    ) -> Result<ComponentInstance, BackendError> {
        let response = self
            .request(Method::POST, &["pages", slug, "components"], ctx)?
            .json(input)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn update_component(
        &self,
        ctx: &RequestContext,
        slug: &str,
        component_id: &str,
        patch: &ComponentPatch,
    ) -> Result<ComponentInstance, BackendError> {
        let response = self
            .request(
                Method::PATCH,
                &["pages", slug, "components", component_id],
                ctx,
            )?
            .json(patch)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn delete_component(
        &self,
        ctx: &RequestContext,
        slug: &str,
        component_id: &str,
    ) -> Result<(), BackendError> {
        let response = self
            .request(
                Method::DELETE,
                &["pages", slug, "components", component_id],
                ctx,
            )?
            .send()
            .await?;
        Self::check_status(response).await
    }

    async fn publish_page(&self, ctx: &RequestContext, slug: &str) -> Result<(), BackendError> {
        let response = self
            .request(Method::POST, &["pages", slug, "publish"], ctx)?
            .send()
            .await?;
        Self::check_status(response).await
    }

    async fn reset_site(&self, ctx: &RequestContext) -> Result<(), BackendError> {
        let response = self
            .request(Method::POST, &["site", "reset"], ctx)?
            .send()
            .await?;
        Self::check_status(response).await
    }

    async fn list_collection(
        &self,
        ctx: &RequestContext,
        kind: CollectionKind,
    ) -> Result<Vec<CollectionItem>, BackendError> {
        let response = self
            .request(Method::GET, &["collections", kind.as_str()], ctx)?
            .send()
            .await?;
        Self::parse_response(response).await
    }
}
