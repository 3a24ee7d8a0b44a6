//! Client boundary for the site backend REST API.
//!
//! The backend owns persistence of pages, components and collections. This
//! crate defines the [`Backend`] trait the rest of the workspace talks to,
//! an HTTP implementation ([`http::HttpBackend`]) and an in-memory one
//! ([`memory::MemoryBackend`]) used by tests and local development.

pub mod http;
pub mod memory;

use async_trait::async_trait;
use sitebuilder_core::collections::{CollectionItem, CollectionKind};
use sitebuilder_core::component::{ComponentInstance, ComponentPatch, NewComponent};
use sitebuilder_core::page::{ContentMode, CreatePage, Page, UpdatePage};

pub use http::HttpBackend;
pub use memory::{DeletePolicy, MemoryBackend};

// ---------------------------------------------------------------------------
// RequestContext
// ---------------------------------------------------------------------------

/// Per-request identity forwarded to the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RequestContext {
    /// Tenant subdomain resolved from the request host.
    pub tenant: Option<String>,
    /// Bearer token attached to every call, required for mutations.
    pub token: Option<String>,
}

impl RequestContext {
    pub fn new(tenant: Option<String>, token: Option<String>) -> Self {
        Self { tenant, token }
    }

    /// Context for a tenant without credentials (public reads).
    pub fn for_tenant(tenant: impl Into<String>) -> Self {
        Self {
            tenant: Some(tenant.into()),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

// ---------------------------------------------------------------------------
// BackendError
// ---------------------------------------------------------------------------

/// Errors from the backend layer.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status. `message` is the
    /// backend's own error text, unmodified.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The backend answered 2xx with a body we could not decode.
    #[error("Invalid backend response: {0}")]
    Decode(String),

    /// The request URL could not be built; nothing was sent.
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
}

impl BackendError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(entity: &str, id: &str) -> Self {
        Self::api(404, format!("{entity} '{id}' not found"))
    }

    /// HTTP status returned by the backend, if it answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Request(err) => err.status().map(|s| s.as_u16()),
            Self::Decode(_) | Self::InvalidUrl(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

/// Operations the site builder needs from the backend.
///
/// Component endpoints are keyed by page slug and `component_id`; the
/// backend merges [`ComponentPatch::data`] into the stored payload.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn list_pages(&self, ctx: &RequestContext) -> Result<Vec<Page>, BackendError>;

    async fn create_page(
        &self,
        ctx: &RequestContext,
        input: &CreatePage,
    ) -> Result<Page, BackendError>;

    async fn update_page(
        &self,
        ctx: &RequestContext,
        slug: &str,
        input: &UpdatePage,
    ) -> Result<Page, BackendError>;

    /// Delete a page together with its components.
    async fn delete_page(&self, ctx: &RequestContext, slug: &str) -> Result<(), BackendError>;

    async fn list_components(
        &self,
        ctx: &RequestContext,
        slug: &str,
        mode: ContentMode,
    ) -> Result<Vec<ComponentInstance>, BackendError>;

    async fn create_component(
        &self,
        ctx: &RequestContext,
        slug: &str,
        input: &NewComponent,
    ) -> Result<ComponentInstance, BackendError>;

    async fn update_component(
        &self,
        ctx: &RequestContext,
        slug: &str,
        component_id: &str,
        patch: &ComponentPatch,
    ) -> Result<ComponentInstance, BackendError>;

    async fn delete_component(
        &self,
        ctx: &RequestContext,
        slug: &str,
        component_id: &str,
    ) -> Result<(), BackendError>;

    /// Copy a page's preview components over its published components.
    async fn publish_page(&self, ctx: &RequestContext, slug: &str) -> Result<(), BackendError>;

    /// Remove every page and component of the tenant's site.
    async fn reset_site(&self, ctx: &RequestContext) -> Result<(), BackendError>;

    async fn list_collection(
        &self,
        ctx: &RequestContext,
        kind: CollectionKind,
    ) -> Result<Vec<CollectionItem>, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_displays_backend_message_verbatim() {
        let err = BackendError::api(422, "Title is required");
        assert_eq!(err.to_string(), "Title is required");
        assert_eq!(err.status(), Some(422));
        assert!(!err.is_not_found());
    }

    #[test]
    fn not_found_helper() {
        let err = BackendError::not_found("Component", "hero-1");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Component 'hero-1' not found");
    }

    #[test]
    fn context_builders() {
        let ctx = RequestContext::for_tenant("acme").with_token("t0k");
        assert_eq!(ctx.tenant.as_deref(), Some("acme"));
        assert_eq!(ctx.token.as_deref(), Some("t0k"));
        assert_eq!(RequestContext::default().tenant, None);
    }
}
