//! Tenant resolution.
//!
//! Every request is tagged with the tenant it addresses, carried in the
//! `x-tenant-subdomain` header. A tenant host (`acme.{ROOT_DOMAIN}`) always
//! wins. On the apex domain the builder dashboard may name the tenant
//! explicitly through the header itself.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::HOST;
use axum::http::request::Parts;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use sitebuilder_backend::RequestContext;
use sitebuilder_core::tenant::{is_valid_label, resolve_subdomain, TENANT_HEADER};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Middleware that sets `x-tenant-subdomain` from the `Host` header.
pub async fn resolve_tenant(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let from_host = request
        .headers()
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .and_then(|host| resolve_subdomain(host, &state.config.root_domain));

    let headers = request.headers_mut();
    match from_host {
        Some(subdomain) => {
            if let Ok(value) = HeaderValue::from_str(&subdomain) {
                headers.insert(TENANT_HEADER, value);
            }
        }
        None => {
            let explicit_ok = headers
                .get(TENANT_HEADER)
                .and_then(|v| v.to_str().ok())
                .is_some_and(is_valid_label);
            if !explicit_ok {
                headers.remove(TENANT_HEADER);
            }
        }
    }

    next.run(request).await
}

/// The tenant a request addresses. `None` is the apex site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tenant(pub Option<String>);

impl Tenant {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Backend context for anonymous reads.
    pub fn context(&self) -> RequestContext {
        RequestContext::new(self.0.clone(), None)
    }

    /// Backend context carrying the user's token for writes.
    pub fn context_for(&self, user: &AuthUser) -> RequestContext {
        RequestContext::new(self.0.clone(), Some(user.token.clone()))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Tenant {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let tenant = parts
            .headers
            .get(TENANT_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        Ok(Tenant(tenant))
    }
}
