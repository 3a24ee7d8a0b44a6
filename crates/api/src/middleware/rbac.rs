//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! meet the minimum requirement.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sitebuilder_backend::RequestContext;
use sitebuilder_core::error::CoreError;
use sitebuilder_core::page::ContentMode;
use sitebuilder_core::roles::can_edit_site;

use super::auth::AuthUser;
use super::tenant::Tenant;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `owner` or `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn edit(RequireOwner(user): RequireOwner) -> AppResult<StatusCode> {
///     Ok(StatusCode::NO_CONTENT)
/// }
/// ```
pub struct RequireOwner(pub AuthUser);

impl FromRequestParts<AppState> for RequireOwner {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !can_edit_site(&user.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Owner or Admin role required".into(),
            )));
        }
        Ok(RequireOwner(user))
    }
}

/// Owner credentials that are only required for draft content.
///
/// Requests without an `Authorization` header extract as `None`; a header
/// that is present must belong to an owner or admin.
pub struct OptionalOwner(pub Option<AuthUser>);

impl OptionalOwner {
    /// Backend context for reading `mode`. Published content is public;
    /// the preview needs an owner and is fetched with their token.
    pub fn read_context(
        &self,
        tenant: &Tenant,
        mode: ContentMode,
    ) -> Result<RequestContext, AppError> {
        match (mode, &self.0) {
            (ContentMode::Published, _) => Ok(tenant.context()),
            (ContentMode::Preview, Some(user)) => Ok(tenant.context_for(user)),
            (ContentMode::Preview, None) => Err(AppError::Core(CoreError::Unauthorized(
                "Sign in to view unpublished content".into(),
            ))),
        }
    }
}

impl FromRequestParts<AppState> for OptionalOwner {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key("authorization") {
            return Ok(OptionalOwner(None));
        }
        let RequireOwner(user) = RequireOwner::from_request_parts(parts, state).await?;
        Ok(OptionalOwner(Some(user)))
    }
}
