//! Request middleware and extractors.
//!
//! - [`tenant::resolve_tenant`] -- Derives the tenant subdomain from `Host`.
//! - [`tenant::Tenant`] -- Extracts the resolved tenant.
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireOwner`] -- Requires the `owner` or `admin` role.

pub mod auth;
pub mod rbac;
pub mod tenant;
