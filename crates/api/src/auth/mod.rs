//! Authentication primitives.
//!
//! - [`jwt`] -- access-token validation. Tokens are issued by the site
//!   backend; this service only checks them and forwards them unchanged.

pub mod jwt;
