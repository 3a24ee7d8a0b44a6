//! Shared query parameter types for API handlers.

use serde::Deserialize;
use sitebuilder_core::page::ContentMode;

use crate::error::AppResult;

/// `?status=preview|published`, defaulting to preview.
#[derive(Debug, Default, Deserialize)]
pub struct StatusParams {
    pub status: Option<String>,
}

impl StatusParams {
    pub fn mode(&self) -> AppResult<ContentMode> {
        match self.status.as_deref() {
            None | Some("") => Ok(ContentMode::default()),
            Some(status) => Ok(ContentMode::parse(status)?),
        }
    }
}

/// Query parameters of the rendered site page (`?status=&edit=`).
#[derive(Debug, Default, Deserialize)]
pub struct RenderParams {
    pub status: Option<String>,
    #[serde(default)]
    pub edit: bool,
}

impl RenderParams {
    /// Public pages default to the published content.
    pub fn mode(&self) -> AppResult<ContentMode> {
        match self.status.as_deref() {
            None | Some("") => Ok(ContentMode::Published),
            Some(status) => Ok(ContentMode::parse(status)?),
        }
    }
}
