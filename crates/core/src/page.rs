//! Pages and the preview/published content modes.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a page slug.
pub const MAX_SLUG_LENGTH: usize = 100;

/// Maximum length of a page title.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Lowercase words separated by single hyphens.
static SLUG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug pattern is valid"));

/// Returns `true` if `slug` is a well-formed page slug.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slug.len() <= MAX_SLUG_LENGTH && SLUG_PATTERN.is_match(slug)
}

/// `validator` hook for slug fields.
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if is_valid_slug(slug) {
        Ok(())
    } else {
        Err(ValidationError::new("slug")
            .with_message("must be lowercase letters, digits and single hyphens".into()))
    }
}

/// Validate a slug taken from a URL path.
pub fn ensure_slug(slug: &str) -> Result<(), CoreError> {
    if is_valid_slug(slug) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!("Invalid page slug: '{slug}'")))
    }
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// A page of a tenant's site, identified by its slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub id: DbId,
    pub title: String,
    pub slug: String,
}

/// DTO for creating a page.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePage {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(custom(function = "validate_slug"))]
    pub slug: String,
}

/// DTO for renaming a page or changing its slug.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdatePage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
}

// ---------------------------------------------------------------------------
// ContentMode
// ---------------------------------------------------------------------------

/// Which snapshot of a page's component list is being read.
///
/// The two snapshots are independent datasets: a component added in
/// preview stays absent from published until the page is published.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentMode {
    /// Editable draft state.
    #[default]
    Preview,
    /// Live, publicly served state.
    Published,
}

impl ContentMode {
    pub const ALL: [ContentMode; 2] = [ContentMode::Preview, ContentMode::Published];

    /// Return the wire-format string for this variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preview => "preview",
            Self::Published => "published",
        }
    }

    /// Parse from a wire-format string.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "preview" => Ok(Self::Preview),
            "published" => Ok(Self::Published),
            _ => Err(CoreError::Validation(format!(
                "Invalid status: '{s}'. Must be one of: preview, published"
            ))),
        }
    }
}

impl std::fmt::Display for ContentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_slugs() {
        assert!(is_valid_slug("home"));
        assert!(is_valid_slug("about-us"));
        assert!(is_valid_slug("summer-sale-2026"));
    }

    #[test]
    fn rejects_malformed_slugs() {
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("Home"));
        assert!(!is_valid_slug("about--us"));
        assert!(!is_valid_slug("-home"));
        assert!(!is_valid_slug("home/../admin"));
        assert!(!is_valid_slug(&"a".repeat(MAX_SLUG_LENGTH + 1)));
    }

    #[test]
    fn create_page_validation() {
        let ok = CreatePage {
            title: "Home".into(),
            slug: "home".into(),
        };
        assert!(ok.validate().is_ok());

        let bad = CreatePage {
            title: String::new(),
            slug: "Not A Slug".into(),
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("slug"));
    }

    #[test]
    fn update_page_skips_absent_fields() {
        let rename = UpdatePage {
            title: Some("Landing".into()),
            slug: None,
        };
        assert!(rename.validate().is_ok());
        assert_eq!(
            serde_json::to_value(&rename).unwrap(),
            serde_json::json!({"title": "Landing"})
        );
    }

    #[test]
    fn content_mode_round_trips_wire_names() {
        for mode in ContentMode::ALL {
            assert_eq!(ContentMode::parse(mode.as_str()).unwrap(), mode);
        }
        assert_eq!(ContentMode::default(), ContentMode::Preview);
        assert!(ContentMode::parse("draft").is_err());
    }
}
