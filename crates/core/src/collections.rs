//! Site collections rendered by components but owned elsewhere.
//!
//! Product, blog, service, category and pricing-plan lists are fetched
//! separately from a page's components; the corresponding component
//! payloads only configure how the list is presented.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Which collection a list of items belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    Products,
    Blogs,
    Services,
    Categories,
    PricingPlans,
}

impl CollectionKind {
    pub const ALL: [CollectionKind; 5] = [
        CollectionKind::Products,
        CollectionKind::Blogs,
        CollectionKind::Services,
        CollectionKind::Categories,
        CollectionKind::PricingPlans,
    ];

    /// Return the wire-format string for this variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Blogs => "blogs",
            Self::Services => "services",
            Self::Categories => "categories",
            Self::PricingPlans => "pricing_plans",
        }
    }

    /// Parse from a wire-format string.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Invalid collection: '{s}'")))
    }

    /// URL segment used when an item of this kind is clicked.
    pub fn route_segment(&self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Blogs => "blog",
            Self::Services => "services",
            Self::Categories => "categories",
            Self::PricingPlans => "pricing",
        }
    }

    /// Inverse of [`route_segment`](Self::route_segment).
    pub fn from_route_segment(segment: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.route_segment() == segment)
    }
}

impl std::fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

impl CollectionItem {
    /// Path segment that addresses this item: its slug, or its id when
    /// the backend sent no slug.
    pub fn link_slug(&self) -> &str {
        if self.slug.is_empty() {
            &self.id
        } else {
            &self.slug
        }
    }
}

/// Collections available to the renderer for one page view.
///
/// A missing kind means "not loaded"; an empty vector means "loaded, no
/// items".
#[derive(Debug, Clone, Default)]
pub struct SiteCollections {
    items: HashMap<CollectionKind, Vec<CollectionItem>>,
}

impl SiteCollections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: CollectionKind, items: Vec<CollectionItem>) {
        self.items.insert(kind, items);
    }

    pub fn with(mut self, kind: CollectionKind, items: Vec<CollectionItem>) -> Self {
        self.insert(kind, items);
        self
    }

    pub fn get(&self, kind: CollectionKind) -> Option<&[CollectionItem]> {
        self.items.get(&kind).map(Vec::as_slice)
    }
}
