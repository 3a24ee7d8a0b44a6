//! Component instances: the ordered, typed entries that make up a page.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Maximum length of a client-chosen component id.
pub const MAX_COMPONENT_ID_LENGTH: usize = 120;

// ---------------------------------------------------------------------------
// Wire records
// ---------------------------------------------------------------------------

/// One component of a page as stored by the backend.
///
/// `component_type` stays a plain string on the wire so that instances of
/// types this build does not know about survive transport and can be
/// skipped by the renderer instead of failing the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentInstance {
    pub id: DbId,
    /// Stable client-chosen identifier, unique within the page.
    pub component_id: String,
    pub component_type: String,
    /// Type-specific payload; shape is defined by the schema registry.
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default)]
    pub order: i32,
}

/// Payload sent to the backend to create a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewComponent {
    pub component_id: String,
    pub component_type: String,
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

/// Partial update for a component. Only changed fields are sent; the
/// backend merges `data` into the stored payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

impl ComponentPatch {
    /// Returns `true` if the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.data.is_none() && self.order.is_none()
    }
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Sort components into render order.
///
/// Primary key is `order`; equal orders fall back to `component_id` in
/// ascending lexical order so the result never depends on backend array
/// order.
pub fn sort_components(components: &mut [ComponentInstance]) {
    components.sort_by(|a, b| {
        a.order
            .cmp(&b.order)
            .then_with(|| a.component_id.cmp(&b.component_id))
    });
}

/// The order value that appends a component after every existing one.
pub fn next_order(components: &[ComponentInstance]) -> i32 {
    components
        .iter()
        .map(|c| c.order)
        .max()
        .map_or(0, |max| max.saturating_add(1))
}

/// Generate a fresh component id for the given type tag.
pub fn generate_component_id(component_type: &str) -> String {
    format!("{component_type}-{}", uuid::Uuid::now_v7().simple())
}

/// Returns `true` if `id` is usable as a component id.
pub fn is_valid_component_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_COMPONENT_ID_LENGTH
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Reject ids that are not usable as a URL path segment of a component.
pub fn ensure_component_id(id: &str) -> Result<(), CoreError> {
    if is_valid_component_id(id) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!("Invalid component_id: '{id}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(component_id: &str, order: i32) -> ComponentInstance {
        ComponentInstance {
            id: 0,
            component_id: component_id.into(),
            component_type: "hero".into(),
            data: serde_json::json!({}),
            order,
        }
    }

    #[test]
    fn sorts_by_order_then_component_id() {
        let mut list = vec![
            instance("footer-1", 9),
            instance("hero-b", 0),
            instance("faq-1", 4),
            instance("hero-a", 0),
        ];
        sort_components(&mut list);
        let ids: Vec<_> = list.iter().map(|c| c.component_id.as_str()).collect();
        assert_eq!(ids, ["hero-a", "hero-b", "faq-1", "footer-1"]);
    }

    #[test]
    fn next_order_appends() {
        assert_eq!(next_order(&[]), 0);
        assert_eq!(next_order(&[instance("a", 3), instance("b", 10)]), 11);
        assert_eq!(next_order(&[instance("a", -4)]), -3);
    }

    #[test]
    fn generated_ids_are_prefixed_and_unique() {
        let a = generate_component_id("hero");
        let b = generate_component_id("hero");
        assert!(a.starts_with("hero-"));
        assert!(is_valid_component_id(&a));
        assert_ne!(a, b);
    }

    #[test]
    fn component_id_charset() {
        assert!(is_valid_component_id("hero-1"));
        assert!(is_valid_component_id("faq_main"));
        assert!(!is_valid_component_id(""));
        assert!(!is_valid_component_id("hero 1"));
        assert!(!is_valid_component_id("hero/1"));
    }

    #[test]
    fn dot_segments_are_not_component_ids() {
        for id in ["..", ".", "../home", "%2e%2e"] {
            assert!(ensure_component_id(id).is_err(), "{id} accepted");
        }
        assert!(ensure_component_id("hero-1").is_ok());
    }

    #[test]
    fn instance_tolerates_missing_data_and_order() {
        let parsed: ComponentInstance = serde_json::from_value(serde_json::json!({
            "id": 7,
            "component_id": "pricing-1",
            "component_type": "pricing"
        }))
        .unwrap();
        assert!(parsed.data.is_null());
        assert_eq!(parsed.order, 0);
    }

    #[test]
    fn patch_serializes_only_changed_fields() {
        let patch = ComponentPatch {
            data: Some(serde_json::json!({"title": "Welcome Back"})),
            order: None,
        };
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            serde_json::json!({"data": {"title": "Welcome Back"}})
        );
        assert!(ComponentPatch::default().is_empty());
    }
}
