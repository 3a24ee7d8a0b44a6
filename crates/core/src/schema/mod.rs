//! Component schema registry.
//!
//! Maps each component type tag to the shape of its `data` payload, its
//! allowed style variants, and the defaults used when the payload is
//! partial or absent. Unknown tags resolve to `None`, never to an error,
//! so read paths can skip them.

pub mod payloads;

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::error::CoreError;
use crate::merge::strip_removals;

// ---------------------------------------------------------------------------
// ComponentType
// ---------------------------------------------------------------------------

/// The closed set of component types this build understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    Navbar,
    Hero,
    About,
    Blog,
    Products,
    Categories,
    Services,
    Faq,
    Pricing,
    Testimonials,
    Contact,
    Appointment,
    OrderConfirmation,
    Youtube,
    Footer,
}

impl ComponentType {
    pub const ALL: [ComponentType; 15] = [
        ComponentType::Navbar,
        ComponentType::Hero,
        ComponentType::About,
        ComponentType::Blog,
        ComponentType::Products,
        ComponentType::Categories,
        ComponentType::Services,
        ComponentType::Faq,
        ComponentType::Pricing,
        ComponentType::Testimonials,
        ComponentType::Contact,
        ComponentType::Appointment,
        ComponentType::OrderConfirmation,
        ComponentType::Youtube,
        ComponentType::Footer,
    ];

    /// Return the wire-format tag for this variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Navbar => "navbar",
            Self::Hero => "hero",
            Self::About => "about",
            Self::Blog => "blog",
            Self::Products => "products",
            Self::Categories => "categories",
            Self::Services => "services",
            Self::Faq => "faq",
            Self::Pricing => "pricing",
            Self::Testimonials => "testimonials",
            Self::Contact => "contact",
            Self::Appointment => "appointment",
            Self::OrderConfirmation => "order_confirmation",
            Self::Youtube => "youtube",
            Self::Footer => "footer",
        }
    }

    /// Parse a wire-format tag. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.as_str() == tag)
    }

    /// Allowed style variants; the first one is the default.
    pub fn styles(&self) -> &'static [&'static str] {
        match self {
            Self::Navbar => &["simple", "centered"],
            Self::Hero => &["centered", "split", "overlay"],
            Self::About => &["simple", "image-left", "image-right"],
            Self::Blog => &["grid", "list"],
            Self::Products => &["grid", "list"],
            Self::Categories => &["grid", "pills"],
            Self::Services => &["cards", "list"],
            Self::Faq => &["accordion", "two-column"],
            Self::Pricing => &["cards", "table"],
            Self::Testimonials => &["cards", "quote"],
            Self::Contact => &["form", "split"],
            Self::Appointment => &["form"],
            Self::OrderConfirmation => &["simple"],
            Self::Youtube => &["embed", "card"],
            Self::Footer => &["simple", "columns"],
        }
    }

    pub fn default_style(&self) -> &'static str {
        self.styles()[0]
    }

    /// Resolve a requested style to an allowed one, falling back to the
    /// default style when absent or unrecognised.
    pub fn resolve_style(&self, requested: Option<&str>) -> &'static str {
        requested
            .and_then(|req| self.styles().iter().copied().find(|s| *s == req))
            .unwrap_or_else(|| self.default_style())
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read the optional `style` key from a component payload.
pub fn style_of(data: &Value) -> Option<&str> {
    data.get("style").and_then(Value::as_str)
}

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// Site theme colours. Missing colours fall back to the default palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub primary: String,
    pub secondary: String,
    pub background: String,
    pub text: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: "#2563eb".into(),
            secondary: "#f97316".into(),
            background: "#ffffff".into(),
            text: "#111827".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Descriptors
// ---------------------------------------------------------------------------

/// Compile-time description of one component type.
///
/// Generic code (the CRUD gateway, the view registry) is parameterised by
/// a descriptor instead of being duplicated per type.
pub trait ComponentDescriptor: 'static {
    const TYPE: ComponentType;
    type Data: Serialize
        + DeserializeOwned
        + Validate
        + Default
        + Clone
        + PartialEq
        + std::fmt::Debug
        + Send
        + Sync
        + 'static;
}

/// Decode a payload into its typed form, filling defaults for missing
/// fields. `null` decodes as the all-defaults payload.
pub fn decode_payload<D: ComponentDescriptor>(data: &Value) -> Result<D::Data, CoreError> {
    match data {
        Value::Null => Ok(D::Data::default()),
        Value::Object(_) => serde_json::from_value(data.clone())
            .map_err(|e| CoreError::Validation(format!("Invalid {} payload: {e}", D::TYPE))),
        _ => Err(CoreError::Validation(format!(
            "{} payload must be a JSON object",
            D::TYPE
        ))),
    }
}

fn check_style(component_type: ComponentType, data: &Value) -> Result<(), CoreError> {
    match data.get("style") {
        None | Some(Value::Null) => Ok(()),
        Some(Value::String(style)) if component_type.styles().contains(&style.as_str()) => Ok(()),
        Some(other) => Err(CoreError::Validation(format!(
            "Invalid style {other} for {component_type}. Must be one of: {}",
            component_type.styles().join(", ")
        ))),
    }
}

fn check_payload<D: ComponentDescriptor>(data: &Value) -> Result<(), CoreError> {
    check_style(D::TYPE, data)?;
    decode_payload::<D>(data)?.validate()?;
    Ok(())
}

fn check_partial<D: ComponentDescriptor>(patch: &Value) -> Result<(), CoreError> {
    if !patch.is_object() {
        return Err(CoreError::Validation(format!(
            "{} update must be a JSON object",
            D::TYPE
        )));
    }
    check_payload::<D>(&strip_removals(patch))
}

fn default_payload<D: ComponentDescriptor>() -> Value {
    serde_json::to_value(D::Data::default()).unwrap_or_else(|_| Value::Object(Default::default()))
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Registry entry for one component type.
#[derive(Clone, Copy)]
pub struct SchemaEntry {
    component_type: ComponentType,
    validate_full: fn(&Value) -> Result<(), CoreError>,
    validate_partial: fn(&Value) -> Result<(), CoreError>,
    defaults: fn() -> Value,
}

impl std::fmt::Debug for SchemaEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaEntry")
            .field("component_type", &self.component_type)
            .finish_non_exhaustive()
    }
}

impl SchemaEntry {
    fn of<D: ComponentDescriptor>() -> Self {
        Self {
            component_type: D::TYPE,
            validate_full: check_payload::<D>,
            validate_partial: check_partial::<D>,
            defaults: default_payload::<D>,
        }
    }

    pub fn component_type(&self) -> ComponentType {
        self.component_type
    }

    pub fn styles(&self) -> &'static [&'static str] {
        self.component_type.styles()
    }

    pub fn resolve_style(&self, data: &Value) -> &'static str {
        self.component_type.resolve_style(style_of(data))
    }

    /// Validate a complete payload for creation.
    pub fn validate(&self, data: &Value) -> Result<(), CoreError> {
        (self.validate_full)(data)
    }

    /// Validate a partial payload for a merge update. `null` entries mean
    /// "remove" and are not type-checked.
    pub fn validate_partial(&self, patch: &Value) -> Result<(), CoreError> {
        (self.validate_partial)(patch)
    }

    /// The all-defaults payload, used when adding a fresh section.
    pub fn defaults(&self) -> Value {
        (self.defaults)()
    }
}

/// Mapping from component type tag to [`SchemaEntry`].
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    entries: HashMap<&'static str, SchemaEntry>,
}

static BUILTIN: LazyLock<SchemaRegistry> = LazyLock::new(SchemaRegistry::builtin);

impl SchemaRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in component type.
    pub fn builtin() -> Self {
        use payloads::*;

        let mut registry = Self::new();
        registry.register::<Navbar>();
        registry.register::<Hero>();
        registry.register::<About>();
        registry.register::<Blog>();
        registry.register::<Products>();
        registry.register::<Categories>();
        registry.register::<Services>();
        registry.register::<Faq>();
        registry.register::<Pricing>();
        registry.register::<Testimonials>();
        registry.register::<Contact>();
        registry.register::<Appointment>();
        registry.register::<OrderConfirmation>();
        registry.register::<Youtube>();
        registry.register::<Footer>();
        registry
    }

    /// Shared instance of [`SchemaRegistry::builtin`].
    pub fn global() -> &'static SchemaRegistry {
        &BUILTIN
    }

    pub fn register<D: ComponentDescriptor>(&mut self) {
        self.entries.insert(D::TYPE.as_str(), SchemaEntry::of::<D>());
    }

    /// Look up a tag. Unknown tags yield `None`.
    pub fn lookup(&self, tag: &str) -> Option<&SchemaEntry> {
        self.entries.get(tag)
    }

    /// Like [`lookup`](Self::lookup) but for write paths, where an unknown
    /// tag is a validation error.
    pub fn require(&self, tag: &str) -> Result<&SchemaEntry, CoreError> {
        self.lookup(tag).ok_or_else(|| {
            CoreError::Validation(format!("Unknown component_type: '{tag}'"))
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
