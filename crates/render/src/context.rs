//! Per-view render state and the helpers views share.

use sitebuilder_core::collections::{CollectionItem, CollectionKind, SiteCollections};
use sitebuilder_core::component::ComponentInstance;
use sitebuilder_core::page::ContentMode;
use sitebuilder_core::schema::{decode_payload, ComponentDescriptor, ComponentType, Palette};

use crate::html::HtmlWriter;

/// Errors raised while rendering a single component.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("Invalid payload for '{component_id}': {message}")]
    Payload {
        component_id: String,
        message: String,
    },
}

/// Everything a page render needs besides the component list.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub mode: ContentMode,
    /// Emit the hooks the builder uses for inline editing.
    pub editable: bool,
    pub theme: Palette,
    pub collections: SiteCollections,
    /// Prefix for navigation links, e.g. `/sites`.
    pub base_path: String,
}

impl RenderContext {
    pub fn new(mode: ContentMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    pub fn with_theme(mut self, theme: Palette) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_collections(mut self, collections: SiteCollections) -> Self {
        self.collections = collections;
        self
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into().trim_end_matches('/').to_string();
        self
    }

    /// Navigation target for a clicked collection item.
    pub fn item_href(&self, kind: CollectionKind, slug: &str) -> String {
        format!("{}/{}/{}", self.base_path, kind.route_segment(), slug)
    }
}

/// One component being rendered, with its resolved type and style.
pub struct Section<'a> {
    pub instance: &'a ComponentInstance,
    pub component_type: ComponentType,
    pub style: &'static str,
    pub ctx: &'a RenderContext,
}

impl Section<'_> {
    /// Decode the typed payload for descriptor `D`.
    pub fn decode<D: ComponentDescriptor>(&self) -> Result<D::Data, RenderError> {
        decode_payload::<D>(&self.instance.data).map_err(|err| RenderError::Payload {
            component_id: self.instance.component_id.clone(),
            message: err.to_string(),
        })
    }

    /// Open the outer element of the section.
    pub fn open(&self, w: &mut HtmlWriter, tag: &str) {
        let class = format!(
            "section section-{ty} {ty}--{style}",
            ty = self.component_type,
            style = self.style
        );
        let id = self.instance.component_id.as_str();
        if self.ctx.editable {
            w.open(
                tag,
                &[
                    ("id", id),
                    ("class", class.as_str()),
                    ("data-component-id", id),
                    ("data-component-type", self.component_type.as_str()),
                    ("data-style", self.style),
                ],
            );
        } else {
            w.open(tag, &[("id", id), ("class", class.as_str())]);
        }
    }

    pub fn close(&self, w: &mut HtmlWriter, tag: &str) {
        w.close(tag);
    }

    /// A text element bound to payload field `field`.
    ///
    /// Editable views always emit the element so it can be filled in;
    /// otherwise empty text emits nothing.
    pub fn text(&self, w: &mut HtmlWriter, tag: &str, class: &str, field: &str, text: &str) {
        if self.ctx.editable {
            w.element(
                tag,
                &[
                    ("class", class),
                    ("contenteditable", "true"),
                    ("data-field", field),
                ],
                text,
            );
        } else if !text.is_empty() {
            w.element(tag, &[("class", class)], text);
        }
    }

    /// Same as [`text`](Self::text) for optional fields.
    pub fn optional_text(
        &self,
        w: &mut HtmlWriter,
        tag: &str,
        class: &str,
        field: &str,
        text: Option<&str>,
    ) {
        self.text(w, tag, class, field, text.unwrap_or_default());
    }

    pub fn collection(&self, kind: CollectionKind) -> Option<&[CollectionItem]> {
        self.ctx.collections.get(kind)
    }
}
