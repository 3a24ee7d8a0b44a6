//! Dispatch from `(component type, style)` to a view.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde_json::Value;
use sitebuilder_core::schema::{style_of, ComponentType};

use crate::views::{collections, content, forms, hero, media, navigation, View};

/// A view resolved for one component instance.
#[derive(Clone, Copy)]
pub struct ResolvedView {
    pub component_type: ComponentType,
    pub style: &'static str,
    pub view: View,
}

/// Mapping from `(component type, style)` to the view that draws it.
#[derive(Clone, Default)]
pub struct ViewRegistry {
    views: HashMap<(ComponentType, &'static str), View>,
}

static BUILTIN: LazyLock<ViewRegistry> = LazyLock::new(ViewRegistry::builtin);

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A view for every style of every built-in type.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for component_type in ComponentType::ALL {
            for &style in component_type.styles() {
                registry.register(component_type, style, builtin_view(component_type, style));
            }
        }
        registry
    }

    pub fn global() -> &'static ViewRegistry {
        &BUILTIN
    }

    pub fn register(&mut self, component_type: ComponentType, style: &'static str, view: View) {
        self.views.insert((component_type, style), view);
    }

    /// Resolve the view for a type tag and payload.
    ///
    /// Unknown tags yield `None`. A missing or unknown `style` uses the
    /// type's default style.
    pub fn lookup(&self, tag: &str, data: &Value) -> Option<ResolvedView> {
        let component_type = ComponentType::from_tag(tag)?;
        let style = component_type.resolve_style(style_of(data));
        let view = self
            .views
            .get(&(component_type, style))
            .or_else(|| {
                self.views
                    .get(&(component_type, component_type.default_style()))
            })
            .copied()?;
        Some(ResolvedView {
            component_type,
            style,
            view,
        })
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

fn builtin_view(component_type: ComponentType, style: &str) -> View {
    match component_type {
        ComponentType::Navbar => match style {
            "centered" => navigation::navbar_centered,
            _ => navigation::navbar_simple,
        },
        ComponentType::Hero => match style {
            "split" => hero::hero_split,
            "overlay" => hero::hero_overlay,
            _ => hero::hero_centered,
        },
        ComponentType::About => match style {
            "image-left" | "image-right" => hero::about_with_image,
            _ => hero::about_simple,
        },
        ComponentType::Blog => collections::blog,
        ComponentType::Products => collections::products,
        ComponentType::Categories => collections::categories,
        ComponentType::Services => collections::services,
        ComponentType::Faq => match style {
            "two-column" => content::faq_two_column,
            _ => content::faq_accordion,
        },
        ComponentType::Pricing => match style {
            "table" => collections::pricing_table,
            _ => collections::pricing_cards,
        },
        ComponentType::Testimonials => match style {
            "quote" => content::testimonials_quote,
            _ => content::testimonials_cards,
        },
        ComponentType::Contact => match style {
            "split" => forms::contact_split,
            _ => forms::contact_form_view,
        },
        ComponentType::Appointment => forms::appointment_form,
        ComponentType::OrderConfirmation => forms::order_confirmation,
        ComponentType::Youtube => match style {
            "card" => media::youtube_card,
            _ => media::youtube_embed,
        },
        ComponentType::Footer => match style {
            "columns" => navigation::footer_columns,
            _ => navigation::footer_simple,
        },
    }
}
