//! Whole-page rendering.
//!
//! A page view is loading, failed, or loaded. A loaded page with no
//! components renders a not-found placeholder when published and an
//! "add a section" prompt when being edited. Components with unknown types
//! are skipped; a component whose payload cannot be decoded is skipped on
//! its own without affecting the rest of the page. A page where every
//! component was skipped renders like an empty one.

use std::collections::HashSet;
use std::sync::Arc;

use sitebuilder_core::collections::{CollectionItem, CollectionKind};
use sitebuilder_core::component::{sort_components, ComponentInstance};
use sitebuilder_core::page::ContentMode;
use sitebuilder_core::schema::payloads::Navbar;
use sitebuilder_core::schema::{decode_payload, ComponentType, Palette};

use crate::context::{RenderContext, Section};
use crate::html::{escape_html, HtmlWriter};
use crate::registry::ViewRegistry;

/// Load state of one page view.
#[derive(Debug, Clone)]
pub enum PageState {
    Loading,
    /// The component list could not be fetched.
    Failed(String),
    Loaded(Arc<[ComponentInstance]>),
}

/// Which branch of the page state machine produced the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    Loading,
    Failed,
    /// Published page with no components.
    NotFound,
    /// Editable page with no components yet.
    Empty,
    Populated,
}

/// Rendered body markup plus what went into it.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub outcome: PageOutcome,
    pub html: String,
    /// Component ids that were drawn, in order.
    pub rendered: Vec<String>,
    /// Component ids left out because their type is unknown or their
    /// payload could not be decoded.
    pub skipped: Vec<String>,
}

impl RenderedPage {
    fn placeholder(outcome: PageOutcome, html: String) -> Self {
        Self {
            outcome,
            html,
            rendered: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

/// Render a page with the built-in views.
pub fn render_page(state: &PageState, ctx: &RenderContext) -> RenderedPage {
    ViewRegistry::global().render_page(state, ctx)
}

impl ViewRegistry {
    /// Render the body of a page view.
    pub fn render_page(&self, state: &PageState, ctx: &RenderContext) -> RenderedPage {
        let mut w = HtmlWriter::new();
        let components = match state {
            PageState::Loading => {
                w.element("div", &[("class", "page-loading"), ("aria-busy", "true")], "Loading…");
                return RenderedPage::placeholder(PageOutcome::Loading, w.finish());
            }
            PageState::Failed(message) => {
                tracing::warn!(error = %message, "Rendering error fallback for page");
                w.open("div", &[("class", "page-error"), ("role", "alert")]);
                w.element("p", &[], "This page could not be loaded. Please try again.");
                w.close("div");
                return RenderedPage::placeholder(PageOutcome::Failed, w.finish());
            }
            PageState::Loaded(components) => components,
        };

        if components.is_empty() {
            return self.render_empty(ctx, w);
        }

        let mut ordered = components.to_vec();
        sort_components(&mut ordered);

        let mut rendered = Vec::with_capacity(ordered.len());
        let mut skipped = Vec::new();

        w.open("main", &[("class", "page")]);
        for instance in &ordered {
            let Some(resolved) = self.lookup(&instance.component_type, &instance.data) else {
                tracing::warn!(
                    component_id = %instance.component_id,
                    component_type = %instance.component_type,
                    "Skipping component with unknown type"
                );
                skipped.push(instance.component_id.clone());
                continue;
            };

            let section = Section {
                instance,
                component_type: resolved.component_type,
                style: resolved.style,
                ctx,
            };
            let mut scratch = w.scratch();
            match (resolved.view)(&section, &mut scratch) {
                Ok(()) => {
                    w.append(scratch);
                    rendered.push(instance.component_id.clone());
                }
                Err(err) => {
                    tracing::warn!(component_id = %instance.component_id, error = %err, "Skipping component");
                    skipped.push(instance.component_id.clone());
                }
            }
        }
        w.close("main");

        if rendered.is_empty() {
            let mut page = self.render_empty(ctx, HtmlWriter::new());
            page.skipped = skipped;
            return page;
        }

        RenderedPage {
            outcome: PageOutcome::Populated,
            html: w.finish(),
            rendered,
            skipped,
        }
    }

    fn render_empty(&self, ctx: &RenderContext, mut w: HtmlWriter) -> RenderedPage {
        if ctx.editable && ctx.mode == ContentMode::Preview {
            w.open("div", &[("class", "page-empty"), ("data-builder-empty", "true")]);
            w.element("p", &[], "This page has no sections yet.");
            w.element(
                "button",
                &[("type", "button"), ("class", "button"), ("data-action", "add-section")],
                "Add a section",
            );
            w.close("div");
            RenderedPage::placeholder(PageOutcome::Empty, w.finish())
        } else {
            w.open("div", &[("class", "page-not-found")]);
            w.element("h1", &[], "404");
            w.element("p", &[], "This page does not exist yet.");
            w.close("div");
            RenderedPage::placeholder(PageOutcome::NotFound, w.finish())
        }
    }
}

/// Render the page of one collection item, reached from a collection
/// section's link. `None` renders the not-found placeholder.
pub fn render_item(kind: CollectionKind, item: Option<&CollectionItem>) -> RenderedPage {
    let mut w = HtmlWriter::new();
    let Some(item) = item else {
        w.open("div", &[("class", "page-not-found")]);
        w.element("h1", &[], "404");
        w.element("p", &[], "This item does not exist.");
        w.close("div");
        return RenderedPage::placeholder(PageOutcome::NotFound, w.finish());
    };

    let class = format!("page item-page item-{}", kind.route_segment());
    w.open("main", &[("class", class.as_str()), ("data-item-id", item.id.as_str())]);
    w.open("article", &[("class", "item")]);
    w.element("h1", &[("class", "item-title")], &item.title);
    if let Some(image) = item.image.as_deref().filter(|src| !src.is_empty()) {
        w.void(
            "img",
            &[("class", "item-image"), ("src", image), ("alt", item.title.as_str())],
        );
    }
    if let Some(description) = &item.description {
        w.element("p", &[("class", "item-description")], description);
    }
    if let Some(price) = item.price {
        w.element("span", &[("class", "price")], &format!("{price:.2}"));
    }
    w.close("article");
    w.close("main");

    RenderedPage {
        outcome: PageOutcome::Populated,
        html: w.finish(),
        rendered: vec![item.id.clone()],
        skipped: Vec::new(),
    }
}

/// Theme of a page: the `theme` of its first navbar, with missing colours
/// taken from the default palette.
pub fn site_theme(components: &[ComponentInstance]) -> Palette {
    let mut navbars: Vec<_> = components
        .iter()
        .filter(|c| ComponentType::from_tag(&c.component_type) == Some(ComponentType::Navbar))
        .cloned()
        .collect();
    sort_components(&mut navbars);
    navbars
        .iter()
        .find_map(|c| decode_payload::<Navbar>(&c.data).ok()?.theme)
        .unwrap_or_default()
}

/// Collection a component type lists, if any.
pub fn collection_for(component_type: ComponentType) -> Option<CollectionKind> {
    match component_type {
        ComponentType::Blog => Some(CollectionKind::Blogs),
        ComponentType::Products => Some(CollectionKind::Products),
        ComponentType::Categories => Some(CollectionKind::Categories),
        ComponentType::Services => Some(CollectionKind::Services),
        ComponentType::Pricing => Some(CollectionKind::PricingPlans),
        _ => None,
    }
}

/// Collections the given components need to render, without duplicates.
pub fn required_collections(components: &[ComponentInstance]) -> Vec<CollectionKind> {
    let needed: HashSet<_> = components
        .iter()
        .filter_map(|c| ComponentType::from_tag(&c.component_type))
        .filter_map(collection_for)
        .collect();
    CollectionKind::ALL
        .into_iter()
        .filter(|kind| needed.contains(kind))
        .collect()
}

/// Wrap a rendered body in a complete HTML document with the theme's
/// colours as CSS custom properties.
pub fn render_document(title: &str, page: &RenderedPage, ctx: &RenderContext) -> String {
    let theme = &ctx.theme;
    let mut w = HtmlWriter::new();
    w.raw_line("<!DOCTYPE html>");
    w.open("html", &[("lang", "en")]);

    w.open("head", &[]);
    w.void("meta", &[("charset", "utf-8")]);
    w.void(
        "meta",
        &[("name", "viewport"), ("content", "width=device-width, initial-scale=1")],
    );
    w.element("title", &[], title);
    w.raw_line(&format!(
        "<style>:root{{--color-primary:{};--color-secondary:{};--color-background:{};--color-text:{};}}</style>",
        escape_html(&theme.primary),
        escape_html(&theme.secondary),
        escape_html(&theme.background),
        escape_html(&theme.text),
    ));
    w.close("head");

    let mode = ctx.mode.as_str();
    if ctx.editable {
        w.open("body", &[("data-mode", mode), ("data-editable", "true")]);
    } else {
        w.open("body", &[("data-mode", mode)]);
    }
    for line in page.html.lines() {
        w.raw_line(line);
    }
    w.close("body");

    w.close("html");
    w.finish()
}
