//! HTML rendering of site pages.
//!
//! Each component instance is dispatched on its type tag and style to a
//! view function. Unknown types are skipped, so a page written by a newer
//! builder still renders everything this build understands.

pub mod context;
pub mod html;
pub mod page;
pub mod registry;
pub mod views;
pub mod youtube;

pub use context::{RenderContext, RenderError, Section};
pub use page::{
    render_document, render_item, render_page, required_collections, site_theme, PageOutcome,
    PageState, RenderedPage,
};
pub use registry::{ResolvedView, ViewRegistry};
