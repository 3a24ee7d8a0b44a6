//! Concrete views, one function per `(component type, style)`.

pub mod collections;
pub mod content;
pub mod forms;
pub mod hero;
pub mod media;
pub mod navigation;

use crate::context::{RenderError, Section};
use crate::html::HtmlWriter;

/// Renders one component into the writer.
pub type View = fn(&Section<'_>, &mut HtmlWriter) -> Result<(), RenderError>;

/// `<a>` with an optional target; nothing is written without a label.
pub(crate) fn link(w: &mut HtmlWriter, class: &str, href: Option<&str>, label: Option<&str>) {
    match (label.filter(|l| !l.is_empty()), href) {
        (Some(label), Some(href)) => w.element("a", &[("class", class), ("href", href)], label),
        (Some(label), None) => w.element("span", &[("class", class)], label),
        (None, _) => {}
    }
}

pub(crate) fn image(w: &mut HtmlWriter, class: &str, src: Option<&str>, alt: &str) {
    if let Some(src) = src.filter(|s| !s.is_empty()) {
        w.void("img", &[("class", class), ("src", src), ("alt", alt)]);
    }
}
