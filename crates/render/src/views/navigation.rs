//! Navbar and footer.

use sitebuilder_core::schema::payloads::{Footer, Navbar, NavLink};

use super::{image, link};
use crate::context::{RenderError, Section};
use crate::html::HtmlWriter;

fn nav_links(w: &mut HtmlWriter, links: &[NavLink]) {
    if links.is_empty() {
        return;
    }
    w.open("ul", &[("class", "nav-links")]);
    for nav in links {
        w.open("li", &[]);
        link(w, "nav-link", Some(&nav.href), Some(&nav.label));
        w.close("li");
    }
    w.close("ul");
}

fn navbar(section: &Section<'_>, w: &mut HtmlWriter, centered: bool) -> Result<(), RenderError> {
    let data = section.decode::<Navbar>()?;
    section.open(w, "header");
    w.open("nav", &[("class", "navbar")]);

    w.open("div", &[("class", "navbar-brand")]);
    image(w, "navbar-logo", data.logo.as_deref(), &data.brand);
    section.text(w, "span", "navbar-title", "brand", &data.brand);
    w.close("div");

    if centered {
        w.open("div", &[("class", "navbar-center")]);
        nav_links(w, &data.links);
        w.close("div");
    } else {
        nav_links(w, &data.links);
    }
    link(
        w,
        "button navbar-cta",
        data.cta_link.as_deref(),
        data.cta_text.as_deref(),
    );

    w.close("nav");
    section.close(w, "header");
    Ok(())
}

pub fn navbar_simple(section: &Section<'_>, w: &mut HtmlWriter) -> Result<(), RenderError> {
    navbar(section, w, false)
}

pub fn navbar_centered(section: &Section<'_>, w: &mut HtmlWriter) -> Result<(), RenderError> {
    navbar(section, w, true)
}

pub fn footer_simple(section: &Section<'_>, w: &mut HtmlWriter) -> Result<(), RenderError> {
    let data = section.decode::<Footer>()?;
    section.open(w, "footer");
    section.text(w, "strong", "footer-brand", "brand", &data.brand);
    nav_links(w, &data.links);
    section.optional_text(w, "small", "footer-copyright", "copyright", data.copyright.as_deref());
    section.close(w, "footer");
    Ok(())
}

pub fn footer_columns(section: &Section<'_>, w: &mut HtmlWriter) -> Result<(), RenderError> {
    let data = section.decode::<Footer>()?;
    section.open(w, "footer");
    w.open("div", &[("class", "footer-columns")]);

    w.open("div", &[("class", "footer-column")]);
    section.text(w, "strong", "footer-brand", "brand", &data.brand);
    section.text(w, "p", "footer-description", "description", &data.description);
    w.close("div");

    w.open("div", &[("class", "footer-column")]);
    nav_links(w, &data.links);
    w.close("div");

    w.close("div");
    section.optional_text(w, "small", "footer-copyright", "copyright", data.copyright.as_deref());
    section.close(w, "footer");
    Ok(())
}
