//! Hero banner and about section.

use sitebuilder_core::schema::payloads::{About, Hero, HeroData};

use super::{image, link};
use crate::context::{RenderError, Section};
use crate::html::HtmlWriter;

fn hero_copy(section: &Section<'_>, w: &mut HtmlWriter, data: &HeroData) {
    w.open("div", &[("class", "hero-copy")]);
    section.text(w, "h1", "hero-title", "title", &data.title);
    section.text(w, "p", "hero-subtitle", "subtitle", &data.subtitle);
    link(
        w,
        "button hero-button",
        data.button_link.as_deref(),
        data.button_text.as_deref(),
    );
    w.close("div");
}

pub fn hero_centered(section: &Section<'_>, w: &mut HtmlWriter) -> Result<(), RenderError> {
    let data = section.decode::<Hero>()?;
    section.open(w, "section");
    hero_copy(section, w, &data);
    image(w, "hero-image", data.image.as_deref(), &data.title);
    section.close(w, "section");
    Ok(())
}

pub fn hero_split(section: &Section<'_>, w: &mut HtmlWriter) -> Result<(), RenderError> {
    let data = section.decode::<Hero>()?;
    section.open(w, "section");
    w.open("div", &[("class", "hero-columns")]);
    hero_copy(section, w, &data);
    w.open("div", &[("class", "hero-media")]);
    image(w, "hero-image", data.image.as_deref(), &data.title);
    w.close("div");
    w.close("div");
    section.close(w, "section");
    Ok(())
}

pub fn hero_overlay(section: &Section<'_>, w: &mut HtmlWriter) -> Result<(), RenderError> {
    let data = section.decode::<Hero>()?;
    section.open(w, "section");
    image(w, "hero-background", data.image.as_deref(), "");
    w.open("div", &[("class", "hero-overlay")]);
    hero_copy(section, w, &data);
    w.close("div");
    section.close(w, "section");
    Ok(())
}

pub fn about_simple(section: &Section<'_>, w: &mut HtmlWriter) -> Result<(), RenderError> {
    let data = section.decode::<About>()?;
    section.open(w, "section");
    section.text(w, "h2", "section-title", "title", &data.title);
    section.text(w, "p", "about-body", "body", &data.body);
    section.close(w, "section");
    Ok(())
}

/// `image-left` and `image-right` differ only in element order.
pub fn about_with_image(section: &Section<'_>, w: &mut HtmlWriter) -> Result<(), RenderError> {
    let data = section.decode::<About>()?;
    let image_first = section.style == "image-left";

    section.open(w, "section");
    w.open("div", &[("class", "about-columns")]);
    if image_first {
        image(w, "about-image", data.image.as_deref(), &data.title);
    }
    w.open("div", &[("class", "about-copy")]);
    section.text(w, "h2", "section-title", "title", &data.title);
    section.text(w, "p", "about-body", "body", &data.body);
    w.close("div");
    if !image_first {
        image(w, "about-image", data.image.as_deref(), &data.title);
    }
    w.close("div");
    section.close(w, "section");
    Ok(())
}
