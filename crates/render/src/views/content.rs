//! FAQ and testimonials.

use sitebuilder_core::schema::payloads::{Faq, FaqItem, Testimonials};

use super::image;
use crate::context::{RenderError, Section};
use crate::html::HtmlWriter;

pub fn faq_accordion(section: &Section<'_>, w: &mut HtmlWriter) -> Result<(), RenderError> {
    let data = section.decode::<Faq>()?;
    section.open(w, "section");
    section.text(w, "h2", "section-title", "title", &data.title);
    for item in &data.items {
        w.open("details", &[("class", "faq-item")]);
        w.element("summary", &[("class", "faq-question")], &item.question);
        w.element("p", &[("class", "faq-answer")], &item.answer);
        w.close("details");
    }
    section.close(w, "section");
    Ok(())
}

fn faq_column(w: &mut HtmlWriter, items: &[FaqItem]) {
    w.open("dl", &[("class", "faq-column")]);
    for item in items {
        w.element("dt", &[("class", "faq-question")], &item.question);
        w.element("dd", &[("class", "faq-answer")], &item.answer);
    }
    w.close("dl");
}

pub fn faq_two_column(section: &Section<'_>, w: &mut HtmlWriter) -> Result<(), RenderError> {
    let data = section.decode::<Faq>()?;
    let (left, right) = data.items.split_at(data.items.len().div_ceil(2));

    section.open(w, "section");
    section.text(w, "h2", "section-title", "title", &data.title);
    w.open("div", &[("class", "faq-columns")]);
    faq_column(w, left);
    faq_column(w, right);
    w.close("div");
    section.close(w, "section");
    Ok(())
}

pub fn testimonials_cards(section: &Section<'_>, w: &mut HtmlWriter) -> Result<(), RenderError> {
    let data = section.decode::<Testimonials>()?;
    section.open(w, "section");
    section.text(w, "h2", "section-title", "title", &data.title);
    w.open("div", &[("class", "testimonial-grid")]);
    for item in &data.items {
        w.open("figure", &[("class", "testimonial card")]);
        image(w, "testimonial-avatar", item.avatar.as_deref(), &item.name);
        w.element("blockquote", &[], &item.quote);
        w.open("figcaption", &[]);
        w.element("strong", &[], &item.name);
        if let Some(role) = &item.role {
            w.element("span", &[("class", "testimonial-role")], role);
        }
        w.close("figcaption");
        w.close("figure");
    }
    w.close("div");
    section.close(w, "section");
    Ok(())
}

/// Shows the first testimonial as a large pull quote.
pub fn testimonials_quote(section: &Section<'_>, w: &mut HtmlWriter) -> Result<(), RenderError> {
    let data = section.decode::<Testimonials>()?;
    section.open(w, "section");
    section.text(w, "h2", "section-title", "title", &data.title);
    if let Some(item) = data.items.first() {
        w.open("figure", &[("class", "testimonial pull-quote")]);
        w.element("blockquote", &[], &item.quote);
        w.element("figcaption", &[], &item.name);
        w.close("figure");
    }
    section.close(w, "section");
    Ok(())
}
