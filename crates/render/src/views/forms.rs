//! Contact, appointment booking and order confirmation.

use sitebuilder_core::schema::payloads::{Appointment, Contact, ContactData, OrderConfirmation};

use super::link;
use crate::context::{RenderError, Section};
use crate::html::HtmlWriter;

fn contact_details(section: &Section<'_>, w: &mut HtmlWriter, data: &ContactData) {
    w.open("ul", &[("class", "contact-details")]);
    if let Some(email) = &data.email {
        let mailto = format!("mailto:{email}");
        w.open("li", &[]);
        w.element("a", &[("href", mailto.as_str())], email);
        w.close("li");
    }
    if let Some(phone) = &data.phone {
        let tel = format!("tel:{phone}");
        w.open("li", &[]);
        w.element("a", &[("href", tel.as_str())], phone);
        w.close("li");
    }
    w.close("ul");
    section.optional_text(w, "address", "contact-address", "address", data.address.as_deref());
}

fn contact_form(section: &Section<'_>, w: &mut HtmlWriter) {
    let action = format!("{}/contact", section.ctx.base_path);
    w.open(
        "form",
        &[("class", "contact-form"), ("method", "post"), ("action", action.as_str())],
    );
    w.void("input", &[("type", "text"), ("name", "name"), ("placeholder", "Name")]);
    w.void("input", &[("type", "email"), ("name", "email"), ("placeholder", "Email")]);
    w.element("textarea", &[("name", "message"), ("placeholder", "Message")], "");
    w.element("button", &[("type", "submit"), ("class", "button")], "Send");
    w.close("form");
}

pub fn contact_form_view(section: &Section<'_>, w: &mut HtmlWriter) -> Result<(), RenderError> {
    let data = section.decode::<Contact>()?;
    section.open(w, "section");
    section.text(w, "h2", "section-title", "title", &data.title);
    section.text(w, "p", "section-subtitle", "subtitle", &data.subtitle);
    contact_details(section, w, &data);
    if data.show_form {
        contact_form(section, w);
    }
    section.close(w, "section");
    Ok(())
}

pub fn contact_split(section: &Section<'_>, w: &mut HtmlWriter) -> Result<(), RenderError> {
    let data = section.decode::<Contact>()?;
    section.open(w, "section");
    w.open("div", &[("class", "contact-columns")]);

    w.open("div", &[("class", "contact-info")]);
    section.text(w, "h2", "section-title", "title", &data.title);
    section.text(w, "p", "section-subtitle", "subtitle", &data.subtitle);
    contact_details(section, w, &data);
    w.close("div");

    if data.show_form {
        contact_form(section, w);
    }
    w.close("div");
    section.close(w, "section");
    Ok(())
}

pub fn appointment_form(section: &Section<'_>, w: &mut HtmlWriter) -> Result<(), RenderError> {
    let data = section.decode::<Appointment>()?;
    let action = format!("{}/appointments", section.ctx.base_path);

    section.open(w, "section");
    section.text(w, "h2", "section-title", "title", &data.title);
    section.text(w, "p", "section-subtitle", "subtitle", &data.subtitle);

    w.open(
        "form",
        &[("class", "appointment-form"), ("method", "post"), ("action", action.as_str())],
    );
    if !data.services.is_empty() {
        w.open("select", &[("name", "service")]);
        for service in &data.services {
            w.element("option", &[("value", service.as_str())], service);
        }
        w.close("select");
    }
    let step = data.slot_minutes.map(|m| (m * 60).to_string());
    match &step {
        Some(step) => w.void(
            "input",
            &[("type", "datetime-local"), ("name", "starts_at"), ("step", step.as_str())],
        ),
        None => w.void("input", &[("type", "datetime-local"), ("name", "starts_at")]),
    }
    w.void("input", &[("type", "text"), ("name", "name"), ("placeholder", "Name")]);
    w.void("input", &[("type", "email"), ("name", "email"), ("placeholder", "Email")]);
    w.element("button", &[("type", "submit"), ("class", "button")], "Book");
    w.close("form");

    section.close(w, "section");
    Ok(())
}

pub fn order_confirmation(section: &Section<'_>, w: &mut HtmlWriter) -> Result<(), RenderError> {
    let data = section.decode::<OrderConfirmation>()?;
    section.open(w, "section");
    section.text(w, "h2", "section-title", "title", &data.title);
    section.text(w, "p", "order-message", "message", &data.message);
    link(
        w,
        "button",
        data.continue_link.as_deref(),
        Some("Continue shopping"),
    );
    section.close(w, "section");
    Ok(())
}
