//! Sections that list a site collection: blog, products, categories,
//! services and pricing. Item clicks navigate to the item's page.

use sitebuilder_core::collections::{CollectionItem, CollectionKind};
use sitebuilder_core::schema::payloads::{Blog, Categories, Pricing, Products, Services};

use super::image;
use crate::context::{RenderError, Section};
use crate::html::HtmlWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Grid,
    List,
    Pills,
}

struct Heading<'a> {
    title: &'a str,
    subtitle: &'a str,
    limit: Option<u32>,
}

fn price_label(price: f64) -> String {
    format!("{price:.2}")
}

fn collection_items(
    section: &Section<'_>,
    w: &mut HtmlWriter,
    kind: CollectionKind,
    limit: Option<u32>,
    layout: Layout,
) {
    let Some(items) = section.collection(kind) else {
        w.element("p", &[("class", "collection-loading")], "Loading…");
        return;
    };
    if items.is_empty() {
        w.element("p", &[("class", "collection-empty")], "Nothing here yet.");
        return;
    }

    let shown = limit.map_or(items.len(), |n| items.len().min(n as usize));
    let list_class = match layout {
        Layout::Grid => "collection-grid",
        Layout::List => "collection-list",
        Layout::Pills => "collection-pills",
    };
    w.open("ul", &[("class", list_class)]);
    for item in &items[..shown] {
        collection_item(section, w, kind, item, layout);
    }
    w.close("ul");
}

fn collection_item(
    section: &Section<'_>,
    w: &mut HtmlWriter,
    kind: CollectionKind,
    item: &CollectionItem,
    layout: Layout,
) {
    let href = section.ctx.item_href(kind, item.link_slug());
    w.open("li", &[("class", "collection-item"), ("data-item-id", item.id.as_str())]);
    match layout {
        Layout::Pills => {
            w.element("a", &[("class", "pill"), ("href", href.as_str())], &item.title);
        }
        Layout::Grid => {
            w.open("a", &[("class", "card"), ("href", href.as_str())]);
            image(w, "card-image", item.image.as_deref(), &item.title);
            w.element("h3", &[("class", "card-title")], &item.title);
            if let Some(description) = &item.description {
                w.element("p", &[("class", "card-description")], description);
            }
            if let Some(price) = item.price {
                w.element("span", &[("class", "price")], &price_label(price));
            }
            w.close("a");
        }
        Layout::List => {
            w.element("a", &[("class", "item-title"), ("href", href.as_str())], &item.title);
            if let Some(description) = &item.description {
                w.element("p", &[("class", "item-description")], description);
            }
            if let Some(price) = item.price {
                w.element("span", &[("class", "price")], &price_label(price));
            }
        }
    }
    w.close("li");
}

fn collection_section(
    section: &Section<'_>,
    w: &mut HtmlWriter,
    kind: CollectionKind,
    heading: Heading<'_>,
    layout: Layout,
) {
    section.open(w, "section");
    section.text(w, "h2", "section-title", "title", heading.title);
    section.text(w, "p", "section-subtitle", "subtitle", heading.subtitle);
    collection_items(section, w, kind, heading.limit, layout);
    section.close(w, "section");
}

fn layout_for(style: &str) -> Layout {
    match style {
        "list" => Layout::List,
        "pills" => Layout::Pills,
        _ => Layout::Grid,
    }
}

pub fn blog(section: &Section<'_>, w: &mut HtmlWriter) -> Result<(), RenderError> {
    let data = section.decode::<Blog>()?;
    let heading = Heading {
        title: &data.title,
        subtitle: &data.subtitle,
        limit: data.limit,
    };
    collection_section(section, w, CollectionKind::Blogs, heading, layout_for(section.style));
    Ok(())
}

pub fn products(section: &Section<'_>, w: &mut HtmlWriter) -> Result<(), RenderError> {
    let data = section.decode::<Products>()?;
    let heading = Heading {
        title: &data.title,
        subtitle: &data.subtitle,
        limit: data.limit,
    };
    collection_section(section, w, CollectionKind::Products, heading, layout_for(section.style));
    Ok(())
}

pub fn categories(section: &Section<'_>, w: &mut HtmlWriter) -> Result<(), RenderError> {
    let data = section.decode::<Categories>()?;
    let heading = Heading {
        title: &data.title,
        subtitle: &data.subtitle,
        limit: data.limit,
    };
    collection_section(
        section,
        w,
        CollectionKind::Categories,
        heading,
        layout_for(section.style),
    );
    Ok(())
}

/// Services render as cards or as a plain list.
pub fn services(section: &Section<'_>, w: &mut HtmlWriter) -> Result<(), RenderError> {
    let data = section.decode::<Services>()?;
    let heading = Heading {
        title: &data.title,
        subtitle: &data.subtitle,
        limit: data.limit,
    };
    collection_section(section, w, CollectionKind::Services, heading, layout_for(section.style));
    Ok(())
}

pub fn pricing_cards(section: &Section<'_>, w: &mut HtmlWriter) -> Result<(), RenderError> {
    section.decode::<Pricing>()?;
    section.open(w, "section");
    w.element("h2", &[("class", "section-title")], "Pricing");
    collection_items(section, w, CollectionKind::PricingPlans, None, Layout::Grid);
    section.close(w, "section");
    Ok(())
}

pub fn pricing_table(section: &Section<'_>, w: &mut HtmlWriter) -> Result<(), RenderError> {
    section.decode::<Pricing>()?;
    section.open(w, "section");
    w.element("h2", &[("class", "section-title")], "Pricing");

    match section.collection(CollectionKind::PricingPlans) {
        None => w.element("p", &[("class", "collection-loading")], "Loading…"),
        Some([]) => w.element("p", &[("class", "collection-empty")], "Nothing here yet."),
        Some(plans) => {
            w.open("table", &[("class", "pricing-table")]);
            w.open("tbody", &[]);
            for plan in plans {
                let href = section.ctx.item_href(CollectionKind::PricingPlans, &plan.slug);
                w.open("tr", &[("data-item-id", plan.id.as_str())]);
                w.open("th", &[]);
                w.element("a", &[("href", href.as_str())], &plan.title);
                w.close("th");
                w.element(
                    "td",
                    &[("class", "plan-description")],
                    plan.description.as_deref().unwrap_or_default(),
                );
                let price = plan.price.map(price_label).unwrap_or_default();
                w.element("td", &[("class", "price")], &price);
                w.close("tr");
            }
            w.close("tbody");
            w.close("table");
        }
    }

    section.close(w, "section");
    Ok(())
}
