//! Embedded YouTube video.

use sitebuilder_core::schema::payloads::{Youtube, YoutubeData};

use crate::context::{RenderError, Section};
use crate::html::HtmlWriter;
use crate::youtube::embed_url;

fn player(w: &mut HtmlWriter, data: &YoutubeData) {
    match data.video_url.as_deref().and_then(embed_url) {
        Some(src) => {
            let title = if data.title.is_empty() {
                "YouTube video"
            } else {
                data.title.as_str()
            };
            w.open("div", &[("class", "video-frame")]);
            w.element(
                "iframe",
                &[
                    ("src", src.as_str()),
                    ("title", title),
                    ("frameborder", "0"),
                    ("allowfullscreen", "allowfullscreen"),
                ],
                "",
            );
            w.close("div");
        }
        None => w.element("p", &[("class", "video-missing")], "No video selected."),
    }
}

pub fn youtube_embed(section: &Section<'_>, w: &mut HtmlWriter) -> Result<(), RenderError> {
    let data = section.decode::<Youtube>()?;
    section.open(w, "section");
    section.text(w, "h2", "section-title", "title", &data.title);
    player(w, &data);
    section.close(w, "section");
    Ok(())
}

pub fn youtube_card(section: &Section<'_>, w: &mut HtmlWriter) -> Result<(), RenderError> {
    let data = section.decode::<Youtube>()?;
    section.open(w, "section");
    w.open("div", &[("class", "card video-card")]);
    player(w, &data);
    section.text(w, "h3", "card-title", "title", &data.title);
    w.close("div");
    section.close(w, "section");
    Ok(())
}
