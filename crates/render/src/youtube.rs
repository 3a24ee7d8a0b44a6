//! YouTube link normalisation.

use std::sync::LazyLock;

use regex::Regex;

static VIDEO_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:https?://)?(?:www\.|m\.)?(?:youtube\.com/(?:watch\?(?:[^#]*&)?v=|embed/|shorts/)|youtu\.be/)([A-Za-z0-9_-]{11})(?:[?&#/].*)?$",
    )
    .expect("valid regex")
});

/// Extract the 11-character video id from a watch, short, share or embed
/// link.
pub fn video_id(url: &str) -> Option<&str> {
    VIDEO_URL
        .captures(url.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Embed URL for any recognised YouTube link.
pub fn embed_url(url: &str) -> Option<String> {
    video_id(url).map(|id| format!("https://www.youtube.com/embed/{id}"))
}
