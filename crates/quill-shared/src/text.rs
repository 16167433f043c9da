//! Text helpers for page models.

use chrono::{DateTime, Utc};

const DATE_FORMAT: &str = "%d %b %Y %H:%M";

/// Excerpt length of the post cards on the home page.
pub const CARD_EXCERPT_LENGTH: usize = 200;

/// Excerpt length of the article search results.
pub const LIST_EXCERPT_LENGTH: usize = 100;

/// Cut `text` to at most `max` characters, marking the cut with "...".
pub fn excerpt(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}...", cut.trim_end())
}

/// Collapse every run of whitespace, line breaks included, into one space.
pub fn clean(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Display form of a timestamp, e.g. `05 Mar 2024 14:30`.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format(DATE_FORMAT).to_string()
}
