//! Common helper functions for output formatting.

use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;

use timeline_model_rs::User;

/// Truncates a string to a maximum number of characters.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Collapses newlines so a status fits on one table row.
pub fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Formats a user as `@screen_name`.
pub fn format_handle(user: &User, use_colors: bool) -> String {
    let handle = format!("@{}", user.screen_name);
    if use_colors {
        handle.cyan().to_string()
    } else {
        handle
    }
}

/// Formats a creation time relative to `now` ("just now", "5m", "3h", "2d"),
/// falling back to a date once it is more than a week old.
pub fn format_age(created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(created_at) = created_at else {
        return String::new();
    };

    let elapsed = now - created_at;
    if elapsed.num_seconds() < 60 {
        "just now".to_string()
    } else if elapsed.num_minutes() < 60 {
        format!("{}m", elapsed.num_minutes())
    } else if elapsed.num_hours() < 24 {
        format!("{}h", elapsed.num_hours())
    } else if elapsed.num_days() <= 7 {
        format!("{}d", elapsed.num_days())
    } else {
        created_at.format("%b %d").to_string()
    }
}
