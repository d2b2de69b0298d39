//! Matched status output formatting.

use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use serde::Serialize;

use filter_query_rs::FilterQuery;
use timeline_model_rs::Status;

use super::helpers::{format_age, single_line, truncate_str};

/// Widest text column before truncation.
const TEXT_WIDTH: usize = 60;

/// JSON output structure for the eval command.
#[derive(Serialize)]
pub struct EvalOutput<'a> {
    pub query: String,
    pub total: usize,
    pub matched: usize,
    pub has_more: bool,
    pub statuses: Vec<StatusOutput<'a>>,
}

/// JSON output structure for a single matched status.
#[derive(Serialize)]
pub struct StatusOutput<'a> {
    pub id: i64,
    pub screen_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retweeted_by: Option<&'a str>,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub is_direct_message: bool,
}

impl<'a> From<&'a Status> for StatusOutput<'a> {
    fn from(status: &'a Status) -> Self {
        let original = status.original();
        Self {
            id: status.id,
            screen_name: &original.user.screen_name,
            retweeted_by: status.retweeter().map(|u| u.screen_name.as_str()),
            text: &original.text,
            created_at: status.created_at,
            is_direct_message: status.is_direct_message,
        }
    }
}

/// Formats matched statuses as JSON.
///
/// `total` is the number of statuses evaluated and `matched` the number that
/// passed the filter before any limit was applied.
pub fn format_statuses_json(
    query: &FilterQuery,
    statuses: &[&Status],
    total: usize,
    matched: usize,
) -> Result<String, serde_json::Error> {
    let output = EvalOutput {
        query: query.to_query_string(),
        total,
        matched,
        has_more: matched > statuses.len(),
        statuses: statuses.iter().map(|s| StatusOutput::from(*s)).collect(),
    };
    serde_json::to_string_pretty(&output)
}

/// Formats matched statuses as a table.
pub fn format_statuses_table(statuses: &[&Status], now: DateTime<Utc>, use_colors: bool) -> String {
    if statuses.is_empty() {
        return "No matching statuses.\n".to_string();
    }

    let mut output = String::new();

    let header = format!("{:<20} {:<6} {:<18} {}", "ID", "Age", "User", "Text");
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for status in statuses {
        let original = status.original();
        let age = format_age(status.created_at, now);
        let handle = format!("{:<18}", format!("@{}", truncate_str(&original.user.screen_name, 16)));
        let mut text = truncate_str(&single_line(&original.text), TEXT_WIDTH);
        if let Some(retweeter) = status.retweeter() {
            text = format!("{text} (RT by @{})", retweeter.screen_name);
        }

        let (handle, marker) = if use_colors {
            (
                handle.cyan().to_string(),
                if status.is_direct_message {
                    format!("{} ", "DM".magenta())
                } else {
                    String::new()
                },
            )
        } else {
            (
                handle,
                if status.is_direct_message {
                    "DM ".to_string()
                } else {
                    String::new()
                },
            )
        };

        output.push_str(&format!(
            "{:<20} {:<6} {} {}{}\n",
            status.id, age, handle, marker, text
        ));
    }

    output
}
