//! Command implementations for the tlq CLI.

pub mod catalog;
pub mod check;
pub mod completions;
pub mod config;
pub mod eval;

use filter_query_rs::QueryError;

use crate::cli::{Cli, QueryArgs};

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Query compilation or evaluation error.
    #[error("query error: {0}")]
    Query(#[from] QueryError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments.
    ///
    /// Colors are on unless `--no-color` is given or the config sets
    /// `output.color = false`.
    pub fn from_cli(cli: &Cli) -> Self {
        let config_color = config::load_config()
            .ok()
            .and_then(|c| c.output.color)
            .unwrap_or(true);

        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && config_color,
            quiet: cli.quiet,
        }
    }
}

/// Returns the query text given inline, or looks up the saved query by name.
pub fn resolve_query_text(args: &QueryArgs) -> Result<String> {
    if let Some(text) = &args.query {
        return Ok(text.clone());
    }

    let Some(name) = &args.saved else {
        return Err(CommandError::Config(
            "either a query or --saved <name> is required".to_string(),
        ));
    };

    let config = config::load_config()?;
    config.queries.get(name).cloned().ok_or_else(|| {
        let mut message = format!("no saved query named '{name}'");
        if let Some(similar) = find_similar_name(name, config.queries.keys()) {
            message.push_str(&format!(" (did you mean '{similar}'?)"));
        }
        CommandError::Config(message)
    })
}

/// Finds the closest saved query name by Jaro-Winkler similarity.
fn find_similar_name<'a>(
    name: &str,
    candidates: impl Iterator<Item = &'a String>,
) -> Option<&'a str> {
    candidates
        .map(|c| (c.as_str(), strsim::jaro_winkler(name, c)))
        .filter(|(_, score)| *score >= 0.8)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(c, _)| c)
}
