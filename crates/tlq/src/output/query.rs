//! Compiled query output formatting.

use owo_colors::OwoColorize;
use serde::Serialize;

use filter_query_rs::{FilterQuery, QueryError};

/// JSON output structure for the check command.
#[derive(Serialize)]
pub struct CheckOutput {
    pub query: String,
    pub sources: Vec<SourceOutput>,
    pub predicate: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_error: Option<String>,
}

/// JSON output structure for one source descriptor.
#[derive(Serialize)]
pub struct SourceOutput {
    pub kind: &'static str,
    pub arguments: Vec<String>,
}

/// Formats a compiled query as JSON. `type_error` is the evaluator build
/// failure, if any.
pub fn format_check_json(
    query: &FilterQuery,
    type_error: Option<&QueryError>,
) -> Result<String, serde_json::Error> {
    let output = CheckOutput {
        query: query.to_query_string(),
        sources: query
            .sources()
            .iter()
            .map(|s| SourceOutput {
                kind: s.kind.keyword(),
                arguments: s.arguments.clone(),
            })
            .collect(),
        predicate: query.root().to_string(),
        valid: type_error.is_none(),
        type_error: type_error.map(QueryError::message),
    };
    serde_json::to_string_pretty(&output)
}

/// Formats a compiled query for humans.
pub fn format_check_table(
    query: &FilterQuery,
    type_error: Option<&QueryError>,
    use_colors: bool,
) -> String {
    let mut output = String::new();

    let status = match type_error {
        None if use_colors => "OK".green().bold().to_string(),
        None => "OK".to_string(),
        Some(_) if use_colors => "TYPE ERROR".red().bold().to_string(),
        Some(_) => "TYPE ERROR".to_string(),
    };
    output.push_str(&format!("{status}\n\n"));

    output.push_str(&format!("Query:     {}\n", query.to_query_string()));
    let sources: Vec<String> = query.sources().iter().map(ToString::to_string).collect();
    output.push_str(&format!("Sources:   {}\n", sources.join(", ")));
    output.push_str(&format!("Predicate: {}\n", query.root()));

    if let Some(err) = type_error {
        output.push_str(&format!("\n{}\n", err.message()));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use filter_query_rs::compile;

    #[test]
    fn test_check_table_ok() {
        let query = compile("from home, list: \"a/b\" where rt").unwrap();
        let table = format_check_table(&query, None, false);
        assert!(table.starts_with("OK\n"));
        assert!(table.contains("Sources:   home, list: \"a/b\""));
        assert!(table.contains("Predicate: retweet"));
    }

    #[test]
    fn test_check_json_type_error() {
        let query = compile("where text + 1").unwrap();
        let err = query.get_evaluator().unwrap_err();
        let json = format_check_json(&query, Some(&err)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["valid"], false);
        assert_eq!(value["sources"][0]["kind"], "local");
        assert_eq!(value["predicate"], "text + 1");
        assert!(value["type_error"].as_str().unwrap().contains("'+'"));
    }
}
