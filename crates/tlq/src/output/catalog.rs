//! Source and field listing output formatting.

use owo_colors::OwoColorize;
use serde::Serialize;

use filter_query_rs::{relation_aliases, Relation, SourceKind, StatusField, UserField};

/// Operator spellings, loosest binding first.
const OPERATORS: &[(&str, &[&str])] = &[
    ("or", &["|"]),
    ("and", &["&"]),
    ("equality", &["==", "!="]),
    ("comparison", &["<", "<=", ">", ">="]),
    (
        "set / string",
        &["->", "contains", "<-", "in", "startswith", "endswith", "match", "regex"],
    ),
    ("additive", &["+", "-"]),
    ("multiplicative", &["*", "/"]),
    ("prefix", &["!", "-", "caseful"]),
];

/// JSON output structure for one source kind.
#[derive(Serialize)]
pub struct SourceKindOutput {
    pub keyword: &'static str,
    pub aliases: &'static [&'static str],
    pub requires_argument: bool,
}

/// JSON output structure for one field.
#[derive(Serialize)]
pub struct FieldOutput {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    #[serde(rename = "type")]
    pub value_type: &'static str,
}

/// JSON output structure for the fields command.
#[derive(Serialize)]
pub struct FieldsOutput {
    pub user_fields: Vec<FieldOutput>,
    pub status_fields: Vec<FieldOutput>,
    pub relations: Vec<&'static [&'static str]>,
    pub operators: Vec<OperatorOutput>,
}

/// JSON output structure for one precedence level.
#[derive(Serialize)]
pub struct OperatorOutput {
    pub level: &'static str,
    pub spellings: &'static [&'static str],
}

fn user_field_type(field: UserField) -> &'static str {
    match field {
        UserField::Protected
        | UserField::Verified
        | UserField::Translator
        | UserField::ContributorsEnabled
        | UserField::GeoEnabled => "boolean",
        UserField::Id
        | UserField::StatusesCount
        | UserField::FollowingCount
        | UserField::FollowersCount
        | UserField::FavoritesCount
        | UserField::ListedCount => "numeric",
        UserField::ScreenName
        | UserField::Name
        | UserField::Bio
        | UserField::Location
        | UserField::Language => "string",
    }
}

fn status_field_type(field: StatusField) -> &'static str {
    match field {
        StatusField::IsDirectMessage
        | StatusField::IsRetweet
        | StatusField::HasMedia
        | StatusField::IsMuted => "boolean",
        StatusField::InReplyTo | StatusField::Id => "numeric",
        StatusField::Mentions | StatusField::Favoriters | StatusField::Retweeters => "set",
        StatusField::Text | StatusField::SourceClient => "string",
    }
}

fn source_kinds() -> Vec<SourceKindOutput> {
    SourceKind::ALL
        .iter()
        .map(|kind| SourceKindOutput {
            keyword: kind.keyword(),
            aliases: &kind.keywords()[1..],
            requires_argument: kind.requires_argument(),
        })
        .collect()
}

fn fields() -> FieldsOutput {
    FieldsOutput {
        user_fields: UserField::ALL
            .iter()
            .map(|f| FieldOutput {
                name: f.name(),
                aliases: &f.aliases()[1..],
                value_type: user_field_type(*f),
            })
            .collect(),
        status_fields: StatusField::ALL
            .iter()
            .map(|f| FieldOutput {
                name: f.name(),
                aliases: &f.aliases()[1..],
                value_type: status_field_type(*f),
            })
            .collect(),
        relations: Relation::ALL.iter().map(|r| relation_aliases(*r)).collect(),
        operators: OPERATORS
            .iter()
            .map(|&(level, spellings)| OperatorOutput { level, spellings })
            .collect(),
    }
}

/// Formats the source keywords as JSON.
pub fn format_sources_json() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&source_kinds())
}

/// Formats the source keywords as a table.
pub fn format_sources_table(use_colors: bool) -> String {
    let mut output = String::new();

    let header = format!("{:<14} {:<10} {}", "Source", "Argument", "Aliases");
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for kind in source_kinds() {
        let argument = if kind.requires_argument { "required" } else { "" };
        output.push_str(&format!(
            "{:<14} {:<10} {}\n",
            kind.keyword,
            argument,
            kind.aliases.join(", ")
        ));
    }

    output
}

/// Formats the field, relation and operator names as JSON.
pub fn format_fields_json() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&fields())
}

/// Formats the field, relation and operator names for humans.
pub fn format_fields_table(use_colors: bool) -> String {
    let fields = fields();
    let mut output = String::new();

    let heading = |title: &str| {
        if use_colors {
            format!("{}\n", title.green().bold())
        } else {
            format!("{title}\n")
        }
    };

    output.push_str(&heading("User fields (user.<field>, retweeter.<field>)"));
    push_field_rows(&mut output, &fields.user_fields);

    output.push('\n');
    output.push_str(&heading("Status fields"));
    push_field_rows(&mut output, &fields.status_fields);

    output.push('\n');
    output.push_str(&heading("Relations (our.<relation>, @name.<relation>)"));
    for aliases in &fields.relations {
        output.push_str(&format!("  {}\n", aliases.join(", ")));
    }

    output.push('\n');
    output.push_str(&heading("Operators (loosest first)"));
    for op in &fields.operators {
        output.push_str(&format!("  {:<16} {}\n", op.level, op.spellings.join(" ")));
    }

    output
}

fn push_field_rows(output: &mut String, rows: &[FieldOutput]) {
    for row in rows {
        output.push_str(&format!(
            "  {:<22} {:<8} {}\n",
            row.name,
            row.value_type,
            row.aliases.join(", ")
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_table_lists_every_kind() {
        let table = format_sources_table(false);
        assert_eq!(table.lines().count(), SourceKind::ALL.len() + 1);
        let list_row = table.lines().find(|l| l.starts_with("list ")).unwrap();
        assert!(list_row.contains("required"));
    }

    #[test]
    fn test_sources_json() {
        let value: serde_json::Value = serde_json::from_str(&format_sources_json().unwrap()).unwrap();
        assert_eq!(value[0]["keyword"], "local");
        assert_eq!(value[0]["aliases"][0], "*");
        assert_eq!(value[0]["requires_argument"], false);
    }

    #[test]
    fn test_fields_json_types() {
        let value: serde_json::Value = serde_json::from_str(&format_fields_json().unwrap()).unwrap();
        let status_fields = value["status_fields"].as_array().unwrap();
        let mentions = status_fields.iter().find(|f| f["name"] == "mentions").unwrap();
        assert_eq!(mentions["type"], "set");
        assert_eq!(value["user_fields"][0]["name"], "protected");
        assert_eq!(value["relations"][0][0], "following");
    }

    #[test]
    fn test_fields_table_sections() {
        let table = format_fields_table(false);
        assert!(table.contains("User fields"));
        assert!(table.contains("  screen_name"));
        assert!(table.contains("caseful"));
    }
}
