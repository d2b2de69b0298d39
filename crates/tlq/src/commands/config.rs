//! Config command implementation.
//!
//! View and manage configuration settings and saved queries.
//! Config file is located at ~/.config/tlq/config.toml.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::PathBuf;

use directories::BaseDirs;
use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};

use filter_query_rs::FilterQuery;

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Configuration file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Saved queries by name, stored in canonical form.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub queries: BTreeMap<String, String>,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            output: OutputConfig::default(),
            queries: BTreeMap::new(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enable colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

/// Gets the config file path.
///
/// `TLQ_CONFIG` overrides the location; otherwise XDG-style paths are used
/// on all platforms.
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var("TLQ_CONFIG") {
        return Ok(PathBuf::from(path));
    }

    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("tlq").join("config.toml"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("tlq").join("config.toml"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Loads the configuration from disk.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {e}")))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {e}")))?;

    migrate_config(config)
}

/// Migrates config to current version if needed.
fn migrate_config(mut config: Config) -> Result<Config> {
    if config.version > CONFIG_VERSION {
        tracing::warn!(
            version = config.version,
            supported = CONFIG_VERSION,
            "config file is newer than this build"
        );
    }
    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Saves the configuration to disk.
fn save_config(config: &Config) -> Result<()> {
    let path = get_config_path()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| CommandError::Config(format!("Failed to create config directory: {e}")))?;
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| CommandError::Config(format!("Failed to serialize config: {e}")))?;

    fs::write(&path, content)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {e}")))?;

    tracing::debug!(path = %path.display(), "saved config");
    Ok(())
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let config = load_config()?;
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }
    if ctx.quiet {
        return Ok(());
    }

    let header = "Configuration";
    if ctx.use_colors {
        println!("{}\n", header.green().bold());
    } else {
        println!("{header}\n");
    }

    println!("File: {}", path.display());
    println!("Exists: {}\n", path.exists());

    if !path.exists() {
        println!("(No config file exists. Run 'tlq config set <key> <value>' to create one.)");
        return Ok(());
    }

    println!("[output]");
    if let Some(color) = config.output.color {
        println!("  color: {color}");
    }

    println!("\n[queries]");
    if config.queries.is_empty() {
        println!("  (none)");
    }
    for (name, query) in &config.queries {
        if ctx.use_colors {
            println!("  {}: {}", name.cyan(), query);
        } else {
            println!("  {name}: {query}");
        }
    }

    Ok(())
}

/// Options for the config set command.
pub struct ConfigSetOptions {
    /// Configuration key.
    pub key: String,
    /// Configuration value.
    pub value: String,
}

/// Executes the config set command.
///
/// Saved queries are compiled before they are stored, and stored in their
/// canonical text form.
pub fn execute_set(ctx: &CommandContext, opts: &ConfigSetOptions) -> Result<()> {
    let mut config = load_config()?;
    let path = get_config_path()?;

    let stored = apply_setting(&mut config, &opts.key, &opts.value)?;
    save_config(&config)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "key": opts.key,
            "value": stored,
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Set {} = {}", opts.key, stored);
    }

    Ok(())
}

/// Executes the config unset command.
pub fn execute_unset(ctx: &CommandContext, key: &str) -> Result<()> {
    let mut config = load_config()?;

    let removed = match key.split_once('.') {
        Some(("queries", name)) => config.queries.remove(name),
        Some(("output", "color")) => config.output.color.take().map(|c| c.to_string()),
        _ => {
            return Err(CommandError::Config(format!(
                "Unknown config key '{key}'. Valid keys: output.color, queries.<name>"
            )))
        }
    };

    if removed.is_none() {
        return Err(CommandError::Config(format!("'{key}' is not set")));
    }
    save_config(&config)?;

    if ctx.json_output {
        let output = serde_json::json!({ "status": "success", "key": key });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Removed {key}");
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

/// Applies `key = value` to the config, returning the value as stored.
fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<String> {
    match key.split_once('.') {
        Some(("output", "color")) => {
            let color = parse_bool(value)?;
            config.output.color = Some(color);
            Ok(color.to_string())
        }
        Some(("queries", name)) if !name.is_empty() => {
            let canonical = FilterQuery::compile(value)?.to_query_string();
            config.queries.insert(name.to_string(), canonical.clone());
            Ok(canonical)
        }
        _ => Err(CommandError::Config(format!(
            "Unknown config key '{key}'. Valid keys: output.color, queries.<name>"
        ))),
    }
}

/// Parses a boolean value from string.
fn parse_bool(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(CommandError::Config(format!(
            "Invalid boolean value '{s}'. Use true/false, yes/no, 1/0, or on/off"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    /// Points `TLQ_CONFIG` at a file in a fresh temp dir for the duration of `f`.
    fn with_temp_config<F: FnOnce(&PathBuf)>(f: F) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");
        let original = env::var("TLQ_CONFIG").ok();
        env::set_var("TLQ_CONFIG", &path);

        f(&path);

        match original {
            Some(val) => env::set_var("TLQ_CONFIG", val),
            None => env::remove_var("TLQ_CONFIG"),
        }
    }

    fn quiet_ctx() -> CommandContext {
        CommandContext {
            json_output: false,
            use_colors: false,
            quiet: true,
        }
    }

    #[test]
    fn test_parse_bool_values() {
        assert!(parse_bool("true").unwrap());
        assert!(parse_bool("YES").unwrap());
        assert!(parse_bool("on").unwrap());
        assert!(!parse_bool("false").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.output.color.is_none());
        assert!(config.queries.is_empty());
    }

    #[test]
    fn test_config_deserialization_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.queries.is_empty());
    }

    #[test]
    fn test_config_deserialization_with_queries() {
        let toml_str = r#"
version = 1

[output]
color = false

[queries]
friends = "from home where user <- our.following"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.output.color, Some(false));
        assert_eq!(
            config.queries.get("friends").map(String::as_str),
            Some("from home where user <- our.following")
        );
    }

    #[test]
    fn test_migrate_config_sets_current_version() {
        let config = Config {
            version: 99,
            ..Config::default()
        };
        let migrated = migrate_config(config).unwrap();
        assert_eq!(migrated.version, CONFIG_VERSION);
    }

    #[test]
    fn test_apply_setting_canonicalizes_query() {
        let mut config = Config::default();
        let stored =
            apply_setting(&mut config, "queries.verified", "from home where user.isverified & !rt")
                .unwrap();
        assert_eq!(stored, "from home where user.verified & !retweet");
        assert_eq!(config.queries["verified"], stored);
    }

    #[test]
    fn test_apply_setting_rejects_invalid_query() {
        let mut config = Config::default();
        let err = apply_setting(&mut config, "queries.bad", "from nowhere").unwrap_err();
        assert!(matches!(err, CommandError::Query(_)));
        assert!(config.queries.is_empty());
    }

    #[test]
    fn test_apply_setting_unknown_key() {
        let mut config = Config::default();
        assert!(apply_setting(&mut config, "token", "x").is_err());
        assert!(apply_setting(&mut config, "queries.", "from home").is_err());
    }

    #[test]
    #[serial]
    fn test_set_and_load_round_trip() {
        with_temp_config(|path| {
            let opts = ConfigSetOptions {
                key: "queries.mine".to_string(),
                value: "from mentions where our <- mentions".to_string(),
            };
            execute_set(&quiet_ctx(), &opts).unwrap();
            assert!(path.exists());

            let opts = ConfigSetOptions {
                key: "output.color".to_string(),
                value: "off".to_string(),
            };
            execute_set(&quiet_ctx(), &opts).unwrap();

            let config = load_config().unwrap();
            assert_eq!(config.output.color, Some(false));
            assert!(config.queries.contains_key("mine"));

            execute_unset(&quiet_ctx(), "queries.mine").unwrap();
            assert!(load_config().unwrap().queries.is_empty());
            assert!(execute_unset(&quiet_ctx(), "queries.mine").is_err());
        });
    }

    #[test]
    #[serial]
    fn test_load_missing_config_is_default() {
        with_temp_config(|path| {
            assert!(!path.exists());
            let config = load_config().unwrap();
            assert!(config.queries.is_empty());
        });
    }

    #[test]
    #[serial]
    fn test_load_invalid_config_is_error() {
        with_temp_config(|path| {
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "version = \"one\"").unwrap();
            assert!(matches!(load_config(), Err(CommandError::Config(_))));
        });
    }
}
