//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the tlq CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// tlq - Compile and run timeline filter queries
#[derive(Parser, Debug)]
#[command(name = "tlq")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Force JSON output
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Where the query text comes from: inline or a saved query from the config.
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Query text (e.g., "from home where user.verified & !rt")
    #[arg(required_unless_present = "saved", conflicts_with = "saved")]
    pub query: Option<String>,

    /// Use a query saved under `queries.<name>` in the config
    #[arg(short, long)]
    pub saved: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile a query and show its canonical form
    #[command(alias = "c")]
    Check {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Evaluate a query against a timeline snapshot
    #[command(alias = "e")]
    Eval {
        #[command(flatten)]
        query: QueryArgs,

        /// Snapshot JSON file with accounts, lists and statuses
        #[arg(short, long)]
        input: PathBuf,

        /// Limit results (default: 50)
        #[arg(long, default_value = "50")]
        limit: usize,

        /// Show all matches (no limit)
        #[arg(long)]
        all: bool,
    },

    /// List source keywords
    Sources,

    /// List field, relation and operator names
    Fields,

    /// View and edit configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (`output.color` or `queries.<name>`)
        key: String,

        /// Configuration value
        value: String,
    },

    /// Remove a configuration value
    Unset {
        /// Configuration key (`output.color` or `queries.<name>`)
        key: String,
    },

    /// Print config file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["tlq", "--verbose", "sources"]);
        assert!(cli.verbose);
        assert!(!cli.quiet);
        assert!(!cli.json);

        let cli = Cli::parse_from(["tlq", "--quiet", "--json", "fields"]);
        assert!(!cli.verbose);
        assert!(cli.quiet);
        assert!(cli.json);
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["tlq", "-v", "-q", "sources"]).is_err());
    }

    #[test]
    fn test_check_inline_query() {
        let cli = Cli::parse_from(["tlq", "check", "from home where rt"]);
        if let Some(Commands::Check { query }) = cli.command {
            assert_eq!(query.query.as_deref(), Some("from home where rt"));
            assert!(query.saved.is_none());
        } else {
            panic!("Expected Check command");
        }
    }

    #[test]
    fn test_check_requires_query_or_saved() {
        assert!(Cli::try_parse_from(["tlq", "check"]).is_err());
        assert!(Cli::try_parse_from(["tlq", "check", "--saved", "friends"]).is_ok());
        assert!(Cli::try_parse_from(["tlq", "check", "rt", "--saved", "friends"]).is_err());
    }

    #[test]
    fn test_eval_arguments() {
        let cli = Cli::parse_from([
            "tlq",
            "eval",
            "-s",
            "friends",
            "--input",
            "timeline.json",
            "--limit",
            "5",
        ]);
        if let Some(Commands::Eval {
            query,
            input,
            limit,
            all,
        }) = cli.command
        {
            assert_eq!(query.saved.as_deref(), Some("friends"));
            assert_eq!(input, PathBuf::from("timeline.json"));
            assert_eq!(limit, 5);
            assert!(!all);
        } else {
            panic!("Expected Eval command");
        }
    }

    #[test]
    fn test_eval_requires_input() {
        assert!(Cli::try_parse_from(["tlq", "eval", "rt"]).is_err());
    }

    #[test]
    fn test_config_subcommands() {
        let cli = Cli::parse_from(["tlq", "config", "set", "queries.friends", "from home"]);
        if let Some(Commands::Config {
            command: Some(ConfigCommands::Set { key, value }),
        }) = cli.command
        {
            assert_eq!(key, "queries.friends");
            assert_eq!(value, "from home");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn test_completions() {
        let cli = Cli::parse_from(["tlq", "completions", "zsh"]);
        if let Some(Commands::Completions { shell }) = cli.command {
            assert!(matches!(shell, Shell::Zsh));
        } else {
            panic!("Expected Completions command");
        }
    }
}
