//! Command dispatch module for routing CLI commands to their handlers.

use std::path::Path;

use crate::cli::{Cli, Commands, ConfigCommands, QueryArgs, Shell};
use crate::commands::{self, CommandContext, CommandError, Result};

/// Trait for commands that can be executed from parsed CLI arguments.
pub trait RunCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// A parsed CLI command, borrowing its arguments from [`Cli`].
pub enum Dispatch<'a> {
    Check(&'a QueryArgs),
    Eval {
        query: &'a QueryArgs,
        input: &'a Path,
        limit: Option<usize>,
    },
    Sources,
    Fields,
    Config(&'a Option<ConfigCommands>),
    Completions(&'a Shell),
    Help,
}

impl<'a> Dispatch<'a> {
    pub fn from_cli(cli: &'a Cli) -> Self {
        match &cli.command {
            Some(Commands::Check { query }) => Self::Check(query),
            Some(Commands::Eval {
                query,
                input,
                limit,
                all,
            }) => Self::Eval {
                query,
                input,
                limit: if *all { None } else { Some(*limit) },
            },
            Some(Commands::Sources) => Self::Sources,
            Some(Commands::Fields) => Self::Fields,
            Some(Commands::Config { command }) => Self::Config(command),
            Some(Commands::Completions { shell }) => Self::Completions(shell),
            None => Self::Help,
        }
    }
}

impl RunCommand for Dispatch<'_> {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Check(query) => {
                let text = commands::resolve_query_text(query)?;
                commands::check::execute(ctx, &text)
            }
            Self::Eval {
                query,
                input,
                limit,
            } => {
                let text = commands::resolve_query_text(query)?;
                let opts = commands::eval::EvalOptions {
                    input: input.to_path_buf(),
                    limit: *limit,
                };
                commands::eval::execute(ctx, &text, &opts)
            }
            Self::Sources => commands::catalog::execute_sources(ctx),
            Self::Fields => commands::catalog::execute_fields(ctx),
            Self::Config(command) => dispatch_config(ctx, command),
            Self::Completions(shell) => {
                commands::completions::execute(shell).map_err(CommandError::Io)
            }
            Self::Help => {
                if !ctx.quiet {
                    println!("tlq - timeline filter queries");
                    println!("Use --help for usage information");
                }
                Ok(())
            }
        }
    }
}

/// Dispatch config subcommands.
fn dispatch_config(ctx: &CommandContext, command: &Option<ConfigCommands>) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::execute_show(ctx),
        Some(ConfigCommands::Set { key, value }) => {
            let opts = commands::config::ConfigSetOptions {
                key: key.clone(),
                value: value.clone(),
            };
            commands::config::execute_set(ctx, &opts)
        }
        Some(ConfigCommands::Unset { key }) => commands::config::execute_unset(ctx, key),
        Some(ConfigCommands::Path) => commands::config::execute_path(ctx),
    }
}
