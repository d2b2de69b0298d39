//! Sources and fields commands: list the names a query can use.

use super::{CommandContext, Result};
use crate::output::{format_fields_json, format_fields_table, format_sources_json, format_sources_table};

/// Executes the sources command.
pub fn execute_sources(ctx: &CommandContext) -> Result<()> {
    if ctx.json_output {
        println!("{}", format_sources_json()?);
    } else if !ctx.quiet {
        print!("{}", format_sources_table(ctx.use_colors));
    }
    Ok(())
}

/// Executes the fields command.
pub fn execute_fields(ctx: &CommandContext) -> Result<()> {
    if ctx.json_output {
        println!("{}", format_fields_json()?);
    } else if !ctx.quiet {
        print!("{}", format_fields_table(ctx.use_colors));
    }
    Ok(())
}
