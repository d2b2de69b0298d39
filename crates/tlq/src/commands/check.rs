//! Check command implementation.
//!
//! Compiles a query, builds its evaluator, and prints the canonical form.

use filter_query_rs::FilterQuery;

use super::{CommandContext, Result};
use crate::output::{format_check_json, format_check_table};

/// Executes the check command.
///
/// Syntax errors are returned as errors. Type errors found while building the
/// evaluator are reported in the output and then returned as well, so the
/// exit status reflects them.
pub fn execute(ctx: &CommandContext, text: &str) -> Result<()> {
    let query = FilterQuery::compile(text)?;
    let evaluator = query.get_evaluator();
    let type_error = evaluator.as_ref().err();

    if ctx.json_output {
        println!("{}", format_check_json(&query, type_error)?);
    } else if !ctx.quiet {
        print!("{}", format_check_table(&query, type_error, ctx.use_colors));
    }

    evaluator?;
    Ok(())
}
