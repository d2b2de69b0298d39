//! Eval command implementation.
//!
//! Runs a query's predicate over the statuses of a snapshot file.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use chrono::Utc;

use filter_query_rs::{FilterContext, FilterQuery};
use timeline_model_rs::{Snapshot, Status};

use super::{CommandContext, Result};
use crate::output::{format_statuses_json, format_statuses_table};

/// Options for the eval command.
#[derive(Debug)]
pub struct EvalOptions {
    /// Snapshot JSON file, or `-` for stdin.
    pub input: PathBuf,
    /// Maximum number of statuses to print; `None` prints all.
    pub limit: Option<usize>,
}

/// Result of evaluating a query over a snapshot.
#[derive(Debug)]
pub struct EvalResult<'a> {
    /// Number of statuses evaluated.
    pub total: usize,
    /// Every matching status, in snapshot order.
    pub matched: Vec<&'a Status>,
}

/// Executes the eval command.
pub fn execute(ctx: &CommandContext, text: &str, opts: &EvalOptions) -> Result<()> {
    let query = FilterQuery::compile(text)?;
    let snapshot = read_snapshot(&opts.input)?;

    let result = evaluate(&query, &snapshot)?;
    let shown = match opts.limit {
        Some(limit) => &result.matched[..result.matched.len().min(limit)],
        None => &result.matched[..],
    };

    if ctx.json_output {
        println!(
            "{}",
            format_statuses_json(&query, shown, result.total, result.matched.len())?
        );
    } else if !ctx.quiet {
        print!("{}", format_statuses_table(shown, Utc::now(), ctx.use_colors));
        if shown.len() < result.matched.len() {
            println!(
                "\nShowing {} of {} matches (use --all to show everything)",
                shown.len(),
                result.matched.len()
            );
        }
    }

    Ok(())
}

/// Evaluates `query` against every status in `snapshot`.
pub fn evaluate<'a>(query: &FilterQuery, snapshot: &'a Snapshot) -> Result<EvalResult<'a>> {
    let predicate = query.get_evaluator()?;
    let context = FilterContext::new(&snapshot.accounts, &snapshot.lists);

    tracing::debug!(
        sources = query.sources().len(),
        statuses = snapshot.statuses.len(),
        accounts = snapshot.accounts.len(),
        "evaluating query"
    );

    let matched = predicate.filter_statuses(&snapshot.statuses, &context);
    tracing::debug!(matched = matched.len(), "evaluation finished");

    Ok(EvalResult {
        total: snapshot.statuses.len(),
        matched,
    })
}

/// Reads a snapshot from a file, or from stdin when the path is `-`.
pub fn read_snapshot(path: &Path) -> Result<Snapshot> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(path)?
    };
    Ok(serde_json::from_str(&content)?)
}
