//! `dash diff` — structural diff of two JSON documents.

use std::path::{Path, PathBuf};

use clap::Args;
use dash_recon::diff::{diff, DiffEntry};
use serde_json::Value;

use crate::exit_codes::{EXIT_DIFF_FOUND, EXIT_RECON_INPUT, EXIT_RECON_OUTPUT};
use crate::{CliError, Context};

#[derive(Args)]
pub struct DiffArgs {
    /// Left document (A)
    pub left: PathBuf,

    /// Right document (B)
    pub right: PathBuf,

    /// Output JSON to stdout
    #[arg(long)]
    pub json: bool,

    /// Ask the report store to compute the diff
    #[arg(long)]
    pub remote: bool,
}

pub fn cmd_diff(ctx: &Context, args: DiffArgs) -> Result<(), CliError> {
    let a = read_json(&args.left)?;
    let b = read_json(&args.right)?;

    let entries: Vec<DiffEntry> = if args.remote {
        let (client, _) = ctx.client()?;
        client.diff(&a, &b).map_err(CliError::store)?
    } else {
        diff(&a, &b)
    };

    if args.json {
        let json_str = serde_json::to_string_pretty(&entries)
            .map_err(|e| CliError::new(EXIT_RECON_OUTPUT, format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    } else {
        let mut stdout = std::io::stdout().lock();
        crate::render::write_diff(&mut stdout, &entries)
            .map_err(|e| CliError::new(EXIT_RECON_OUTPUT, e.to_string()))?;
    }

    eprintln!("{} differences", entries.len());
    if entries.is_empty() {
        Ok(())
    } else {
        // Silent failure: like diff(1), the exit code carries the result.
        Err(CliError::new(EXIT_DIFF_FOUND, ""))
    }
}

fn read_json(path: &Path) -> Result<Value, CliError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        CliError::new(EXIT_RECON_INPUT, format!("cannot read {}: {e}", path.display()))
    })?;
    serde_json::from_str(&text)
        .map_err(|e| CliError::new(EXIT_RECON_INPUT, format!("{}: {e}", path.display())))
}
