//! `dash report` — stored reports: list, show, delete, export, upload.

use std::path::PathBuf;

use clap::Subcommand;

use crate::exit_codes::{EXIT_RECON_INPUT, EXIT_RECON_OUTPUT};
use crate::recon::{emit, parse_today, OutputArgs};
use crate::session::ReportSession;
use crate::{CliError, Context};

#[derive(Subcommand)]
pub enum ReportCommands {
    /// List stored reports
    #[command(after_help = "\
Examples:
  dash report list
  dash report list --json")]
    List {
        /// Output JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Fetch a stored report and reconcile it
    #[command(after_help = "\
Examples:
  dash report show 65f1c0ffee
  dash report show 65f1c0ffee --json --today 2024-02-01")]
    Show {
        /// Stored report id
        id: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Delete a stored report
    Delete {
        /// Stored report id
        id: String,
    },

    /// Download the rendered PDF for a stored report
    #[command(after_help = "\
Examples:
  dash report export 65f1c0ffee --output smith.pdf")]
    Export {
        /// Stored report id
        id: String,

        /// Destination PDF file
        #[arg(long, short = 'o')]
        output: PathBuf,
    },

    /// Upload a DASH PDF for extraction and reconcile the result
    #[command(after_help = "\
Examples:
  dash report upload smith_dash.pdf
  dash report upload smith_dash.pdf --json --output view.json")]
    Upload {
        /// PDF file
        file: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
}

pub fn cmd_report(ctx: &Context, cmd: ReportCommands) -> Result<(), CliError> {
    match cmd {
        ReportCommands::List { json } => cmd_report_list(ctx, json),
        ReportCommands::Show { id, output } => cmd_report_show(ctx, &id, &output),
        ReportCommands::Delete { id } => cmd_report_delete(ctx, &id),
        ReportCommands::Export { id, output } => cmd_report_export(ctx, &id, output),
        ReportCommands::Upload { file, output } => cmd_report_upload(ctx, file, &output),
    }
}

fn cmd_report_list(ctx: &Context, json: bool) -> Result<(), CliError> {
    let (client, settings) = ctx.client()?;
    let reports = client.list_reports().map_err(CliError::store)?;

    if json {
        let json_str = serde_json::to_string_pretty(&reports)
            .map_err(|e| CliError::new(EXIT_RECON_OUTPUT, format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    } else {
        let mut stdout = std::io::stdout().lock();
        let placeholder = settings.recon_config().display.placeholder;
        crate::render::write_report_list(&mut stdout, &reports, &placeholder)
            .map_err(|e| CliError::new(EXIT_RECON_OUTPUT, e.to_string()))?;
    }
    eprintln!("{} stored reports", reports.len());
    Ok(())
}

fn cmd_report_show(ctx: &Context, id: &str, output: &OutputArgs) -> Result<(), CliError> {
    let today = parse_today(output.today.as_deref())?;
    let (client, settings) = ctx.client()?;
    let session = ReportSession::from_store(&client, id, &settings.recon_config(), today)?;
    emit(&session, output)
}

fn cmd_report_delete(ctx: &Context, id: &str) -> Result<(), CliError> {
    let (client, _) = ctx.client()?;
    let message = client.delete_report(id).map_err(CliError::store)?;
    eprintln!("{id}: {message}");
    Ok(())
}

fn cmd_report_export(ctx: &Context, id: &str, output: PathBuf) -> Result<(), CliError> {
    let (client, _) = ctx.client()?;
    let bytes = client.export_report(id).map_err(CliError::store)?;
    std::fs::write(&output, &bytes).map_err(|e| {
        CliError::new(EXIT_RECON_OUTPUT, format!("cannot write {}: {e}", output.display()))
    })?;
    eprintln!("wrote {} ({} bytes)", output.display(), bytes.len());
    Ok(())
}

fn cmd_report_upload(ctx: &Context, file: PathBuf, output: &OutputArgs) -> Result<(), CliError> {
    let today = parse_today(output.today.as_deref())?;
    let is_pdf = file
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        return Err(CliError::new(EXIT_RECON_INPUT, format!("{} is not a PDF", file.display()))
            .with_hint("the report store only extracts .pdf files"));
    }

    let (client, settings) = ctx.client()?;
    let session = ReportSession::from_upload(&client, &file, &settings.recon_config(), today)?;
    if let Some(id) = session.report_id() {
        eprintln!("stored as {id}");
    }
    emit(&session, output)
}
