//! `dash recon` — reconcile a report JSON file, plus the output path shared
//! with `dash report show` / `dash report upload`.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use dash_recon::{ExpiryClass, ReconConfig};

use crate::exit_codes::{EXIT_POLICY_EXPIRED, EXIT_RECON_INVALID_CONFIG, EXIT_RECON_OUTPUT};
use crate::session::ReportSession;
use crate::{CliError, Context};

#[derive(Args)]
pub struct ReconArgs {
    /// Report JSON file (bare report or store envelope)
    pub report: PathBuf,

    /// Recon config TOML (overrides the settings file's [recon] table)
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Options shared by every command that produces a reconciled view.
#[derive(Args)]
pub struct OutputArgs {
    /// Reference date for days-to-expiry, YYYY-MM-DD (default: today)
    #[arg(long, value_name = "DATE")]
    pub today: Option<String>,

    /// Output JSON to stdout
    #[arg(long)]
    pub json: bool,

    /// Write JSON output to file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Exit 10 when the current policy has expired
    #[arg(long)]
    pub fail_on_expired: bool,
}

pub fn cmd_recon(ctx: &Context, args: ReconArgs) -> Result<(), CliError> {
    let today = parse_today(args.output.today.as_deref())?;
    let config = match &args.config {
        Some(path) => ReconConfig::load(path)
            .map_err(|e| CliError::new(EXIT_RECON_INVALID_CONFIG, e.to_string()))?,
        // Offline runs should not fail on a broken store URL; only the recon table matters.
        None => ctx.settings().map(|s| s.recon_config()).unwrap_or_else(|e| {
            tracing::warn!(error = %e.message, "ignoring settings file");
            ReconConfig::default()
        }),
    };

    let session = ReportSession::from_file(&args.report, &config, today)?;
    emit(&session, &args.output)
}

/// Parse `--today`, defaulting to the local calendar date.
pub fn parse_today(arg: Option<&str>) -> Result<NaiveDate, CliError> {
    match arg {
        None => Ok(chrono::Local::now().date_naive()),
        Some(text) => NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").map_err(|_| {
            CliError::usage(format!("invalid --today '{text}'")).with_hint("use YYYY-MM-DD")
        }),
    }
}

/// Write JSON (stdout and/or file), the human summary to stderr, then apply
/// `--fail-on-expired`.
pub fn emit(session: &ReportSession, opts: &OutputArgs) -> Result<(), CliError> {
    let result = &session.result;

    if opts.json || opts.output.is_some() {
        let json_str = serde_json::to_string_pretty(result)
            .map_err(|e| CliError::new(EXIT_RECON_OUTPUT, format!("JSON serialization error: {e}")))?;

        if let Some(ref path) = opts.output {
            std::fs::write(path, &json_str).map_err(|e| {
                CliError::new(EXIT_RECON_OUTPUT, format!("cannot write {}: {e}", path.display()))
            })?;
            eprintln!("wrote {}", path.display());
        }

        if opts.json {
            println!("{json_str}");
        }
    }

    // Human summary to stderr
    let mut stderr = std::io::stderr().lock();
    crate::render::write_session(&mut stderr, session)
        .map_err(|e| CliError::new(EXIT_RECON_OUTPUT, e.to_string()))?;

    if opts.fail_on_expired && result.continuity.expiry_class == Some(ExpiryClass::Expired) {
        return Err(CliError::new(
            EXIT_POLICY_EXPIRED,
            format!("current policy expired ({})", result.expiry_label),
        ));
    }

    Ok(())
}
