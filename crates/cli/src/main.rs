// dash CLI - DASH driver report reconciliation
// Local reports are reconciled offline; `report` subcommands talk to the store.

mod diff;
mod exit_codes;
mod recon;
mod render;
mod report;
mod session;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use dash_store_client::{ReportStoreClient, StoreError, StoreSettings};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use exit_codes::{
    store_exit_code, EXIT_ERROR, EXIT_RECON_INVALID_CONFIG, EXIT_STORE_SETTINGS, EXIT_SUCCESS,
    EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "dash")]
#[command(about = "Reconcile insurance policy timelines from DASH driver reports")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Debug logging to stderr (otherwise RUST_LOG, default warn)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Report store API base (overrides the settings file)
    #[arg(long, global = true, env = "DASH_API_BASE")]
    api_base: Option<String>,

    /// Settings file (default: <config dir>/dash/config.toml)
    #[arg(long, global = true, env = "DASH_SETTINGS")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile a report JSON file offline
    #[command(after_help = "\
Examples:
  dash recon report.json
  dash recon report.json --json
  dash recon report.json --today 2024-02-01 --output view.json
  dash recon report.json --config recon.toml --fail-on-expired")]
    Recon(recon::ReconArgs),

    /// Work with reports held by the report store
    #[command(subcommand)]
    Report(report::ReportCommands),

    /// Structural diff of two JSON documents (typically two policies)
    #[command(after_help = "\
Examples:
  dash diff policy-a.json policy-b.json
  dash diff policy-a.json policy-b.json --json
  dash diff policy-a.json policy-b.json --remote")]
    Diff(diff::DiffArgs),

    /// Inspect and edit configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Validate a recon config file without running
    #[command(after_help = "\
Examples:
  dash config validate recon.toml")]
    Validate {
        /// Path to the recon TOML file
        file: PathBuf,
    },

    /// Print the effective store settings as TOML
    Show,

    /// Write one value to the settings file
    #[command(after_help = "\
Examples:
  dash config set api-base https://reports.example.com/api
  dash config set timeout-secs 30")]
    Set {
        key: SettingKey,
        value: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SettingKey {
    ApiBase,
    TimeoutSecs,
}

impl SettingKey {
    fn as_str(self) -> &'static str {
        match self {
            Self::ApiBase => "api_base",
            Self::TimeoutSecs => "timeout_secs",
        }
    }
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  dash-recon ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

fn init_tracing(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy()
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = Context { api_base: cli.api_base, settings_path: cli.settings };
    let result = match cli.command {
        Commands::Recon(args) => recon::cmd_recon(&ctx, args),
        Commands::Report(cmd) => report::cmd_report(&ctx, cmd),
        Commands::Diff(args) => diff::cmd_diff(&ctx, args),
        Commands::Config(ConfigCommands::Validate { file }) => cmd_config_validate(&file),
        Commands::Config(ConfigCommands::Show) => cmd_config_show(&ctx),
        Commands::Config(ConfigCommands::Set { key, value }) => cmd_config_set(&ctx, key, &value),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

// ============================================================================
// Context
// ============================================================================

/// Global options shared by every command.
pub struct Context {
    api_base: Option<String>,
    settings_path: Option<PathBuf>,
}

impl Context {
    /// Settings file merged with the `--api-base` override.
    pub fn settings(&self) -> Result<StoreSettings, CliError> {
        let loaded = match &self.settings_path {
            Some(path) => StoreSettings::load(path),
            None => dash_store_client::load_settings(),
        };
        let mut settings = loaded.map_err(|e| {
            CliError::new(EXIT_STORE_SETTINGS, e.to_string()).with_hint(format!(
                "check {}",
                self.settings_file()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|_| "the settings file".into())
            ))
        })?;

        if let Some(base) = &self.api_base {
            settings.api_base = base.trim_end_matches('/').to_string();
            settings
                .validate()
                .map_err(|e| CliError::new(EXIT_USAGE, format!("--api-base: {e}")))?;
        }
        Ok(settings)
    }

    /// `--settings` if given, else the per-user default.
    pub fn settings_file(&self) -> Result<PathBuf, CliError> {
        self.settings_path
            .clone()
            .or_else(dash_store_client::settings_file_path)
            .ok_or_else(|| {
                CliError::new(EXIT_STORE_SETTINGS, "no config directory on this platform")
                    .with_hint("pass --settings <file>")
            })
    }

    pub fn client(&self) -> Result<(ReportStoreClient, StoreSettings), CliError> {
        let settings = self.settings()?;
        let client = ReportStoreClient::from_settings(&settings).map_err(CliError::store)?;
        tracing::debug!(api_base = client.api_base(), "store client ready");
        Ok((client, settings))
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self::new(EXIT_ERROR, msg)
    }

    /// Create error from a store error with its registry exit code.
    pub fn store(err: StoreError) -> Self {
        let code = store_exit_code(&err);
        let hint = match &err {
            StoreError::Network(_) => Some("is the report store running? see --api-base".to_string()),
            StoreError::NotFound(_) => Some("`dash report list` shows stored report ids".to_string()),
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// config
// ============================================================================

fn cmd_config_validate(file: &Path) -> Result<(), CliError> {
    let config = dash_recon::ReconConfig::load(file)
        .map_err(|e| CliError::new(EXIT_RECON_INVALID_CONFIG, e.to_string()))?;
    eprintln!(
        "{}: ok (warning_days={}, name_fallback={}, first_operator_fallback={})",
        file.display(),
        config.expiry.warning_days,
        config.matching.name_fallback,
        config.matching.first_operator_fallback,
    );
    Ok(())
}

fn cmd_config_show(ctx: &Context) -> Result<(), CliError> {
    let settings = ctx.settings()?;
    let text = toml::to_string_pretty(&settings)
        .map_err(|e| CliError::general(format!("cannot render settings: {e}")))?;
    print!("{text}");
    Ok(())
}

fn cmd_config_set(ctx: &Context, key: SettingKey, value: &str) -> Result<(), CliError> {
    let path = ctx.settings_file()?;
    // File contents only; `--api-base` must not leak into the saved file.
    let mut settings = StoreSettings::load(&path).map_err(CliError::store)?;

    match key {
        SettingKey::ApiBase => settings.api_base = value.trim_end_matches('/').to_string(),
        SettingKey::TimeoutSecs => {
            settings.timeout_secs = value
                .parse()
                .map_err(|_| CliError::usage(format!("timeout_secs must be a whole number, got '{value}'")))?;
        }
    }
    settings
        .validate()
        .map_err(|e| CliError::usage(e.to_string()))?;

    dash_store_client::save_settings(&path, &settings).map_err(CliError::store)?;
    eprintln!("{}: {} = {}", path.display(), key.as_str(), value);
    Ok(())
}
