//! Host Triage - read-only incident triage report for a single Linux host
//! Runs the built-in probe catalog and writes one consolidated text report.

mod config;
mod logging;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tabled::{Table, Tabled};
use tracing::{info, warn};

use triage_core::application::{builtin_catalog, check_catalog, ReportAssembler};
use triage_core::port::SystemClock;
use triage_infra_system::{effective_privilege, open_artifact, Privilege, ShellProbeRunner};

use crate::config::{MirrorMode, Settings, SettingsOverrides};

#[derive(Parser)]
#[command(name = "host-triage")]
#[command(about = "Read-only incident triage report for this host", long_about = None)]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every probe and write the report (default)
    Run(RunArgs),

    /// Show the built-in probe catalog
    Catalog {
        /// Validate the catalog's secret-handling rules
        #[arg(long)]
        check: bool,
    },
}

#[derive(Args, Clone, Default)]
struct RunArgs {
    /// Report destination [default: /tmp/host_triage_report.txt]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the report to stdout
    #[arg(long, value_enum)]
    mirror: Option<MirrorMode>,

    /// Run probes through `sudo -n`
    #[arg(long)]
    elevate: bool,

    /// Per-probe timeout in seconds (no timeout when unset)
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// TOML settings file
    #[arg(long, env = "TRIAGE_CONFIG")]
    config: Option<PathBuf>,
}

impl From<RunArgs> for SettingsOverrides {
    fn from(args: RunArgs) -> Self {
        SettingsOverrides {
            config_file: args.config,
            output_path: args.output,
            mirror: args.mirror,
            elevate: args.elevate,
            probe_timeout_secs: args.timeout,
        }
    }
}

#[derive(Tabled)]
struct CatalogRow {
    section: String,
    command: String,
    kind: String,
    max_lines: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging().context("Failed to initialize logging")?;

    match cli.command.unwrap_or(Commands::Run(cli.run)) {
        Commands::Run(args) => run(args).await,
        Commands::Catalog { check } => catalog(check),
    }
}

async fn run(args: RunArgs) -> Result<()> {
    let overrides: SettingsOverrides = args.into();
    let settings = Settings::load(&overrides).context("Invalid settings")?;
    let mirror = settings.mirror.enabled();

    info!(
        version = triage_core::VERSION,
        output = %settings.output_path.display(),
        mirror = mirror,
        elevate = settings.elevate,
        "host-triage starting"
    );

    match effective_privilege() {
        Privilege::Root => info!("Running as root"),
        Privilege::Unprivileged { uid } if !settings.elevate => warn!(
            uid = uid,
            "Not running as root; privileged probes will record permission errors"
        ),
        Privilege::Unprivileged { uid } => info!(uid = uid, "Probes will run through sudo -n"),
    }

    // Opened before the first section so an unwritable destination fails fast
    let mut writer = open_artifact(&settings.output_path, mirror)?;

    let clock = Arc::new(SystemClock);
    let runner = Arc::new(ShellProbeRunner::new(settings.runner_config(), clock.clone()));
    let assembler = ReportAssembler::new(builtin_catalog(), runner, clock);

    let report = assembler.generate(&mut writer, &settings.output_path).await?;
    writer
        .flush()
        .map_err(|e| triage_core::AppError::artifact_write(&settings.output_path, e))?;

    info!(
        path = %report.destination().display(),
        probes = report.probe_count(),
        failed = report.failed_count(),
        "Report written"
    );
    if !mirror {
        eprintln!(
            "{} {}",
            "✓ Report written to".green().bold(),
            report.destination().display()
        );
    }

    Ok(())
}

fn catalog(check: bool) -> Result<()> {
    let catalog = builtin_catalog();

    let rows: Vec<CatalogRow> = catalog
        .probes()
        .map(|(section, probe)| CatalogRow {
            section: section.to_string(),
            command: probe.command().to_string(),
            kind: probe.kind().to_string(),
            max_lines: probe
                .max_lines()
                .map(|n| n.to_string())
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    println!("{}", "Built-in probe catalog".cyan().bold());
    println!();
    println!("{}", Table::new(rows));
    println!();
    println!(
        "  {} {}   {} {}",
        "Sections:".bold(),
        catalog.sections().len(),
        "Probes:".bold(),
        catalog.probe_count()
    );

    if !check {
        return Ok(());
    }

    println!();
    match check_catalog(&catalog) {
        Ok(()) => {
            println!("{}", "✓ Catalog check passed".green().bold());
            Ok(())
        }
        Err(violations) => {
            for violation in &violations {
                println!("  {} {}", "✗".red(), violation);
            }
            anyhow::bail!("catalog check failed with {} violation(s)", violations.len())
        }
    }
}
