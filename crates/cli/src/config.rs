// Layered run settings
// Order: built-in defaults < TOML file < TRIAGE_* environment < command-line flags

use clap::ValueEnum;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;
use triage_core::AppError;
use triage_infra_system::shell_runner::DEFAULT_MAX_OUTPUT_BYTES;
use triage_infra_system::RunnerConfig;

pub const DEFAULT_OUTPUT_PATH: &str = "/tmp/host_triage_report.txt";
pub const DEFAULT_SHELL: &str = "bash";
const ENV_PREFIX: &str = "TRIAGE";

/// When the report is also written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MirrorMode {
    /// Mirror only when stdout is a terminal
    Auto,
    Always,
    Never,
}

impl MirrorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MirrorMode::Auto => "auto",
            MirrorMode::Always => "always",
            MirrorMode::Never => "never",
        }
    }

    pub fn enabled(&self) -> bool {
        match self {
            MirrorMode::Auto => std::io::stdout().is_terminal(),
            MirrorMode::Always => true,
            MirrorMode::Never => false,
        }
    }
}

/// Values given on the command line; `None` leaves lower layers in charge
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub config_file: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub mirror: Option<MirrorMode>,
    pub elevate: bool,
    pub probe_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub output_path: PathBuf,
    pub mirror: MirrorMode,
    pub shell: String,
    pub elevate: bool,
    #[serde(default)]
    pub probe_timeout_secs: Option<u64>,
    pub max_output_bytes: usize,
}

impl Settings {
    /// Load settings from every layer, reading `TRIAGE_*` from the process environment
    pub fn load(overrides: &SettingsOverrides) -> Result<Self, AppError> {
        Self::load_with_env(overrides, None)
    }

    /// Same as `load`, with an explicit environment map (`None` = process environment)
    pub fn load_with_env(
        overrides: &SettingsOverrides,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, AppError> {
        let mut builder = Config::builder()
            .set_default("output_path", DEFAULT_OUTPUT_PATH)
            .and_then(|b| b.set_default("mirror", MirrorMode::Auto.as_str()))
            .and_then(|b| b.set_default("shell", DEFAULT_SHELL))
            .and_then(|b| b.set_default("elevate", false))
            .and_then(|b| b.set_default("max_output_bytes", DEFAULT_MAX_OUTPUT_BYTES as i64))
            .map_err(config_error)?;

        if let Some(path) = overrides.config_file.as_deref() {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .source(env),
        );

        let settings: Settings = builder
            .set_override_option(
                "output_path",
                overrides
                    .output_path
                    .as_deref()
                    .map(|p| p.to_string_lossy().into_owned()),
            )
            .and_then(|b| b.set_override_option("mirror", overrides.mirror.map(|m| m.as_str())))
            .and_then(|b| b.set_override_option("elevate", overrides.elevate.then_some(true)))
            .and_then(|b| {
                b.set_override_option(
                    "probe_timeout_secs",
                    overrides.probe_timeout_secs.map(|s| s as i64),
                )
            })
            .map_err(config_error)?
            .build()
            .map_err(config_error)?
            .try_deserialize()
            .map_err(config_error)?;

        settings.validated()
    }

    fn validated(mut self) -> Result<Self, AppError> {
        if self.shell.trim().is_empty() {
            return Err(AppError::Config("shell must not be empty".to_string()));
        }
        if self.max_output_bytes == 0 {
            return Err(AppError::Config("max_output_bytes must be greater than zero".to_string()));
        }
        if self.probe_timeout_secs == Some(0) {
            return Err(AppError::Config(
                "probe_timeout_secs must be greater than zero (omit it for no timeout)".to_string(),
            ));
        }
        self.output_path = expand_tilde(&self.output_path);
        Ok(self)
    }

    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig {
            shell: self.shell.clone(),
            elevate: self.elevate,
            max_output_bytes: self.max_output_bytes,
            timeout: self.probe_timeout_secs.map(Duration::from_secs),
        }
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&raw).into_owned())
}

fn config_error(e: config::ConfigError) -> AppError {
    AppError::Config(e.to_string())
}
