use crate::seed::Seed;
use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

pub const DEFAULT_CONFIG_FILE: &str = "classtasksd.toml";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Default, Parser)]
#[command(
    name = "classtasksd",
    version,
    about = "Classroom task board sidecar speaking JSON lines over stdio"
)]
pub struct Cli {
    /// TOML config file (defaults to ./classtasksd.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// TOML seed file replacing the built-in sample classroom
    #[arg(long)]
    pub seed: Option<PathBuf>,

    /// Start with an empty board when no seed file is given
    #[arg(long)]
    pub no_sample_data: bool,

    /// tracing filter, e.g. "debug" or "classtasksd=trace"
    #[arg(long)]
    pub log_filter: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub log_filter: String,
    pub seed_path: Option<PathBuf>,
    pub sample_data: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.into(),
            seed_path: None,
            sample_data: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    log_filter: Option<String>,
    seed_path: Option<PathBuf>,
    sample_data: Option<bool>,
}

fn read_file_config(path: &Path) -> anyhow::Result<FileConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("failed to parse config file '{}'", path.display()))
}

fn apply_file(settings: &mut Settings, file: FileConfig) {
    if let Some(v) = file.log_filter {
        settings.log_filter = v;
    }
    if let Some(v) = file.seed_path {
        settings.seed_path = Some(v);
    }
    if let Some(v) = file.sample_data {
        settings.sample_data = v;
    }
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("CLASSTASKSD_LOG").or_else(|| lookup("RUST_LOG")) {
        settings.log_filter = v;
    }
    if let Some(v) = lookup("CLASSTASKSD_SEED") {
        if !v.trim().is_empty() {
            settings.seed_path = Some(PathBuf::from(v));
        }
    }
}

fn apply_cli(settings: &mut Settings, cli: &Cli) {
    if let Some(v) = &cli.log_filter {
        settings.log_filter = v.clone();
    }
    if let Some(v) = &cli.seed {
        settings.seed_path = Some(v.clone());
    }
    if cli.no_sample_data {
        settings.sample_data = false;
    }
}

/// Flags beat env, env beats the config file, the file beats defaults.
/// An explicit `--config` that cannot be read is an error; a missing default file is not.
pub fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match &cli.config {
        Some(path) => apply_file(&mut settings, read_file_config(path)?),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.is_file() {
                apply_file(&mut settings, read_file_config(default_path)?);
            }
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    apply_cli(&mut settings, cli);
    Ok(settings)
}

pub fn log_filter(settings: &Settings) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_new(&settings.log_filter)
        .with_context(|| format!("invalid log filter '{}'", settings.log_filter))
}

pub fn initial_seed(settings: &Settings) -> anyhow::Result<Seed> {
    if let Some(path) = &settings.seed_path {
        return Seed::load(path);
    }
    if settings.sample_data {
        return Ok(Seed::sample());
    }
    Ok(Seed::default())
}
