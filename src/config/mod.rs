//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{num::NonZeroUsize, path::PathBuf, str::FromStr};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

mod cli;

pub use cli::{BuildOverrides, CliArgs};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "docs-builder";
const ENV_PREFIX: &str = "DOCS_BUILDER";
pub const DEFAULT_SRC_DIR: &str = "../engine/docs/src";
pub const DEFAULT_BUILD_DIR: &str = "../engine/docs/build";
const DEFAULT_JOBS: u64 = 1;
const MAX_JOBS: usize = 32;

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub paths: PathSettings,
    pub logging: LoggingSettings,
    pub build: BuildSettings,
}

/// Source and destination roots as configured; not yet resolved on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSettings {
    pub src_dir: PathBuf,
    pub build_dir: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            src_dir: PathBuf::from(DEFAULT_SRC_DIR),
            build_dir: PathBuf::from(DEFAULT_BUILD_DIR),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildSettings {
    pub jobs: NonZeroUsize,
    pub sorted: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            jobs: NonZeroUsize::MIN,
            sorted: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(&cli.overrides);

    Settings::from_raw(raw)
}

/// Resolve configuration using the process arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    paths: RawPathSettings,
    logging: RawLoggingSettings,
    build: RawBuildSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawPathSettings {
    src_dir: Option<PathBuf>,
    build_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawBuildSettings {
    jobs: Option<u64>,
    sorted: Option<bool>,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &BuildOverrides) {
        if let Some(dir) = overrides.src_dir.as_ref() {
            self.paths.src_dir = Some(dir.clone());
        }
        if let Some(dir) = overrides.build_dir.as_ref() {
            self.paths.build_dir = Some(dir.clone());
        }
        if let Some(jobs) = overrides.jobs {
            self.build.jobs = Some(jobs.into());
        }
        if let Some(sorted) = overrides.sorted {
            self.build.sorted = Some(sorted);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            paths,
            logging,
            build,
        } = raw;

        Ok(Self {
            paths: build_path_settings(paths)?,
            logging: build_logging_settings(logging)?,
            build: build_build_settings(build)?,
        })
    }
}

fn build_path_settings(paths: RawPathSettings) -> Result<PathSettings, LoadError> {
    let src_dir = paths
        .src_dir
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SRC_DIR));
    if src_dir.as_os_str().is_empty() {
        return Err(LoadError::invalid("paths.src_dir", "path must not be empty"));
    }

    let build_dir = paths
        .build_dir
        .unwrap_or_else(|| PathBuf::from(DEFAULT_BUILD_DIR));
    if build_dir.as_os_str().is_empty() {
        return Err(LoadError::invalid(
            "paths.build_dir",
            "path must not be empty",
        ));
    }

    Ok(PathSettings { src_dir, build_dir })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_build_settings(build: RawBuildSettings) -> Result<BuildSettings, LoadError> {
    let jobs_value = build.jobs.unwrap_or(DEFAULT_JOBS);
    let jobs = non_zero_usize(jobs_value, "build.jobs")?;
    let jobs = NonZeroUsize::new(jobs.get().min(MAX_JOBS)).unwrap_or(NonZeroUsize::MIN);

    Ok(BuildSettings {
        jobs,
        sorted: build.sorted.unwrap_or(true),
    })
}

fn non_zero_usize(value: u64, key: &'static str) -> Result<NonZeroUsize, LoadError> {
    let value_usize: usize = value
        .try_into()
        .map_err(|_| LoadError::invalid(key, "value exceeds supported range for usize"))?;
    NonZeroUsize::new(value_usize).ok_or_else(|| LoadError::invalid(key, "must be greater than zero"))
}

#[cfg(test)]
mod tests;
