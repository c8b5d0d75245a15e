use std::path::PathBuf;

use clap::{Parser, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the docs-builder binary.
#[derive(Debug, Default, Parser)]
#[command(
    name = "docs-builder",
    version,
    about = "Render a tree of markdown documents into standalone HTML pages"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "DOCS_BUILDER_CONFIG_FILE",
        value_name = "PATH",
        value_hint = ValueHint::FilePath
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: BuildOverrides,
}

#[derive(Debug, clap::Args, Default, Clone)]
pub struct BuildOverrides {
    /// Root of the markdown source tree.
    #[arg(long = "src-dir", value_name = "PATH", value_hint = ValueHint::DirPath)]
    pub src_dir: Option<PathBuf>,

    /// Root of the generated HTML tree; created when missing.
    #[arg(long = "build-dir", value_name = "PATH", value_hint = ValueHint::DirPath)]
    pub build_dir: Option<PathBuf>,

    /// Maximum number of documents converted at the same time.
    #[arg(long = "jobs", value_name = "COUNT")]
    pub jobs: Option<u32>,

    /// Process documents in sorted relative-path order.
    #[arg(
        long = "sorted",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub sorted: Option<bool>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}
