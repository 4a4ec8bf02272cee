//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Rewrite url() references in stylesheets
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: cssurl.toml)
    #[arg(short = 'C', long, global = true, default_value = crate::config::CONFIG_FILE, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Flatten imports, rewrite url() references and copy assets
    #[command(visible_alias = "b")]
    Build {
        /// Stylesheets to process
        #[arg(required = true, value_hint = clap::ValueHint::FilePath)]
        inputs: Vec<PathBuf>,

        /// Directory the rewritten stylesheets are written to
        #[arg(short = 'd', long, default_value = "dist", value_hint = clap::ValueHint::DirPath)]
        out_dir: PathBuf,

        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Print a stylesheet with its @import statements marked
    #[command(visible_alias = "m")]
    Mark {
        #[arg(value_hint = clap::ValueHint::FilePath)]
        input: PathBuf,
    },
}

/// Overrides for values of the config file
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Output directory for copied images
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    pub img_output: Option<PathBuf>,

    /// Output directory for copied fonts
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    pub font_output: Option<PathBuf>,

    /// Directory relocated paths are made relative to (default: out-dir)
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    pub css_output: Option<PathBuf>,

    /// Inline assets up to this many bytes as data URIs
    #[arg(short, long)]
    pub limit: Option<u64>,

    /// Append a content hash to copied filenames
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub hash: Option<bool>,

    /// Prefix relocated paths with `./`
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub slash: Option<bool>,
}
