//! cssurl - inline or relocate assets referenced by stylesheets.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cssurl::cli::{Cli, Commands, build::build, mark::mark};
use cssurl::logger;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    match &cli.command {
        Commands::Build {
            inputs,
            out_dir,
            build_args,
        } => build(&cli.config, inputs, out_dir, build_args),
        Commands::Mark { input } => mark(input),
    }
}
