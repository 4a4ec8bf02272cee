//! Stylesheet building.
//!
//! Per input: mark imports, flatten, parse, rewrite, print, write, then wait
//! for the asset copies. Inputs are processed in parallel.

use crate::{
    asset::{AssetCategory, CopyRegistry, PendingWrites},
    config::UrlConfig,
    debug,
    import::{flatten, mark_imports},
    log,
    logger::ProgressLine,
    rewrite::{RewriteError, RewriteStats, rewrite_root_with},
    style::{parse, print},
    utils::{path::absolutize, plural_count},
};
use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use super::BuildArgs;

/// Result of one written stylesheet, or totals of a whole build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub stats: RewriteStats,
    /// Copies performed, after deduplication.
    pub copies: usize,
    /// Output files claimed by more than one source asset.
    pub conflicts: usize,
}

/// Entry point of `cssurl build`.
pub fn build(config_path: &Path, inputs: &[PathBuf], out_dir: &Path, args: &BuildArgs) -> Result<()> {
    let work_dir = std::env::current_dir().map_err(RewriteError::WorkDir)?;
    let config = load_config(config_path, &work_dir, out_dir, args)?;
    build_all(&config, inputs, &absolutize(out_dir, &work_dir)).map(|_| ())
}

/// Load the config file (if any) and apply command-line overrides.
pub fn load_config(
    config_path: &Path,
    work_dir: &Path,
    out_dir: &Path,
    args: &BuildArgs,
) -> Result<UrlConfig> {
    let path = absolutize(config_path, work_dir);
    let (mut config, loaded) = UrlConfig::load(&path, work_dir)
        .with_context(|| format!("failed to load config {}", path.display()))?;
    if loaded {
        debug!("config"; "loaded {}", path.display());
    }

    apply_args(&mut config, args, out_dir);
    Ok(config)
}

/// Command-line flags win over file values. `css_output` falls back to the
/// output directory of the stylesheets.
fn apply_args(config: &mut UrlConfig, args: &BuildArgs, out_dir: &Path) {
    if let Some(dir) = &args.img_output {
        config.set_output(AssetCategory::Image, dir);
    }
    if let Some(dir) = &args.font_output {
        config.set_output(AssetCategory::Font, dir);
    }
    if let Some(dir) = &args.css_output {
        config.set_css_output(dir);
    }
    if config.css_output.is_none() {
        config.set_css_output(out_dir);
    }
    if let Some(limit) = args.limit {
        config.limit = limit;
    }
    if let Some(hash) = args.hash {
        config.hash = hash;
    }
    if let Some(slash) = args.slash {
        config.slash = slash;
    }
}

/// Build every input into `out_dir`.
///
/// Sheets share one [`CopyRegistry`], so two sheets relocating different
/// files onto the same output name are reported.
pub fn build_all(config: &UrlConfig, inputs: &[PathBuf], out_dir: &Path) -> Result<BuildSummary> {
    let inputs: Vec<PathBuf> = inputs
        .iter()
        .map(|p| absolutize(p, &config.work_dir))
        .collect();
    check_output_names(&inputs)?;

    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory {}", out_dir.display()))?;

    let registry = Arc::new(CopyRegistry::new());
    let progress = ProgressLine::new(&[("css", inputs.len())]);
    let results: Vec<Result<BuildSummary>> = inputs
        .par_iter()
        .map(|input| {
            let pending = PendingWrites::with_registry(Arc::clone(&registry));
            let sheet = build_one(config, input, out_dir, pending);
            progress.inc("css");
            sheet
        })
        .collect();

    let mut summary = BuildSummary::default();
    for result in results {
        let sheet = result?;
        summary.stats.merge(sheet.stats);
        summary.copies += sheet.copies;
    }
    summary.conflicts = registry.conflicts();
    progress.finish();
    let BuildSummary { stats, copies, conflicts } = summary;

    log!("build"; "{} -> {}", plural_count(inputs.len(), "stylesheet"), out_dir.display());
    if stats.inlined > 0 {
        log!("inline"; "{}", plural_count(stats.inlined, "reference"));
    }
    if copies > 0 {
        log!("copy"; "{}", plural_count(copies, "asset"));
    }
    if conflicts > 0 {
        log!("warning"; "{} written from more than one source", plural_count(conflicts, "asset"));
    }
    debug!("build"; "{} left unmodified", plural_count(stats.skipped, "reference"));
    Ok(summary)
}

/// Process one stylesheet and wait for its copies.
fn build_one(
    config: &UrlConfig,
    input: &Path,
    out_dir: &Path,
    pending: PendingWrites,
) -> Result<BuildSummary> {
    let code = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    let marked = mark_imports(&code, input, None);
    let flat = flatten(&marked.code, input)
        .with_context(|| format!("failed to flatten imports of {}", input.display()))?;
    let mut root = parse(&flat, Some(input));

    let outcome = rewrite_root_with(&mut root, config, pending)
        .with_context(|| format!("failed to rewrite {}", input.display()))?;

    let dest = out_dir.join(output_file_name(input)?);
    fs::write(&dest, print(&root))
        .with_context(|| format!("failed to write {}", dest.display()))?;
    debug!("build"; "{} -> {}", input.display(), dest.display());

    let copies = outcome
        .pending
        .wait()
        .with_context(|| format!("failed to copy assets of {}", input.display()))?;

    Ok(BuildSummary {
        stats: outcome.stats,
        copies,
        conflicts: 0,
    })
}

fn output_file_name(input: &Path) -> Result<&std::ffi::OsStr> {
    input
        .file_name()
        .with_context(|| format!("input {} has no file name", input.display()))
}

/// Two inputs with the same basename would overwrite each other.
fn check_output_names(inputs: &[PathBuf]) -> Result<()> {
    let mut seen: HashMap<&std::ffi::OsStr, &Path> = HashMap::new();
    for input in inputs {
        let name = output_file_name(input)?;
        if let Some(first) = seen.insert(name, input) {
            bail!(
                "{} and {} would both be written as {}",
                first.display(),
                input.display(),
                Path::new(name).display()
            );
        }
    }
    Ok(())
}
