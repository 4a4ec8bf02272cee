//! The url() rewrite transform.
//!
//! [`rewrite_root`] walks a parsed stylesheet, resolves every `url()` found in
//! declaration values and replaces it with a data URI or a path to the copied
//! asset. Import spans left by [`crate::import::mark_imports`] switch the base
//! directory for the nodes they enclose.

mod error;
mod output;
mod provenance;
mod resolve;
mod scan;


use std::path::Path;

pub use error::RewriteError;
pub use output::reference_path;
pub use provenance::{ProvenanceTracker, SpanState, Step};
pub use scan::{UrlReference, scan_value, visit_values};

use crate::asset::PendingWrites;
use crate::config::UrlConfig;
use crate::debug;
use crate::style::Root;
use crate::utils::path::absolutize;

use resolve::Resolver;

/// Counters of one rewrite pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RewriteStats {
    pub inlined: usize,
    pub copied: usize,
    /// References left unmodified because their category has no output.
    pub skipped: usize,
}

impl RewriteStats {
    pub fn merge(&mut self, other: Self) {
        self.inlined += other.inlined;
        self.copied += other.copied;
        self.skipped += other.skipped;
    }
}

/// Result of a successful pass. `pending` must be waited on.
#[must_use]
#[derive(Debug)]
pub struct RewriteOutcome {
    pub pending: PendingWrites,
    pub stats: RewriteStats,
}

/// Rewrite all `url()` references of `root` in place.
///
/// Paths resolve against the directory of `root.source`, or against the
/// imported file's directory inside an import span. Marker comments are
/// removed from the tree. On error the tree may be partially rewritten.
pub fn rewrite_root(root: &mut Root, config: &UrlConfig) -> Result<RewriteOutcome, RewriteError> {
    rewrite_root_with(root, config, PendingWrites::new())
}

/// [`rewrite_root`], queueing copies on `pending`.
///
/// Used to share a [`crate::asset::CopyRegistry`] between stylesheets that
/// write into the same output directories.
pub fn rewrite_root_with(
    root: &mut Root,
    config: &UrlConfig,
    pending: PendingWrites,
) -> Result<RewriteOutcome, RewriteError> {
    let source = root.source().ok_or(RewriteError::NoSource)?;
    let source_dir = source.parent().unwrap_or_else(|| Path::new(""));
    let root_dir = absolutize(source_dir, &config.work_dir);
    debug!("rewrite"; "{} (base {})", source.display(), root_dir.display());

    let mut tracker = ProvenanceTracker::new(root_dir);
    let mut resolver = Resolver::new(config, pending);
    let mut remove = vec![false; root.nodes.len()];

    for (index, node) in root.nodes.iter_mut().enumerate() {
        match tracker.observe(index, node) {
            Step::Remove => remove[index] = true,
            Step::Scan(base) => {
                visit_values(std::slice::from_mut(node), &mut |value: &mut String| {
                    resolver.rewrite_value(value, &base)
                })?;
            }
            Step::Keep => {}
        }
    }
    tracker.finish()?;

    let mut flags = remove.into_iter();
    root.nodes.retain(|_| !flags.next().unwrap_or(false));

    Ok(RewriteOutcome {
        pending: resolver.pending,
        stats: resolver.stats,
    })
}
