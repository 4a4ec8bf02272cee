//! Asset resolver: decides per reference whether to inline, relocate or
//! leave it alone, and splices the result into the owning value.

use std::fs;
use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use super::output::reference_path;
use super::scan::scan_value;
use super::{RewriteError, RewriteStats};
use crate::asset::{AssetTarget, PendingWrites, output_name};
use crate::config::UrlConfig;
use crate::debug;
use crate::utils::hash::ContentHash;
use crate::utils::mime;
use crate::utils::path::absolutize;
use crate::utils::url::split_suffix;

/// Per-tree resolution state.
pub(super) struct Resolver<'a> {
    pub config: &'a UrlConfig,
    pub pending: PendingWrites,
    pub stats: RewriteStats,
}

impl<'a> Resolver<'a> {
    pub fn new(config: &'a UrlConfig, pending: PendingWrites) -> Self {
        Self {
            config,
            pending,
            stats: RewriteStats::default(),
        }
    }

    /// Rewrite every reference of `value`, resolving paths against `base`.
    ///
    /// Replacements are spliced at the scanner's offsets; text between
    /// references is copied through untouched.
    pub fn rewrite_value(&mut self, value: &mut String, base: &Path) -> Result<(), RewriteError> {
        let refs = scan_value(value);
        if refs.is_empty() {
            return Ok(());
        }

        let mut out = String::with_capacity(value.len());
        let mut last = 0;
        let mut changed = false;

        for reference in &refs {
            let Some(replacement) = self.resolve(reference.path_in(value), base)? else {
                continue;
            };
            out.push_str(&value[last..reference.path.start]);
            out.push_str(&replacement);
            last = reference.path.end;
            changed = true;
        }

        if changed {
            out.push_str(&value[last..]);
            *value = out;
        }
        Ok(())
    }

    /// New path text for one reference, `None` to leave it unmodified.
    fn resolve(&mut self, raw: &str, base: &Path) -> Result<Option<String>, RewriteError> {
        let config = self.config;
        let (file_part, suffix) = split_suffix(raw);
        let Some((category, output_dir)) = config.route(file_part) else {
            debug!("skip"; "{} (no output for {})", raw, config.category_of(file_part));
            self.stats.skipped += 1;
            return Ok(None);
        };

        let target = AssetTarget::resolve(absolutize(Path::new(file_part), base))?;

        if target.size <= config.limit {
            let uri = data_uri(&target)?;
            debug!("inline"; "{} {} ({} bytes)", category, raw, target.size);
            self.stats.inlined += 1;
            return Ok(Some(uri));
        }

        debug!("copy"; "{} {} ({} bytes)", category, raw, target.size);
        let path = self.relocate(&target, output_dir)?;
        self.stats.copied += 1;
        let prefix = if config.slash { "./" } else { "" };
        Ok(Some(format!("{prefix}{path}{suffix}")))
    }

    /// Queue the copy of `target` and return its reference path.
    fn relocate(&mut self, target: &AssetTarget, output_dir: &Path) -> Result<String, RewriteError> {
        fs::create_dir_all(output_dir).map_err(|source| RewriteError::OutputDir {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let hash = if self.config.hash {
            Some(ContentHash::of(&target.read()?))
        } else {
            None
        };
        let dest = output_dir.join(output_name(target, hash));
        debug!("copy"; "{} -> {}", target.path.display(), dest.display());
        self.pending.copy(&target.path, &dest)?;

        Ok(reference_path(
            &dest,
            self.config.css_output.as_deref(),
            &self.config.work_dir,
        ))
    }
}

/// `data:<mime>;base64,<payload>` for a whole file.
fn data_uri(target: &AssetTarget) -> Result<String, RewriteError> {
    let bytes = target.read()?;
    Ok(format!(
        "data:{};base64,{}",
        mime::from_path(&target.path),
        STANDARD.encode(bytes)
    ))
}
