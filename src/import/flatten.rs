//! Textual `@import` inlining.
//!
//! Each `@import "path";` is replaced by the content of the imported file.
//! The imported content is run through [`mark_imports`] first, so its own
//! imports are flattened with markers whose paths are relative to the
//! imported file. Network imports are left as they are.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::marker::{live_imports, mark_imports};
use crate::utils::path::{absolutize, normalize};
use crate::utils::url::has_scheme;

#[derive(Debug, Error)]
pub enum FlattenError {
    #[error("failed to read import `{}` (imported from {})", path.display(), from.display())]
    Read {
        path: PathBuf,
        from: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("import cycle: {}", chain.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(" -> "))]
    Cycle { chain: Vec<PathBuf> },
}

/// Inline every local `@import` of `code`, which was read from `file`.
pub fn flatten(code: &str, file: &Path) -> Result<String, FlattenError> {
    let mut chain = vec![normalize(file)];
    flatten_inner(code, file, &mut chain)
}

fn flatten_inner(code: &str, file: &Path, chain: &mut Vec<PathBuf>) -> Result<String, FlattenError> {
    let dir = file.parent().unwrap_or_else(|| Path::new(""));
    let mut out = String::with_capacity(code.len());
    let mut last = 0;

    for caps in live_imports(code) {
        let Some(statement) = caps.get(0) else {
            continue;
        };
        let import = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map_or("", |m| m.as_str());

        out.push_str(&code[last..statement.start()]);
        last = statement.end();

        if import.is_empty() || has_scheme(import) {
            out.push_str(statement.as_str());
            continue;
        }

        let target = absolutize(Path::new(import), dir);
        if chain.contains(&target) {
            let mut cycle = chain.clone();
            cycle.push(target);
            return Err(FlattenError::Cycle { chain: cycle });
        }

        let content = fs::read_to_string(&target).map_err(|source| FlattenError::Read {
            path: target.clone(),
            from: file.to_path_buf(),
            source,
        })?;
        let marked = mark_imports(&content, &target, None);

        chain.push(target.clone());
        let inlined = flatten_inner(&marked.code, &target, chain)?;
        chain.pop();

        crate::debug!("import"; "inlined {}", target.display());
        out.push_str(&inlined);
    }
    out.push_str(&code[last..]);

    Ok(out)
}
