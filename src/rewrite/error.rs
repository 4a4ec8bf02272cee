//! Errors of the rewrite transform. Every variant aborts the whole walk.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RewriteError {
    /// Asset could not be stat'ed or read.
    #[error("cannot read asset `{}`", path.display())]
    Asset {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot create output directory `{}`", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to copy `{}` to `{}`", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot start the asset copy pool: {reason}")]
    CopyPool { reason: String },

    #[error("copy of `{}` panicked", to.display())]
    CopyPanicked { to: PathBuf },

    /// A start marker without a matching end marker.
    #[error("import of `{path}` is never closed (start marker at node {index} has no end marker)")]
    UnterminatedImport { path: String, index: usize },

    #[error("stylesheet root has no source file")]
    NoSource,

    #[error("cannot read the working directory")]
    WorkDir(#[source] io::Error),
}
