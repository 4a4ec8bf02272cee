//! Background copies of relocated assets.
//!
//! The rewritten reference is written into the tree before the bytes land on
//! disk. Every copy is tracked here and the host must call
//! [`PendingWrites::wait`] before treating the output as complete.
//!
//! Copies run on a dedicated, bounded rayon pool. Workers of the global pool
//! block in `wait`, so copies must not be queued behind them.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, LazyLock};

use parking_lot::Mutex;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

use crate::rewrite::RewriteError;

static COPY_POOL: LazyLock<Result<ThreadPool, ThreadPoolBuildError>> = LazyLock::new(|| {
    ThreadPoolBuilder::new()
        .thread_name(|i| format!("cssurl-copy-{i}"))
        // A panicking copy drops its sender and surfaces as `CopyPanicked`.
        .panic_handler(|_| {})
        .build()
});

fn copy_pool() -> Result<&'static ThreadPool, RewriteError> {
    COPY_POOL.as_ref().map_err(|e| RewriteError::CopyPool {
        reason: e.to_string(),
    })
}

// ============================================================================
// Pending copy
// ============================================================================

struct PendingCopy {
    from: PathBuf,
    to: PathBuf,
    result: Receiver<io::Result<u64>>,
}

impl PendingCopy {
    fn spawn(from: &Path, to: &Path) -> Result<Self, RewriteError> {
        let (src, dst) = (from.to_path_buf(), to.to_path_buf());
        let (tx, rx) = mpsc::channel();
        copy_pool()?.spawn(move || {
            // The receiver is gone only when the walk was aborted.
            tx.send(fs::copy(&src, &dst)).ok();
        });
        Ok(Self {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            result: rx,
        })
    }

    fn join(self) -> Result<u64, RewriteError> {
        match self.result.recv() {
            Ok(Ok(bytes)) => Ok(bytes),
            Ok(Err(source)) => Err(RewriteError::Copy {
                from: self.from,
                to: self.to,
                source,
            }),
            Err(_) => Err(RewriteError::CopyPanicked { to: self.to }),
        }
    }
}

// ============================================================================
// Copy registry
// ============================================================================

/// Destination to source claims, shared by the pending sets of several
/// stylesheets written into the same output.
#[derive(Debug, Default)]
pub struct CopyRegistry {
    claims: Mutex<HashMap<PathBuf, PathBuf>>,
    conflicts: AtomicUsize,
}

impl CopyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a copy of `from` to `to`.
    ///
    /// Returns the previous source of `to` when it differs from `from`.
    pub fn claim(&self, from: &Path, to: &Path) -> Option<PathBuf> {
        let previous = self
            .claims
            .lock()
            .insert(to.to_path_buf(), from.to_path_buf())?;
        if previous == from {
            return None;
        }
        self.conflicts.fetch_add(1, Ordering::Relaxed);
        Some(previous)
    }

    /// Number of destinations claimed by more than one source.
    pub fn conflicts(&self) -> usize {
        self.conflicts.load(Ordering::Relaxed)
    }
}

// ============================================================================
// Pending writes
// ============================================================================

/// Set of in-flight asset copies.
#[must_use = "pending copies must be waited on before the output is complete"]
#[derive(Default)]
pub struct PendingWrites {
    copies: Vec<PendingCopy>,
    registry: Arc<CopyRegistry>,
}

impl PendingWrites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty set that reports destination conflicts to a shared registry.
    pub fn with_registry(registry: Arc<CopyRegistry>) -> Self {
        Self {
            copies: Vec::new(),
            registry,
        }
    }

    /// Start copying `from` to `to` in the background.
    ///
    /// A copy of the same source to the same destination that is already in
    /// flight is not repeated. A different source aimed at a pending
    /// destination waits for the earlier copy first, so the last request wins.
    pub fn copy(&mut self, from: &Path, to: &Path) -> Result<(), RewriteError> {
        let existing = self.copies.iter().position(|c| c.to == to);
        if existing.is_some_and(|idx| self.copies[idx].from == from) {
            return Ok(());
        }

        if let Some(previous) = self.registry.claim(from, to) {
            crate::log!(
                "warning";
                "{} is overwritten by {} (was {})",
                to.display(),
                from.display(),
                previous.display()
            );
        }
        if let Some(idx) = existing {
            self.copies.swap_remove(idx).join()?;
        }

        self.copies.push(PendingCopy::spawn(from, to)?);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.copies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.copies.is_empty()
    }

    /// Destination paths of the tracked copies.
    pub fn destinations(&self) -> impl Iterator<Item = &Path> {
        self.copies.iter().map(|c| c.to.as_path())
    }

    /// Block until every copy finished. Returns the number of files written.
    ///
    /// All copies are joined even if one fails; the first failure is returned.
    pub fn wait(self) -> Result<usize, RewriteError> {
        let mut written = 0;
        let mut first_error = None;
        for copy in self.copies {
            match copy.join() {
                Ok(_) => written += 1,
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(written),
        }
    }
}

impl std::fmt::Debug for PendingWrites {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.destinations()).finish()
    }
}
