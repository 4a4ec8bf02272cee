//! Provenance tracker for flattened imports.
//!
//! Walks the root's direct children as a state machine over marker comments:
//!
//! ```text
//! Outside ──start(path)──▶ Inside { origin: dir(path) }
//! Inside  ──start(path)──▶ Inside { origin: origin/dir(path) }   (outer span pushed)
//! Inside  ──end──────────▶ enclosing state
//! ```
//!
//! Inside a span, asset paths resolve against `root_dir/origin` instead of
//! the top-level file's directory. Marker nodes are reported for removal.

use std::path::{Path, PathBuf};

use crate::debug;
use crate::import::{is_end_marker, start_marker_path};
use crate::style::{NodeKind, StyleNode};

use super::RewriteError;

/// Whether the walk is inside an import span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanState {
    Outside,
    Inside {
        /// Directory of the imported file, relative to the root file.
        origin: PathBuf,
        /// Import path as written in the start marker.
        import: String,
        /// Node index of the start marker.
        start: usize,
    },
}

/// What to do with one top-level node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Marker comment, drop it from the output.
    Remove,
    /// Rewrite values below this node against the given directory.
    Scan(PathBuf),
    /// Nothing to do.
    Keep,
}

#[derive(Debug)]
pub struct ProvenanceTracker {
    root_dir: PathBuf,
    state: SpanState,
    /// Spans enclosing the current one.
    enclosing: Vec<SpanState>,
}

impl ProvenanceTracker {
    /// Track spans of a tree whose top-level file lives in `root_dir`.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            state: SpanState::Outside,
            enclosing: Vec::new(),
        }
    }

    pub fn state(&self) -> &SpanState {
        &self.state
    }

    /// Base directory for nodes at the current position.
    pub fn base_dir(&self) -> PathBuf {
        match &self.state {
            SpanState::Outside => self.root_dir.clone(),
            SpanState::Inside { origin, .. } => self.root_dir.join(origin),
        }
    }

    /// Advance over the top-level node at `index`.
    pub fn observe(&mut self, index: usize, node: &StyleNode) -> Step {
        if let Some(text) = node.text() {
            if let Some(import) = start_marker_path(text) {
                self.enter(index, import);
                return Step::Remove;
            }
            if is_end_marker(text) {
                self.leave(index);
                return Step::Remove;
            }
            return Step::Keep;
        }

        let scannable = match self.state {
            SpanState::Outside => matches!(node.kind(), NodeKind::Rule | NodeKind::AtRule),
            SpanState::Inside { .. } => node.nodes().is_some(),
        };
        if scannable {
            Step::Scan(self.base_dir())
        } else {
            Step::Keep
        }
    }

    /// Fail if a span is still open once the node list is exhausted.
    pub fn finish(self) -> Result<(), RewriteError> {
        match self.state {
            SpanState::Outside => Ok(()),
            SpanState::Inside { import, start, .. } => Err(RewriteError::UnterminatedImport {
                path: import,
                index: start,
            }),
        }
    }

    fn enter(&mut self, index: usize, import: &str) {
        let dir = Path::new(import).parent().unwrap_or_else(|| Path::new(""));
        let origin = match &self.state {
            SpanState::Outside => dir.to_path_buf(),
            SpanState::Inside { origin, .. } => origin.join(dir),
        };
        debug!("import"; "span {} from {}", import, origin.display());

        let outer = std::mem::replace(
            &mut self.state,
            SpanState::Inside {
                origin,
                import: import.to_string(),
                start: index,
            },
        );
        if outer != SpanState::Outside {
            self.enclosing.push(outer);
        }
    }

    fn leave(&mut self, index: usize) {
        if self.state == SpanState::Outside {
            debug!("import"; "stray end marker at node {}", index);
            return;
        }
        self.state = self.enclosing.pop().unwrap_or(SpanState::Outside);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::{FLAG_END, FLAG_START};

    fn start(path: &str) -> StyleNode {
        StyleNode::comment(format!("{FLAG_START}{path}"))
    }

    fn end() -> StyleNode {
        StyleNode::comment(FLAG_END)
    }

    fn rule() -> StyleNode {
        StyleNode::rule(".a", vec![StyleNode::decl("background", "url(icon.png)")])
    }

    #[test]
    fn test_outside_uses_root_dir() {
        let mut tracker = ProvenanceTracker::new("/site/css");
        assert_eq!(tracker.observe(0, &rule()), Step::Scan(PathBuf::from("/site/css")));
        assert_eq!(tracker.observe(1, &StyleNode::comment("note")), Step::Keep);
        assert!(tracker.finish().is_ok());
    }

    #[test]
    fn test_span_uses_import_dir() {
        let mut tracker = ProvenanceTracker::new("/site/css");
        assert_eq!(tracker.observe(0, &start("sub/file.css")), Step::Remove);
        assert_eq!(
            tracker.observe(1, &rule()),
            Step::Scan(PathBuf::from("/site/css/sub"))
        );
        assert_eq!(tracker.observe(2, &end()), Step::Remove);
        assert_eq!(tracker.state(), &SpanState::Outside);
        assert_eq!(tracker.observe(3, &rule()), Step::Scan(PathBuf::from("/site/css")));
        assert!(tracker.finish().is_ok());
    }

    #[test]
    fn test_nested_spans_join_origins() {
        let mut tracker = ProvenanceTracker::new("/r");
        tracker.observe(0, &start("a/one.css"));
        tracker.observe(1, &start("b/two.css"));
        assert_eq!(tracker.base_dir(), PathBuf::from("/r/a/b"));
        tracker.observe(2, &end());
        assert_eq!(tracker.base_dir(), PathBuf::from("/r/a"));
        tracker.observe(3, &end());
        assert_eq!(tracker.base_dir(), PathBuf::from("/r"));
    }

    #[test]
    fn test_unterminated_span_is_error() {
        let mut tracker = ProvenanceTracker::new("/r");
        tracker.observe(0, &start("sub/file.css"));
        tracker.observe(1, &rule());
        match tracker.finish() {
            Err(RewriteError::UnterminatedImport { path, index }) => {
                assert_eq!(path, "sub/file.css");
                assert_eq!(index, 0);
            }
            other => panic!("expected unterminated import, got {other:?}"),
        }
    }

    #[test]
    fn test_stray_end_marker_is_removed() {
        let mut tracker = ProvenanceTracker::new("/r");
        assert_eq!(tracker.observe(0, &end()), Step::Remove);
        assert_eq!(tracker.state(), &SpanState::Outside);
    }

    #[test]
    fn test_lookalike_comment_does_not_close_span() {
        let mut tracker = ProvenanceTracker::new("/r");
        tracker.observe(0, &start("sub/file.css"));
        let note = StyleNode::comment("append cssurl note");
        assert_eq!(tracker.observe(1, &note), Step::Keep);
        assert_eq!(tracker.base_dir(), PathBuf::from("/r/sub"));
    }

    #[test]
    fn test_top_level_declaration_is_not_scanned() {
        let mut tracker = ProvenanceTracker::new("/r");
        let decl = StyleNode::decl("background", "url(a.png)");
        assert_eq!(tracker.observe(0, &decl), Step::Keep);
    }
}
