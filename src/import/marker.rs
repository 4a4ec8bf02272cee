//! Import marking preprocessor.
//!
//! Every `@import "path";` is wrapped as
//!
//! ```text
//! /*start cssurl import path:path*/@import "path";/*end cssurl*/
//! ```
//!
//! Once a flattening step replaces the statement with the imported file's
//! content, the marker pair bounds that content and records where it came
//! from. Markers are plain comments, so any text-level import resolver keeps
//! them intact.

use std::ops::Range;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Prefix of the start marker text; the import path follows it.
pub const FLAG_START: &str = "start cssurl import path:";
/// Full end marker text.
pub const FLAG_END: &str = "end cssurl";

/// `@import "path";` or `@import 'path';`
static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"@import\s+(?:"([^"\n]*)"|'([^'\n]*)')\s*;"#).expect("valid import regex")
});

/// Marked source text plus the untouched source map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marked {
    pub code: String,
    pub map: Option<String>,
}

/// Start marker comment for an imported path.
pub fn start_marker(path: &str) -> String {
    format!("/*{FLAG_START}{path}*/")
}

/// End marker comment.
pub fn end_marker() -> String {
    format!("/*{FLAG_END}*/")
}

/// Import path carried by a start marker's comment text.
pub fn start_marker_path(text: &str) -> Option<&str> {
    text.trim().strip_prefix(FLAG_START).map(str::trim)
}

/// Whether a comment text is an end marker.
pub fn is_end_marker(text: &str) -> bool {
    text.trim() == FLAG_END
}

/// Byte ranges of the comments and string literals of `code`.
///
/// Unterminated comments run to the end of the text, unterminated strings to
/// the end of the line.
fn opaque_ranges(code: &str) -> Vec<Range<usize>> {
    let bytes = code.as_bytes();
    let mut ranges = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = code[i + 2..]
                    .find("*/")
                    .map_or(bytes.len(), |offset| i + 2 + offset + 2);
                ranges.push(i..end);
                i = end;
            }
            quote @ (b'"' | b'\'') => {
                let mut j = i + 1;
                while j < bytes.len() && bytes[j] != quote && bytes[j] != b'\n' {
                    if bytes[j] == b'\\' {
                        j += 1;
                    }
                    j += 1;
                }
                let end = (j + 1).min(bytes.len());
                ranges.push(i..end);
                i = end;
            }
            _ => i += 1,
        }
    }
    ranges
}

/// `@import` statements of `code` that are not inside a comment or string.
pub(super) fn live_imports(code: &str) -> impl Iterator<Item = Captures<'_>> {
    let opaque = opaque_ranges(code);
    IMPORT_RE.captures_iter(code).filter(move |caps| {
        caps.get(0).is_some_and(|m| {
            let at = m.start();
            // Ranges are sorted and disjoint.
            let idx = opaque.partition_point(|r| r.end <= at);
            opaque.get(idx).is_none_or(|r| !r.contains(&at))
        })
    })
}

/// Wrap every `@import` statement of `code` in marker comments.
///
/// Matches are found left to right and never overlap; the statement itself is
/// left untouched between its markers.
pub fn mark_imports(code: &str, file: &Path, map: Option<String>) -> Marked {
    let mut out = String::with_capacity(code.len());
    let mut last = 0;
    let mut count = 0usize;

    for caps in live_imports(code) {
        let Some(statement) = caps.get(0) else {
            continue;
        };
        let path = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map_or("", |m| m.as_str());

        out.push_str(&code[last..statement.start()]);
        out.push_str(&start_marker(path));
        out.push_str(statement.as_str());
        out.push_str(&end_marker());
        last = statement.end();
        count += 1;
    }
    out.push_str(&code[last..]);

    if count > 0 {
        crate::debug!("import"; "{}: marked {} @import", file.display(), count);
    }

    Marked { code: out, map }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_single_import() {
        let marked = mark_imports("@import \"sub/file.css\";\n.a{}", Path::new("main.css"), None);
        assert_eq!(
            marked.code,
            "/*start cssurl import path:sub/file.css*/@import \"sub/file.css\";/*end cssurl*/\n.a{}"
        );
        assert_eq!(marked.map, None);
    }

    #[test]
    fn test_mark_multiple_imports_and_quotes() {
        let src = "@import 'a.css';\n@import   \"b/c.css\" ;\n";
        let marked = mark_imports(src, Path::new("main.css"), Some("map".into()));
        assert_eq!(
            marked.code,
            "/*start cssurl import path:a.css*/@import 'a.css';/*end cssurl*/\n\
             /*start cssurl import path:b/c.css*/@import   \"b/c.css\" ;/*end cssurl*/\n"
        );
        assert_eq!(marked.map.as_deref(), Some("map"));
    }

    #[test]
    fn test_mark_ignores_mismatched_quotes_and_url_imports() {
        let src = "@import \"a.css';\n@import url(b.css);";
        let marked = mark_imports(src, Path::new("main.css"), None);
        assert_eq!(marked.code, src);
    }

    #[test]
    fn test_marker_recognition() {
        assert_eq!(
            start_marker_path("start cssurl import path:sub/file.css"),
            Some("sub/file.css")
        );
        assert_eq!(start_marker_path("plain comment"), None);
        assert!(is_end_marker("end cssurl"));
        assert!(is_end_marker(" end cssurl "));
        assert!(!is_end_marker("start cssurl import path:x.css"));
        assert!(!is_end_marker("plain comment"));
    }

    #[test]
    fn test_marker_lookalike_comments_are_plain() {
        assert!(!is_end_marker("append cssurl note"));
        assert!(!is_end_marker("end cssurl, then more"));
        assert_eq!(start_marker_path("see start cssurl import path:x.css"), None);
    }

    #[test]
    fn test_mark_skips_commented_and_quoted_imports() {
        let src = "/* @import \"old.css\"; */\n@import \"new.css\";\n.a { content: \"@import 'x.css';\"; }";
        let marked = mark_imports(src, Path::new("main.css"), None);
        assert_eq!(
            marked.code,
            "/* @import \"old.css\"; */\n\
             /*start cssurl import path:new.css*/@import \"new.css\";/*end cssurl*/\n\
             .a { content: \"@import 'x.css';\"; }"
        );
    }

    #[test]
    fn test_opaque_ranges() {
        let code = "a /* b */ 'c\\'d' \"e";
        let ranges = opaque_ranges(code);
        assert_eq!(ranges, vec![2..9, 10..16, 17..19]);
    }
}
