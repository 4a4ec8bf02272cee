//! Occurrence scanner for `url()` references.
//!
//! A small tokenizer over a declaration value. At each `url(` token the
//! quoted form is tried first, then the unquoted form. The cursor only moves
//! forward, so consumed text is never matched again and the loop is bounded
//! by the value length.

use std::ops::Range;

use crate::debug;
use crate::style::StyleNode;
use crate::utils::url::has_scheme;

const TOKEN: &[u8] = b"url(";

/// One `url()` occurrence inside a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlReference {
    /// Whole `url(...)` text.
    pub span: Range<usize>,
    /// Path text between the quotes or parentheses.
    pub path: Range<usize>,
    pub quoted: bool,
    /// Offset where scanning resumed after this match.
    pub resume: usize,
}

impl UrlReference {
    pub fn path_in<'a>(&self, value: &'a str) -> &'a str {
        &value[self.path.clone()]
    }

    pub fn text_in<'a>(&self, value: &'a str) -> &'a str {
        &value[self.span.clone()]
    }
}

/// Every filesystem `url()` reference of `value`, in order.
///
/// Empty paths and scheme-prefixed paths (`http:`, `data:`, `//cdn`) are
/// skipped.
pub fn scan_value(value: &str) -> Vec<UrlReference> {
    let bytes = value.as_bytes();
    let mut refs = Vec::new();
    let mut cursor = 0;

    for _ in 0..=bytes.len() {
        let Some(start) = find_token(bytes, cursor) else {
            break;
        };
        let open = start + TOKEN.len();

        let Some((path, end, quoted)) =
            match_quoted(bytes, open).or_else(|| match_unquoted(bytes, open))
        else {
            cursor = open;
            continue;
        };
        cursor = end;

        let reference = UrlReference {
            span: start..end,
            path,
            quoted,
            resume: end,
        };
        let text = reference.path_in(value);
        if text.is_empty() {
            continue;
        }
        if has_scheme(text) {
            debug!("scan"; "skip {}", text);
            continue;
        }
        refs.push(reference);
    }

    refs
}

/// Visit every declaration value below `nodes`, depth first.
pub fn visit_values<E>(
    nodes: &mut [StyleNode],
    visit: &mut impl FnMut(&mut String) -> Result<(), E>,
) -> Result<(), E> {
    for node in nodes {
        if let Some(value) = node.value_mut() {
            visit(value)?;
        }
        if let Some(children) = node.nodes_mut() {
            visit_values(children, visit)?;
        }
    }
    Ok(())
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

/// Next `url(` at or after `from`, ASCII case-insensitive, not part of a
/// longer identifier.
fn find_token(bytes: &[u8], from: usize) -> Option<usize> {
    let last = bytes.len().checked_sub(TOKEN.len())?;
    (from..=last).find(|&i| {
        bytes[i..i + TOKEN.len()].eq_ignore_ascii_case(TOKEN)
            && (i == 0 || !is_ident_byte(bytes[i - 1]))
    })
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while bytes.get(i).is_some_and(|b| b.is_ascii_whitespace()) {
        i += 1;
    }
    i
}

/// `url( "path" )` / `url( 'path' )` starting after the `(`.
fn match_quoted(bytes: &[u8], open: usize) -> Option<(Range<usize>, usize, bool)> {
    let i = skip_whitespace(bytes, open);
    let quote = *bytes.get(i)?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }

    let body = i + 1;
    let mut j = body;
    while j < bytes.len() && bytes[j] != quote {
        if bytes[j] == b'\\' {
            j += 1;
        }
        j += 1;
    }
    if j >= bytes.len() {
        return None;
    }

    let close = skip_whitespace(bytes, j + 1);
    (bytes.get(close) == Some(&b')')).then(|| (body..j, close + 1, true))
}

/// `url(path)` with no quotes inside, starting after the `(`.
fn match_unquoted(bytes: &[u8], open: usize) -> Option<(Range<usize>, usize, bool)> {
    let close = open + bytes[open..].iter().position(|&b| b == b')')?;
    let inner = &bytes[open..close];
    if inner.iter().any(|&b| b == b'"' || b == b'\'') {
        return None;
    }

    let lead = inner.iter().take_while(|b| b.is_ascii_whitespace()).count();
    let trail = inner[lead..]
        .iter()
        .rev()
        .take_while(|b| b.is_ascii_whitespace())
        .count();
    Some((open + lead..close - trail, close + 1, false))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(value: &str) -> Vec<&str> {
        scan_value(value).iter().map(|r| r.path_in(value)).collect()
    }

    #[test]
    fn test_quoted_and_unquoted() {
        assert_eq!(paths("url('a.png')"), ["a.png"]);
        assert_eq!(paths("url(\"a b.png\")"), ["a b.png"]);
        assert_eq!(paths("url( a.png )"), ["a.png"]);
        assert_eq!(paths("URL(a.png)"), ["a.png"]);
    }

    #[test]
    fn test_multiple_references_in_order() {
        let value = "url(a.png), url('b.png') no-repeat, url(\"c.svg\")";
        assert_eq!(paths(value), ["a.png", "b.png", "c.svg"]);

        let spans: Vec<_> = scan_value(value).iter().map(|r| r.text_in(value).to_string()).collect();
        assert_eq!(spans, ["url(a.png)", "url('b.png')", "url(\"c.svg\")"]);
    }

    #[test]
    fn test_scheme_references_are_skipped() {
        assert!(paths("url(http://x.com/a.png)").is_empty());
        assert!(paths("url('https://x.com/a.png')").is_empty());
        assert!(paths("url(data:image/png;base64,AAAA)").is_empty());
        assert!(paths("url(//cdn.x.com/a.png)").is_empty());
        assert_eq!(paths("url(http://x.com/a.png), url(b.png)"), ["b.png"]);
    }

    #[test]
    fn test_ignores_other_functions_and_empty() {
        assert!(paths("myurl(a.png)").is_empty());
        assert!(paths("url()").is_empty());
        assert!(paths("url('')").is_empty());
        assert!(paths("red").is_empty());
    }

    #[test]
    fn test_malformed_does_not_loop() {
        assert!(paths("url(").is_empty());
        assert!(paths("url('a.png\"").is_empty());
        assert_eq!(paths("url('broken url(b.png)"), ["b.png"]);
        assert!(paths("url(url(url(").is_empty());
    }

    #[test]
    fn test_resume_offsets_advance() {
        let value = "url(a.png) url(a.png)";
        let refs = scan_value(value);
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].resume, 10);
        assert!(refs[1].span.start >= refs[0].resume);
    }

    #[test]
    fn test_visit_values_recurses() {
        let mut nodes = vec![StyleNode::at_rule(
            "media",
            "print",
            Some(vec![StyleNode::rule(
                ".a",
                vec![StyleNode::decl("background", "url(a.png)")],
            )]),
        )];
        let mut seen = Vec::new();
        visit_values::<()>(&mut nodes, &mut |value| {
            seen.push(value.clone());
            Ok(())
        })
        .unwrap();
        assert_eq!(seen, ["url(a.png)"]);
    }
}
