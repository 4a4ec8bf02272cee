//! Lenient stylesheet parser.
//!
//! Splits source text into rules, at-rules, declarations and comments.
//! String literals, comments and parenthesised groups are opaque, so a `;`
//! inside `url(data:image/png;base64,...)` never ends a declaration.
//! Malformed input does not fail: unterminated blocks close at end of input.

use std::path::Path;

use super::node::{Root, StyleNode};

/// Parse stylesheet source into a tree.
pub fn parse(source: &str, file: Option<&Path>) -> Root {
    let mut parser = Parser {
        src: source,
        pos: 0,
    };
    let nodes = parser.parse_nodes(false);
    Root::new(nodes, file.map(Path::to_path_buf))
}

/// What ended a prelude scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
    Block,
    Semicolon,
    Close,
    Eof,
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn bytes(&self) -> &[u8] {
        self.src.as_bytes()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes().get(self.pos).copied()
    }

    fn starts_with(&self, pat: &str) -> bool {
        self.bytes()[self.pos..].starts_with(pat.as_bytes())
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Parse a node list until `}` (when `nested`) or end of input.
    fn parse_nodes(&mut self, nested: bool) -> Vec<StyleNode> {
        let mut nodes = Vec::new();
        loop {
            self.skip_whitespace();
            let Some(byte) = self.peek() else {
                break;
            };

            if self.starts_with("/*") {
                nodes.push(self.comment());
                continue;
            }

            match byte {
                b'}' => {
                    self.pos += 1;
                    if nested {
                        break;
                    }
                    // Stray `}` at top level
                    continue;
                }
                b';' => {
                    self.pos += 1;
                    continue;
                }
                _ => {}
            }

            let start = self.pos;
            let terminator = self.scan_prelude();
            let prelude = self.src[start..self.pos].trim();

            match terminator {
                Terminator::Block => {
                    self.pos += 1;
                    let children = self.parse_nodes(true);
                    nodes.push(block_node(prelude, children));
                }
                Terminator::Semicolon => {
                    self.pos += 1;
                    nodes.extend(statement_node(prelude));
                }
                // `}` is left for the enclosing loop
                Terminator::Close | Terminator::Eof => nodes.extend(statement_node(prelude)),
            }
        }
        nodes
    }

    /// Consume `/* ... */`. An unterminated comment runs to end of input.
    fn comment(&mut self) -> StyleNode {
        let body_start = self.pos + 2;
        let (body_end, next) = match self.src[body_start..].find("*/") {
            Some(offset) => (body_start + offset, body_start + offset + 2),
            None => (self.src.len(), self.src.len()),
        };
        self.pos = next;
        StyleNode::comment(self.src[body_start..body_end].trim())
    }

    /// Advance to the next `{`, `;` or `}` outside strings, comments and parens.
    fn scan_prelude(&mut self) -> Terminator {
        let mut depth = 0usize;
        while let Some(byte) = self.peek() {
            match byte {
                b'"' | b'\'' => self.skip_string(byte),
                b'\\' => self.pos = (self.pos + 2).min(self.src.len()),
                b'/' if self.starts_with("/*") => {
                    self.pos = match self.src[self.pos + 2..].find("*/") {
                        Some(offset) => self.pos + 2 + offset + 2,
                        None => self.src.len(),
                    };
                }
                b'(' => {
                    depth += 1;
                    self.pos += 1;
                }
                b')' => {
                    depth = depth.saturating_sub(1);
                    self.pos += 1;
                }
                b'{' if depth == 0 => return Terminator::Block,
                b';' if depth == 0 => return Terminator::Semicolon,
                b'}' if depth == 0 => return Terminator::Close,
                _ => self.pos += 1,
            }
        }
        Terminator::Eof
    }

    /// Skip a quoted string starting at the opening quote.
    fn skip_string(&mut self, quote: u8) {
        self.pos += 1;
        while let Some(byte) = self.peek() {
            self.pos += 1;
            if byte == b'\\' {
                self.pos = self.pos.saturating_add(1).min(self.src.len());
            } else if byte == quote {
                return;
            }
        }
    }
}

fn split_at_rule(prelude: &str) -> (&str, &str) {
    let body = &prelude[1..];
    let end = body
        .find(|c: char| c.is_ascii_whitespace() || c == '(' || c == '"' || c == '\'')
        .unwrap_or(body.len());
    (&body[..end], body[end..].trim())
}

fn block_node(prelude: &str, children: Vec<StyleNode>) -> StyleNode {
    if prelude.starts_with('@') {
        let (name, params) = split_at_rule(prelude);
        StyleNode::at_rule(name, params, Some(children))
    } else {
        StyleNode::rule(prelude, children)
    }
}

fn statement_node(prelude: &str) -> Option<StyleNode> {
    if prelude.is_empty() {
        return None;
    }
    if prelude.starts_with('@') {
        let (name, params) = split_at_rule(prelude);
        return Some(StyleNode::at_rule(name, params, None));
    }
    Some(match prelude.split_once(':') {
        Some((prop, value)) => StyleNode::decl(prop.trim(), value.trim()),
        None => StyleNode::decl(prelude, ""),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::NodeKind;

    #[test]
    fn test_parse_rule_with_declarations() {
        let root = parse(".a { color: red; background: url('x.png') }", None);
        assert_eq!(root.nodes.len(), 1);
        let rule = &root.nodes[0];
        assert_eq!(rule.kind(), NodeKind::Rule);
        let decls = rule.nodes().unwrap();
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[1].value(), Some("url('x.png')"));
    }

    #[test]
    fn test_parse_semicolon_inside_url_does_not_split() {
        let root = parse(".a{background:url(data:image/png;base64,AAA=)}", None);
        let decls = root.nodes[0].nodes().unwrap();
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].value(), Some("url(data:image/png;base64,AAA=)"));
    }

    #[test]
    fn test_parse_comments_and_statements() {
        let src = "/*start x*/\n@import \"a.css\";\n/*end x*/\n@charset 'utf-8';";
        let root = parse(src, Some(Path::new("/site/main.css")));
        let kinds: Vec<_> = root.nodes.iter().map(StyleNode::kind).collect();
        assert_eq!(
            kinds,
            [NodeKind::Comment, NodeKind::AtRule, NodeKind::Comment, NodeKind::AtRule]
        );
        assert_eq!(root.nodes[0].text(), Some("start x"));
        assert_eq!(root.source(), Some(Path::new("/site/main.css")));
        match &root.nodes[1] {
            StyleNode::AtRule(at) => {
                assert_eq!(at.name, "import");
                assert_eq!(at.params, "\"a.css\"");
                assert!(at.nodes.is_none());
            }
            other => panic!("expected at-rule, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_nested_at_rule() {
        let src = "@media (min-width: 10px) { .b { background: url(b.png); } }";
        let root = parse(src, None);
        let StyleNode::AtRule(media) = &root.nodes[0] else {
            panic!("expected @media");
        };
        assert_eq!(media.name, "media");
        assert_eq!(media.params, "(min-width: 10px)");
        let inner = media.nodes.as_ref().unwrap();
        assert_eq!(inner[0].nodes().unwrap()[0].value(), Some("url(b.png)"));
    }

    #[test]
    fn test_parse_unterminated_input_is_lenient() {
        let root = parse(".a { color: red", None);
        assert_eq!(root.nodes[0].nodes().unwrap()[0].value(), Some("red"));

        let root = parse("/* open", None);
        assert_eq!(root.nodes[0].text(), Some("open"));
    }
}
