//! Serialize a stylesheet tree back to text.

use std::fmt::Write as _;

use super::node::{Root, StyleNode};

const INDENT: &str = "  ";

/// Print a tree with two-space indentation, one node per line.
pub fn print(root: &Root) -> String {
    let mut out = String::new();
    write_nodes(&mut out, &root.nodes, 0);
    out
}

fn write_nodes(out: &mut String, nodes: &[StyleNode], depth: usize) {
    for node in nodes {
        write_node(out, node, depth);
    }
}

fn write_node(out: &mut String, node: &StyleNode, depth: usize) {
    let indent = INDENT.repeat(depth);
    match node {
        StyleNode::Comment(comment) => {
            let _ = writeln!(out, "{indent}/* {} */", comment.text);
        }
        StyleNode::Decl(decl) if decl.value.is_empty() => {
            let _ = writeln!(out, "{indent}{};", decl.prop);
        }
        StyleNode::Decl(decl) => {
            let _ = writeln!(out, "{indent}{}: {};", decl.prop, decl.value);
        }
        StyleNode::Rule(rule) => {
            let _ = writeln!(out, "{indent}{} {{", rule.selector);
            write_nodes(out, &rule.nodes, depth + 1);
            let _ = writeln!(out, "{indent}}}");
        }
        StyleNode::AtRule(at) => {
            let head = if at.params.is_empty() {
                format!("@{}", at.name)
            } else {
                format!("@{} {}", at.name, at.params)
            };
            match &at.nodes {
                Some(children) => {
                    let _ = writeln!(out, "{indent}{head} {{");
                    write_nodes(out, children, depth + 1);
                    let _ = writeln!(out, "{indent}}}");
                }
                None => {
                    let _ = writeln!(out, "{indent}{head};");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::parse;

    #[test]
    fn test_print_layout() {
        let root = parse(
            "@font-face{font-family:x;src:url(a.woff)}.a>b{color:red}@charset \"utf-8\";",
            None,
        );
        assert_eq!(
            print(&root),
            "@font-face {\n  font-family: x;\n  src: url(a.woff);\n}\n\
             .a>b {\n  color: red;\n}\n\
             @charset \"utf-8\";\n"
        );
    }

    #[test]
    fn test_print_nested_indent() {
        let root = parse("@media print { .a { color: red } }", None);
        assert_eq!(
            print(&root),
            "@media print {\n  .a {\n    color: red;\n  }\n}\n"
        );
    }
}
