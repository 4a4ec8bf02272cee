//! Node types of the stylesheet tree.

use std::path::{Path, PathBuf};

/// Discriminant of a [`StyleNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Rule,
    AtRule,
    Decl,
    Comment,
}

/// `selector { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub selector: String,
    pub nodes: Vec<StyleNode>,
}

/// `@name params;` or `@name params { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtRule {
    pub name: String,
    pub params: String,
    /// `None` for statement at-rules such as `@import` or `@charset`.
    pub nodes: Option<Vec<StyleNode>>,
}

/// `prop: value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decl {
    pub prop: String,
    pub value: String,
}

/// `/* text */`, text stored trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
}

/// A node of the stylesheet tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleNode {
    Rule(Rule),
    AtRule(AtRule),
    Decl(Decl),
    Comment(Comment),
}

impl StyleNode {
    pub fn rule(selector: impl Into<String>, nodes: Vec<StyleNode>) -> Self {
        Self::Rule(Rule {
            selector: selector.into(),
            nodes,
        })
    }

    pub fn at_rule(
        name: impl Into<String>,
        params: impl Into<String>,
        nodes: Option<Vec<StyleNode>>,
    ) -> Self {
        Self::AtRule(AtRule {
            name: name.into(),
            params: params.into(),
            nodes,
        })
    }

    pub fn decl(prop: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Decl(Decl {
            prop: prop.into(),
            value: value.into(),
        })
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Self::Comment(Comment { text: text.into() })
    }

    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Rule(_) => NodeKind::Rule,
            Self::AtRule(_) => NodeKind::AtRule,
            Self::Decl(_) => NodeKind::Decl,
            Self::Comment(_) => NodeKind::Comment,
        }
    }

    /// Declaration value, the only place `url()` references live.
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Decl(decl) => Some(&decl.value),
            _ => None,
        }
    }

    pub fn value_mut(&mut self) -> Option<&mut String> {
        match self {
            Self::Decl(decl) => Some(&mut decl.value),
            _ => None,
        }
    }

    /// Comment text.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Comment(comment) => Some(&comment.text),
            _ => None,
        }
    }

    /// Child list of rules and block at-rules.
    pub fn nodes(&self) -> Option<&[StyleNode]> {
        match self {
            Self::Rule(rule) => Some(&rule.nodes),
            Self::AtRule(at) => at.nodes.as_deref(),
            _ => None,
        }
    }

    pub fn nodes_mut(&mut self) -> Option<&mut Vec<StyleNode>> {
        match self {
            Self::Rule(rule) => Some(&mut rule.nodes),
            Self::AtRule(at) => at.nodes.as_mut(),
            _ => None,
        }
    }
}

/// Root of a parsed stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Root {
    pub nodes: Vec<StyleNode>,
    /// Absolute path of the file the tree was parsed from.
    pub source: Option<PathBuf>,
}

impl Root {
    pub fn new(nodes: Vec<StyleNode>, source: Option<PathBuf>) -> Self {
        Self { nodes, source }
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}
