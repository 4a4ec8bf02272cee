//! Stylesheet syntax tree.
//!
//! The rewrite core only needs a tree of rules, at-rules, declarations and
//! comments whose `value` fields can be edited in place. `parse` and `print`
//! are a lenient round trip for the command-line pipeline; they do not
//! validate syntax.

mod node;
mod parse;
mod print;

pub use node::{AtRule, Comment, Decl, NodeKind, Root, Rule, StyleNode};
pub use parse::parse;
pub use print::print;
