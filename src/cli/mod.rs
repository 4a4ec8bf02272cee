//! Command-line interface module.

mod args;
pub mod build;
pub mod mark;

pub use args::{BuildArgs, Cli, Commands};
