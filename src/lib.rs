//! cssurl - rewrite `url()` references in stylesheets.
//!
//! Small assets are inlined as base64 data URIs, larger ones are copied to an
//! output directory (optionally under a content-hashed name) and the reference
//! is rewritten to point at the copy. Stylesheets pulled in through `@import`
//! keep resolving their assets relative to their own location.
//!
//! ```ignore
//! let mut root = style::parse(&code, Some(&path));
//! let outcome = rewrite::rewrite_root(&mut root, &config)?;
//! fs::write(dest, style::print(&root))?;
//! outcome.pending.wait()?;
//! ```

pub mod asset;
pub mod cli;
pub mod config;
pub mod import;
pub mod logger;
pub mod rewrite;
pub mod style;
pub mod utils;
