//! `@import` handling ahead of parsing.
//!
//! - [`marker`]: wraps each `@import` in provenance marker comments
//! - [`flatten`]: textually inlines imported files, marking them recursively

mod flatten;
mod marker;

pub use flatten::{FlattenError, flatten};
pub use marker::{
    FLAG_END, FLAG_START, Marked, end_marker, is_end_marker, mark_imports, start_marker,
    start_marker_path,
};
