//! Shared helpers: MIME lookup, content hashing, path and URL text.

pub mod hash;
pub mod mime;
pub mod path;
mod plural;
pub mod url;

pub use plural::plural_count;
