//! Assets behind `url()` references.
//!
//! - [`AssetCategory`]: image / font / unsupported classification
//! - [`AssetTarget`]: a stat'ed file on disk
//! - [`output_name`]: basename or content-hashed basename
//! - [`PendingWrites`]: background copies the caller must wait on
//! - [`CopyRegistry`]: destination claims shared across pending sets

mod kind;
mod name;
mod pending;
mod target;

pub use kind::AssetCategory;
pub use name::output_name;
pub use pending::{CopyRegistry, PendingWrites};
pub use target::AssetTarget;
