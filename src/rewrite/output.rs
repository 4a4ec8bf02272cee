//! Output path computer: the path text embedded in a relocated reference.

use std::path::Path;

use crate::debug;
use crate::utils::path::{relative_to, to_slash};

/// Path of `dest` as written into the rewritten stylesheet.
///
/// With a CSS output directory the path is relative to it. Without one, the
/// path relative to `work_dir` loses its first segment, which assumes a
/// single-level output root such as `dist/`.
pub fn reference_path(dest: &Path, css_output: Option<&Path>, work_dir: &Path) -> String {
    match css_output {
        Some(css_dir) => to_slash(&relative_to(dest, css_dir)),
        None => {
            let rel = to_slash(&relative_to(dest, work_dir));
            debug!("output"; "no css_output, stripping first segment of {}", rel);
            strip_first_segment(&rel).to_string()
        }
    }
}

fn strip_first_segment(path: &str) -> &str {
    path.split_once('/').map_or(path, |(_, rest)| rest)
}
