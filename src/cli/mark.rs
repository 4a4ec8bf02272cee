//! `cssurl mark`: show what the import preprocessor does to a file.

use crate::import::mark_imports;
use anyhow::{Context, Result};
use std::{
    fs,
    io::{Write, stdout},
    path::Path,
};

pub fn mark(input: &Path) -> Result<()> {
    let code = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let marked = mark_imports(&code, input, None);

    let mut out = stdout().lock();
    out.write_all(marked.code.as_bytes())
        .context("failed to write to stdout")?;
    out.flush().context("failed to write to stdout")
}
