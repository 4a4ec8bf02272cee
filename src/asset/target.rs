//! Asset files resolved on disk.

use std::fs;
use std::path::PathBuf;

use crate::rewrite::RewriteError;

/// A stat'ed asset. Resolved fresh for every reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetTarget {
    /// Absolute path of the source file.
    pub path: PathBuf,
    /// Size in bytes at the time of resolution.
    pub size: u64,
    /// Extension without the dot, as written.
    pub extension: String,
}

impl AssetTarget {
    /// Stat `path`. A missing or unreadable file is fatal.
    pub fn resolve(path: PathBuf) -> Result<Self, RewriteError> {
        let metadata = fs::metadata(&path).map_err(|source| RewriteError::Asset {
            path: path.clone(),
            source,
        })?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_string();

        Ok(Self {
            path,
            size: metadata.len(),
            extension,
        })
    }

    /// Read the whole file.
    pub fn read(&self) -> Result<Vec<u8>, RewriteError> {
        fs::read(&self.path).map_err(|source| RewriteError::Asset {
            path: self.path.clone(),
            source,
        })
    }

    /// File name without the extension.
    pub fn stem(&self) -> &str {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    }

    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    }
}
