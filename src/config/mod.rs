//! Rewrite configuration, optionally loaded from `cssurl.toml`.
//!
//! # Example
//!
//! ```toml
//! img_output = "dist/img"         # absent: image references are left alone
//! font_output = "dist/fonts"      # absent: font references are left alone
//! css_output = "dist/css"         # base of rewritten relative paths
//! img_extensions = '\.(png|jpg|jpeg|gif|svg)$'
//! font_extensions = '\.(ttf|woff|woff2|eot)$'
//! limit = 8192                    # inline assets up to this many bytes
//! hash = false                    # name copies `stem-<hash>.ext`
//! slash = false                   # prefix rewritten paths with `./`
//! ```
//!
//! The camelCase spellings (`imgOutput`, `cssOutput`, ...) are accepted as
//! aliases. Relative paths are resolved against the working directory.

mod error;

pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError};

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Deserialize;

use crate::asset::AssetCategory;
use crate::log;
use crate::utils::path::absolutize;

/// Default image extension pattern.
pub const DEFAULT_IMG_EXTENSIONS: &str = r"\.(png|jpg|jpeg|gif|svg)$";
/// Default font extension pattern.
pub const DEFAULT_FONT_EXTENSIONS: &str = r"\.(ttf|woff|woff2|eot)$";
/// Default inline threshold in bytes.
pub const DEFAULT_LIMIT: u64 = 8192;

/// Default config file name.
pub const CONFIG_FILE: &str = "cssurl.toml";

// ============================================================================
// Raw TOML
// ============================================================================

/// Raw structure of `cssurl.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct CssUrlToml {
    #[serde(alias = "imgOutput")]
    img_output: Option<PathBuf>,
    #[serde(alias = "fontOutput")]
    font_output: Option<PathBuf>,
    #[serde(alias = "cssOutput")]
    css_output: Option<PathBuf>,
    #[serde(alias = "imgExtensions")]
    img_extensions: String,
    #[serde(alias = "fontExtensions")]
    font_extensions: String,
    limit: u64,
    hash: bool,
    slash: bool,
}

impl Default for CssUrlToml {
    fn default() -> Self {
        Self {
            img_output: None,
            font_output: None,
            css_output: None,
            img_extensions: DEFAULT_IMG_EXTENSIONS.into(),
            font_extensions: DEFAULT_FONT_EXTENSIONS.into(),
            limit: DEFAULT_LIMIT,
            hash: false,
            slash: false,
        }
    }
}

// ============================================================================
// UrlConfig
// ============================================================================

/// Validated rewrite configuration. All paths are absolute.
#[derive(Debug, Clone)]
pub struct UrlConfig {
    /// Output directory for images; `None` leaves image references untouched.
    pub img_output: Option<PathBuf>,
    /// Output directory for fonts; `None` leaves font references untouched.
    pub font_output: Option<PathBuf>,
    /// Directory the rewritten stylesheet is written to.
    pub css_output: Option<PathBuf>,
    pub img_extensions: Regex,
    pub font_extensions: Regex,
    /// Assets up to this size are inlined as data URIs.
    pub limit: u64,
    /// Append a content hash to copied filenames.
    pub hash: bool,
    /// Prefix rewritten relative paths with `./`.
    pub slash: bool,
    /// Base for relative config paths and the no-`css_output` fallback.
    pub work_dir: PathBuf,
}

impl UrlConfig {
    /// Defaults: nothing relocated, default patterns, 8 KiB limit.
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        let raw = CssUrlToml::default();
        Self {
            img_output: None,
            font_output: None,
            css_output: None,
            img_extensions: default_regex(DEFAULT_IMG_EXTENSIONS),
            font_extensions: default_regex(DEFAULT_FONT_EXTENSIONS),
            limit: raw.limit,
            hash: raw.hash,
            slash: raw.slash,
            work_dir: work_dir.into(),
        }
    }

    /// Load `path` if it exists, otherwise return defaults.
    ///
    /// The flag tells whether a file was read.
    pub fn load(path: &Path, work_dir: &Path) -> Result<(Self, bool), ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok((Self::new(work_dir), false));
            }
            Err(e) => return Err(ConfigError::Io(path.to_path_buf(), e)),
        };

        let (raw, ignored) = parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            print_unknown_fields_warning(&ignored, path);
        }

        Ok((Self::from_raw(raw, work_dir)?, true))
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str, work_dir: &Path) -> Result<Self, ConfigError> {
        let (raw, _) = parse_with_ignored(content)?;
        Self::from_raw(raw, work_dir)
    }

    fn from_raw(raw: CssUrlToml, work_dir: &Path) -> Result<Self, ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        let img_extensions = compile_pattern("img_extensions", &raw.img_extensions, &mut diag);
        let font_extensions = compile_pattern("font_extensions", &raw.font_extensions, &mut diag);
        diag.into_result()?;

        let resolve = |p: Option<PathBuf>| p.map(|p| absolutize(&p, work_dir));
        Ok(Self {
            img_output: resolve(raw.img_output),
            font_output: resolve(raw.font_output),
            css_output: resolve(raw.css_output),
            img_extensions: img_extensions.unwrap_or_else(|| default_regex(DEFAULT_IMG_EXTENSIONS)),
            font_extensions: font_extensions
                .unwrap_or_else(|| default_regex(DEFAULT_FONT_EXTENSIONS)),
            limit: raw.limit,
            hash: raw.hash,
            slash: raw.slash,
            work_dir: work_dir.to_path_buf(),
        })
    }

    /// Set an output directory, resolving it against the working directory.
    pub fn set_output(&mut self, category: AssetCategory, dir: &Path) {
        let dir = absolutize(dir, &self.work_dir);
        match category {
            AssetCategory::Image => self.img_output = Some(dir),
            AssetCategory::Font => self.font_output = Some(dir),
            AssetCategory::Unsupported => {}
        }
    }

    pub fn set_css_output(&mut self, dir: &Path) {
        self.css_output = Some(absolutize(dir, &self.work_dir));
    }

    pub fn category_of(&self, path: &str) -> AssetCategory {
        AssetCategory::classify(path, &self.img_extensions, &self.font_extensions)
    }

    /// Output directory configured for a category.
    pub fn output_dir(&self, category: AssetCategory) -> Option<&Path> {
        match category {
            AssetCategory::Image => self.img_output.as_deref(),
            AssetCategory::Font => self.font_output.as_deref(),
            AssetCategory::Unsupported => None,
        }
    }

    /// Category and output directory for a reference path, or `None` when the
    /// reference should be left unmodified.
    pub fn route(&self, path: &str) -> Option<(AssetCategory, &Path)> {
        let category = self.category_of(path);
        self.output_dir(category).map(|dir| (category, dir))
    }
}

/// Patterns are built from constants, compilation cannot fail.
fn default_regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid default pattern")
}

fn compile_pattern(
    field: &'static str,
    pattern: &str,
    diag: &mut ConfigDiagnostics,
) -> Option<Regex> {
    if pattern.is_empty() {
        diag.error_with_hint(
            field,
            "pattern is empty and would match every path",
            format!("remove the field to use the default `{}`", default_for(field)),
        );
        return None;
    }
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(err) => {
            diag.error(field, format!("invalid regular expression: {err}"));
            None
        }
    }
}

fn default_for(field: &str) -> &'static str {
    if field == "font_extensions" {
        DEFAULT_FONT_EXTENSIONS
    } else {
        DEFAULT_IMG_EXTENSIONS
    }
}

/// Parse TOML content, collecting any unknown fields.
fn parse_with_ignored(content: &str) -> Result<(CssUrlToml, Vec<String>), ConfigError> {
    let mut ignored = Vec::new();
    let deserializer = toml::Deserializer::new(content);
    let raw = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
        ignored.push(path.to_string());
    })?;
    Ok((raw, ignored))
}

/// Print warning about unknown fields.
fn print_unknown_fields_warning(fields: &[String], path: &Path) {
    let display_path = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_else(|| path.to_string_lossy());
    log!("warning"; "unknown fields in {}, ignoring:", display_path);
    for field in fields {
        eprintln!("- {}", field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = UrlConfig::new("/work");
        assert_eq!(config.limit, 8192);
        assert!(!config.hash);
        assert!(!config.slash);
        assert!(config.route("a.png").is_none());
        assert_eq!(config.category_of("a.png"), AssetCategory::Image);
        assert_eq!(config.category_of("a.woff"), AssetCategory::Font);
    }

    #[test]
    fn test_from_toml_resolves_paths() {
        let config = UrlConfig::from_toml(
            "img_output = \"dist/img\"\nfont_output = \"/abs/fonts\"\nlimit = 10\nhash = true",
            Path::new("/work"),
        )
        .unwrap();
        assert_eq!(config.img_output, Some(PathBuf::from("/work/dist/img")));
        assert_eq!(config.font_output, Some(PathBuf::from("/abs/fonts")));
        assert_eq!(config.limit, 10);
        assert!(config.hash);

        let (category, dir) = config.route("x/y.gif").unwrap();
        assert_eq!(category, AssetCategory::Image);
        assert_eq!(dir, Path::new("/work/dist/img"));
    }

    #[test]
    fn test_camel_case_aliases() {
        let config = UrlConfig::from_toml(
            "imgOutput = \"img\"\ncssOutput = \"css\"\nfontExtensions = '\\.otf$'",
            Path::new("/work"),
        )
        .unwrap();
        assert_eq!(config.img_output, Some(PathBuf::from("/work/img")));
        assert_eq!(config.css_output, Some(PathBuf::from("/work/css")));
        assert_eq!(config.category_of("a.otf"), AssetCategory::Font);
        assert_eq!(config.category_of("a.woff"), AssetCategory::Unsupported);
    }

    #[test]
    fn test_invalid_patterns_are_diagnosed() {
        let err = UrlConfig::from_toml(
            "img_extensions = '(unclosed'\nfont_extensions = ''",
            Path::new("/work"),
        )
        .unwrap_err();
        match err {
            ConfigError::Diagnostics(diag) => {
                assert_eq!(diag.len(), 2);
                assert_eq!(diag.errors()[0].field, "img_extensions");
                assert_eq!(diag.errors()[1].field, "font_extensions");
            }
            other => panic!("expected diagnostics, got {other:?}"),
        }
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let (config, found) = UrlConfig::load(&dir.path().join(CONFIG_FILE), dir.path()).unwrap();
        assert!(!found);
        assert_eq!(config.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn test_load_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "slash = true\nunknown_key = 1\n").unwrap();

        let (config, found) = UrlConfig::load(&path, dir.path()).unwrap();
        assert!(found);
        assert!(config.slash);
    }

    #[test]
    fn test_malformed_toml() {
        let err = UrlConfig::from_toml("limit = \"big\"", Path::new("/work")).unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_set_output() {
        let mut config = UrlConfig::new("/work");
        config.set_output(AssetCategory::Font, Path::new("out/fonts"));
        config.set_css_output(Path::new("out"));
        assert_eq!(config.output_dir(AssetCategory::Font), Some(Path::new("/work/out/fonts")));
        assert_eq!(config.css_output, Some(PathBuf::from("/work/out")));
    }
}
