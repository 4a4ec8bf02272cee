//! Asset category definitions.

use regex::Regex;

/// Category of an asset, selecting its output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetCategory {
    Image,
    Font,
    /// Matches neither pattern; the reference is left alone.
    Unsupported,
}

impl AssetCategory {
    /// Classify a reference path (query/fragment already stripped).
    ///
    /// Image patterns win when both match.
    pub fn classify(path: &str, images: &Regex, fonts: &Regex) -> Self {
        if images.is_match(path) {
            Self::Image
        } else if fonts.is_match(path) {
            Self::Font
        } else {
            Self::Unsupported
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Font => "font",
            Self::Unsupported => "unsupported",
        }
    }
}

impl std::fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        let images = Regex::new(r"\.(png|jpg|jpeg|gif|svg)$").unwrap();
        let fonts = Regex::new(r"\.(ttf|woff|woff2|eot)$").unwrap();

        assert_eq!(AssetCategory::classify("a/b.png", &images, &fonts), AssetCategory::Image);
        assert_eq!(AssetCategory::classify("icon.woff2", &images, &fonts), AssetCategory::Font);
        assert_eq!(
            AssetCategory::classify("movie.mp4", &images, &fonts),
            AssetCategory::Unsupported
        );
        assert_eq!(
            AssetCategory::classify("png", &images, &fonts),
            AssetCategory::Unsupported
        );
    }
}
