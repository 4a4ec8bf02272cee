//! Output filenames for relocated assets.

use super::AssetTarget;
use crate::utils::hash::ContentHash;

/// `name.ext`, or `name-<hash>.ext` when a content hash is given.
pub fn output_name(target: &AssetTarget, hash: Option<ContentHash>) -> String {
    match hash {
        None => target.file_name().to_string(),
        Some(hash) if target.extension.is_empty() => format!("{}-{}", target.stem(), hash),
        Some(hash) => format!("{}-{}.{}", target.stem(), hash, target.extension),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn target(path: &str) -> AssetTarget {
        let path = PathBuf::from(path);
        AssetTarget {
            extension: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or_default()
                .to_string(),
            path,
            size: 0,
        }
    }

    #[test]
    fn test_plain_name() {
        assert_eq!(output_name(&target("/src/img/bg.png"), None), "bg.png");
    }

    #[test]
    fn test_hashed_name() {
        let hash = ContentHash::of(b"pixels");
        let name = output_name(&target("/src/img/bg.min.png"), Some(hash));
        assert_eq!(name, format!("bg.min-{}.png", hash.fingerprint()));
    }

    #[test]
    fn test_hashed_name_without_extension() {
        let hash = ContentHash::of(b"pixels");
        assert_eq!(
            output_name(&target("/src/img/blob"), Some(hash)),
            format!("blob-{}", hash.fingerprint())
        );
    }
}
