//! URL text classification.

/// Whether `reference` starts with a protocol scheme (`http:`, `data:`, ...)
/// or is protocol-relative (`//host/...`).
///
/// Single-letter schemes are rejected so Windows drive paths (`C:\a.png`)
/// stay filesystem paths.
pub fn has_scheme(reference: &str) -> bool {
    let reference = reference.trim_start();
    if reference.starts_with("//") {
        return true;
    }

    let mut chars = reference.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    for (idx, c) in chars {
        match c {
            ':' => return idx >= 2,
            c if c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.') => {}
            _ => return false,
        }
    }
    false
}

/// Split `path?query#fragment` into the filesystem part and the suffix.
///
/// Fonts are commonly referenced as `icon.woff2?v=2#iefix`; the suffix is
/// kept verbatim in rewritten references.
pub fn split_suffix(reference: &str) -> (&str, &str) {
    match reference.find(['?', '#']) {
        Some(idx) => reference.split_at(idx),
        None => (reference, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_scheme() {
        assert!(has_scheme("http://example.com/a.png"));
        assert!(has_scheme("  https://example.com/a.png"));
        assert!(has_scheme("data:image/png;base64,AAAA"));
        assert!(has_scheme("//cdn.example.com/a.png"));
        assert!(has_scheme("blob:xyz"));
        assert!(!has_scheme("img/a.png"));
        assert!(!has_scheme("../a.png"));
        assert!(!has_scheme("/abs/a.png"));
        assert!(!has_scheme("C:\\img\\a.png"));
        assert!(!has_scheme("#filter"));
        assert!(!has_scheme(""));
    }

    #[test]
    fn test_split_suffix() {
        assert_eq!(split_suffix("icon.woff2?v=2#fix"), ("icon.woff2", "?v=2#fix"));
        assert_eq!(split_suffix("font.eot#iefix"), ("font.eot", "#iefix"));
        assert_eq!(split_suffix("a.png"), ("a.png", ""));
    }
}
