/// Characters that are illegal in filenames on at least one common filesystem
const ILLEGAL_FILENAME_CHARS: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Sanitize filename for safe filesystem usage
///
/// Only the illegal characters are removed; spacing, case and length are kept.
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .filter(|c| !ILLEGAL_FILENAME_CHARS.contains(c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("A:B/C*D?"), "ABCD");
        assert_eq!(sanitize_filename(r#"a\b"c<d>e|f"#), "abcdef");
        assert_eq!(sanitize_filename("  Spaced  Out!  "), "  Spaced  Out!  ");
        assert_eq!(sanitize_filename("Ünïcödé — ok"), "Ünïcödé — ok");
        assert_eq!(sanitize_filename(""), "");
    }
}
