//! Phrase normalization.
//!
//! Turns a raw chat message into the canonical form used as a bucket key:
//! lowercase, punctuation stripped, whitespace collapsed. Deterministic and
//! total; an empty result means "not a vote" and the caller must skip it.

/// Normalize a raw phrase into its canonical bucket key.
///
/// Keeps only ASCII alphanumerics and whitespace, so "PIZZA!!" and
/// " pizza " both normalize to "pizza".
pub fn normalize_phrase(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let stripped: String = lowered
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize a chat username: trim and lowercase
pub fn normalize_username(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_trims() {
        assert_eq!(normalize_phrase("  Hello World  "), "hello world");
    }

    #[test]
    fn test_collapses_internal_whitespace() {
        assert_eq!(normalize_phrase("do   a\tbackflip"), "do a backflip");
    }

    #[test]
    fn test_strips_punctuation() {
        assert_eq!(normalize_phrase("PIZZA!!"), "pizza");
        assert_eq!(normalize_phrase("let's go!"), "lets go");
    }

    #[test]
    fn test_empty_and_whitespace_only() {
        assert_eq!(normalize_phrase(""), "");
        assert_eq!(normalize_phrase("   \t  "), "");
        assert_eq!(normalize_phrase("?!?!"), "");
    }

    #[test]
    fn test_keeps_digits() {
        assert_eq!(normalize_phrase("Sing 99 Bottles"), "sing 99 bottles");
    }

    #[test]
    fn test_username_normalization() {
        assert_eq!(normalize_username("  CoolViewer42 "), "coolviewer42");
    }
}
