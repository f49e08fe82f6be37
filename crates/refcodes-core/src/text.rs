// crates/refcodes-core/src/text.rs

/// Convert a string into a folded key suitable for indexing and comparison.
///
/// This performs:
/// 1) Transliterate Unicode → ASCII (e.g. `Łódź` -> `Lodz`)
/// 2) Normalize to lowercase
///
/// The implementation uses the `deunicode` crate to perform a best-effort
/// transliteration from Unicode to ASCII, which covers the diacritics that
/// occur in the ISO name columns (e.g. `"Bulqizë"` -> `"bulqize"`,
/// `"Curaçao"` -> `"curacao"`).
pub fn fold_key(s: &str) -> String {
    deunicode::deunicode(s).to_lowercase()
}

/// Normalize a user-entered search query: trim, then fold.
///
/// All fuzzy-search passes compare against [`fold_key`]-normalized field
/// values, so the query has to go through the same folding.
pub fn fold_query(s: &str) -> String {
    fold_key(s.trim())
}

/// Compares two strings for equality after Unicode folding and lowercasing.
pub fn equals_folded(a: &str, b: &str) -> bool {
    fold_key(a) == fold_key(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_case_and_diacritics() {
        assert_eq!(fold_key("Łódź"), "lodz");
        assert_eq!(fold_key("Curaçao"), "curacao");
        assert_eq!(fold_key("GERMANY"), "germany");
    }

    #[test]
    fn query_is_trimmed() {
        assert_eq!(fold_query("  Bulqizë "), "bulqize");
    }

    #[test]
    fn folded_equality() {
        assert!(equals_folded("Côte d'Ivoire", "cote d'ivoire"));
        assert!(!equals_folded("Germany", "France"));
    }
}
