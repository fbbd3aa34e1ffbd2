//! Text normalisation shared by the detectors.

/// Lowercases `text` and folds typographic apostrophes to `'`.
pub(super) fn normalise(text: &str) -> String {
    text.to_lowercase().replace(['\u{2019}', '\u{2018}', '\u{02bc}'], "'")
}

/// Returns the phrases from `phrases` that occur in `haystack`, in list
/// order.
pub(super) fn matching<'a>(haystack: &str, phrases: &[&'a str]) -> Vec<&'a str> {
    phrases
        .iter()
        .copied()
        .filter(|phrase| haystack.contains(phrase))
        .collect()
}
