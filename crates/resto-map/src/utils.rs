//! Name normalization and similarity scoring.

use rapidfuzz::fuzz;

/// Normalizes a column or feature name for comparison: lowercase, with
/// underscores, hyphens and spaces removed.
pub fn normalize_name(raw: &str) -> String {
    raw.chars()
        .filter(|ch| !matches!(ch, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Token-sort similarity on a 0-100 scale.
///
/// Both inputs are split on whitespace, the tokens sorted and re-joined with
/// single spaces, then compared with the normalized indel ratio.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    let a = sorted_tokens(a);
    let b = sorted_tokens(b);
    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    fuzz::ratio(a.chars(), b.chars()) * 100.0
}

fn sorted_tokens(raw: &str) -> String {
    let mut tokens: Vec<&str> = raw.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}
