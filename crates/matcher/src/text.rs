//! Text normalization shared by both scorers.

/// Trim surrounding whitespace and lower-case.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Whitespace-delimited tokens.
pub fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

/// Number of whitespace-delimited tokens. A rough usage measure, not a model
/// tokenizer count.
pub fn token_count(text: &str) -> usize {
    tokens(text).count()
}
