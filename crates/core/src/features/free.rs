//! Free features: read-only document statistics

/// Number of Unicode scalar values in `text`.
pub fn character_count(text: &str) -> usize {
    text.chars().count()
}

/// Number of whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(character_count(""), 0);
        assert_eq!(character_count("héllo"), 5);
    }

    #[test]
    fn counts_words_across_mixed_whitespace() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   "), 0);
        assert_eq!(word_count("one  two\tthree\nfour"), 4);
    }
}
