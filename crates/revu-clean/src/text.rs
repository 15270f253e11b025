//! Review text normalization.

/// Punctuation kept by [`normalize_text`] besides letters, digits,
/// whitespace, and the emoji range.
const KEPT_PUNCTUATION: &str = "/.,:)=(";

/// Normalize review text for downstream tokenization.
///
/// Periods that do not precede a digit are dropped, so "3.5" survives
/// while sentence-ending periods do not. The text is then lowercased and
/// every character outside the allow-list (ASCII letters and digits,
/// whitespace, U+263A..=U+1F9FF, and a small punctuation set) is removed.
pub fn normalize_text(text: &str) -> String {
    let mut kept = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '.' && !chars.peek().is_some_and(|next| next.is_ascii_digit()) {
            continue;
        }
        kept.push(ch);
    }
    kept.chars()
        .flat_map(char::to_lowercase)
        .filter(|ch| is_kept(*ch))
        .collect()
}

fn is_kept(ch: char) -> bool {
    ch.is_ascii_alphabetic()
        || ch.is_ascii_digit()
        || ch.is_whitespace()
        || ('\u{263A}'..='\u{1F9FF}').contains(&ch)
        || KEPT_PUNCTUATION.contains(ch)
}

/// Number of whitespace-delimited tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn periods_before_digits_survive() {
        assert_eq!(normalize_text("Rated 3.5 out of 5."), "rated 3.5 out of 5");
        assert_eq!(normalize_text("Version 1.0. Nice."), "version 1.0 nice");
    }

    #[test]
    fn disallowed_characters_are_removed() {
        assert_eq!(normalize_text("Great* game!!"), "great game");
        assert_eq!(normalize_text("A+ (mostly)"), "a (mostly)");
        assert_eq!(normalize_text("<MISSING>"), "missing");
    }

    #[test]
    fn emoji_in_range_are_kept() {
        assert_eq!(normalize_text("fun \u{1F600} times"), "fun \u{1F600} times");
    }

    #[test]
    fn word_count_splits_on_whitespace() {
        assert_eq!(word_count("two  words"), 2);
        assert_eq!(word_count("   "), 0);
        assert_eq!(word_count(""), 0);
    }
}
