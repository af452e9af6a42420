//! Text manipulation utilities for TUI input handling.
//!
//! Pure functions for splitting the query text into whitespace-delimited
//! tokens. The widget only ever edits at the end of the text, so most of
//! these look at the trailing token.

/// Splits `text` on runs of whitespace.
///
/// Leading or trailing whitespace yields an empty first or last piece, so
/// `"a b "` splits into `["a", "b", ""]` and the empty string splits into
/// `[""]`. The result is never empty.
pub fn split_whitespace_runs(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_whitespace = false;

    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if !in_whitespace {
                parts.push(&text[start..i]);
                in_whitespace = true;
            }
        } else if in_whitespace {
            start = i;
            in_whitespace = false;
        }
    }

    parts.push(if in_whitespace { "" } else { &text[start..] });
    parts
}

/// Returns the trailing token: everything after the last whitespace char.
///
/// Empty when the text is empty or ends in whitespace.
pub fn trailing_token(text: &str) -> &str {
    text.rsplit(char::is_whitespace).next().unwrap_or_default()
}

/// Find the start position of the word before the cursor.
///
/// Words are delimited by whitespace; punctuation is part of the word.
/// Positions are character indices. Returns 0 if only whitespace precedes
/// the cursor.
pub fn find_word_start_backward(text: &str, cursor: usize) -> usize {
    let chars: Vec<char> = text.chars().collect();
    let mut pos = cursor.min(chars.len());

    while pos > 0 && chars.get(pos - 1).is_some_and(|c| c.is_whitespace()) {
        pos -= 1;
    }

    while pos > 0 && chars.get(pos - 1).is_some_and(|c| !c.is_whitespace()) {
        pos -= 1;
    }

    pos
}

/// Returns `text` with its last word (and any whitespace after it) removed.
pub fn without_last_word(text: &str) -> String {
    let keep = find_word_start_backward(text, text.chars().count());
    text.chars().take(keep).collect()
}

/// Returns `text` with its last character removed.
pub fn without_last_char(text: &str) -> String {
    let mut chars = text.chars();
    chars.next_back();
    chars.as_str().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_single_word() {
        assert_eq!(split_whitespace_runs("reclamos"), vec!["reclamos"]);
    }

    #[test]
    fn split_collapses_runs() {
        assert_eq!(split_whitespace_runs("a  \t b"), vec!["a", "b"]);
    }

    #[test]
    fn split_trailing_whitespace_gives_empty_last() {
        assert_eq!(split_whitespace_runs("reclamos "), vec!["reclamos", ""]);
    }

    #[test]
    fn split_leading_whitespace_gives_empty_first() {
        assert_eq!(split_whitespace_runs("  zona"), vec!["", "zona"]);
    }

    #[test]
    fn split_empty_string() {
        assert_eq!(split_whitespace_runs(""), vec![""]);
    }

    #[test]
    fn trailing_token_basic() {
        assert_eq!(trailing_token("reclamos estad"), "estad");
        assert_eq!(trailing_token("reclamos.est"), "reclamos.est");
    }

    #[test]
    fn trailing_token_after_space_is_empty() {
        assert_eq!(trailing_token("reclamos "), "");
        assert_eq!(trailing_token(""), "");
    }

    #[test]
    fn find_word_start_at_end_of_word() {
        assert_eq!(find_word_start_backward("hello world", 11), 6);
    }

    #[test]
    fn find_word_start_with_trailing_spaces() {
        assert_eq!(find_word_start_backward("hello   ", 8), 0);
    }

    #[test]
    fn find_word_start_with_punctuation() {
        assert_eq!(find_word_start_backward("zona.nombre = 'x'", 17), 14);
    }

    #[test]
    fn find_word_start_unicode() {
        assert_eq!(find_word_start_backward("hola señor", 10), 5);
    }

    #[test]
    fn without_last_word_keeps_separator() {
        assert_eq!(without_last_word("reclamos zona.nom"), "reclamos ");
        assert_eq!(without_last_word("reclamos "), "");
        assert_eq!(without_last_word(""), "");
    }

    #[test]
    fn without_last_char_handles_multibyte() {
        assert_eq!(without_last_char("año"), "añ");
        assert_eq!(without_last_char("ñ"), "");
        assert_eq!(without_last_char(""), "");
    }
}
