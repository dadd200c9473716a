//! Small string helpers shared by the classifier, the state tracker and the
//! field parsers. Directory text is French, so matching folds accents.

use regex::Regex;
use std::sync::LazyLock;

static TRAILING_DIGITS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\s+\d+)+\s*$").unwrap());

/// Lower-case, strip French diacritics and turn hyphens into spaces.
///
/// Only used for comparisons: byte offsets in the folded string don't map
/// back onto the original.
pub fn fold(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| match c {
            'à' | 'â' | 'ä' | 'á' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'î' | 'ï' | 'í' => 'i',
            'ô' | 'ö' | 'ó' => 'o',
            'ù' | 'û' | 'ü' | 'ú' => 'u',
            'ç' => 'c',
            '-' => ' ',
            other => other,
        })
        .collect()
}

/// Lower-cased token with trailing list punctuation removed
pub fn normalize_token(token: &str) -> String {
    token
        .trim_end_matches([',', ';', ':'])
        .to_lowercase()
}

/// Whitespace token equal (case-insensitive) to `word`
pub fn has_token(line: &str, word: &str) -> bool {
    line.split_whitespace()
        .any(|token| normalize_token(token) == word)
}

/// Text after the last occurrence of `delimiter`, or the whole line
pub fn after_last(line: &str, delimiter: char) -> &str {
    match line.rfind(delimiter) {
        Some(index) => &line[index + delimiter.len_utf8()..],
        None => line,
    }
}

/// Text after the first occurrence of `delimiter`
pub fn after_first(line: &str, delimiter: char) -> Option<&str> {
    line.find(delimiter)
        .map(|index| &line[index + delimiter.len_utf8()..])
}

/// Drop a trailing run of space-separated digit groups (reference codes)
pub fn strip_trailing_digits(line: &str) -> String {
    TRAILING_DIGITS_REGEX.replace(line, "").trim().to_string()
}

pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Byte offset of the first `Tél` / `Tel` marker
pub fn phone_marker_index(line: &str) -> Option<usize> {
    [line.find("Tél"), line.find("Tel")]
        .into_iter()
        .flatten()
        .min()
}

pub fn has_phone_marker(line: &str) -> bool {
    phone_marker_index(line).is_some()
}

/// Byte offset of the first whitespace token holding an email or a `www` link
pub fn web_token_index(line: &str) -> Option<usize> {
    let mut offset = 0;
    for token in line.split_inclusive(char::is_whitespace) {
        let word = token.trim();
        if word.contains('@') || word.to_lowercase().starts_with("www") {
            return Some(offset);
        }
        offset += token.len();
    }
    None
}

pub fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_handles_accents_and_hyphens() {
        assert_eq!(fold("Kasaï-Oriental"), "kasai oriental");
        assert_eq!(fold("ÉQUATEUR"), "equateur");
    }

    #[test]
    fn test_strip_trailing_digits() {
        assert_eq!(strip_trailing_digits("ACME SARL 0123"), "ACME SARL");
        assert_eq!(strip_trailing_digits("ACME SARL 01 23 "), "ACME SARL");
        assert_eq!(strip_trailing_digits("3M CONGO"), "3M CONGO");
    }

    #[test]
    fn test_after_last_and_first() {
        assert_eq!(after_last("a: b: c", ':'), " c");
        assert_eq!(after_last("no colon", ':'), "no colon");
        assert_eq!(after_first("Nom: Jean: X", ':'), Some(" Jean: X"));
    }

    #[test]
    fn test_web_token_index() {
        let line = "Av. du Port 4 info@acme.cd";
        assert_eq!(web_token_index(line), Some(14));
        assert_eq!(&line[14..], "info@acme.cd");
        assert_eq!(web_token_index("Av. du Port 4"), None);
    }

    #[test]
    fn test_phone_marker_prefers_first() {
        assert_eq!(phone_marker_index("ACME Tél: 081"), Some(5));
        assert_eq!(phone_marker_index("Tel: 081 Tél"), Some(0));
    }

    #[test]
    fn test_has_token_trims_punctuation() {
        assert!(has_token("12, Av., Gombe", "av."));
        assert!(!has_token("Avenir SARL", "av"));
    }
}
