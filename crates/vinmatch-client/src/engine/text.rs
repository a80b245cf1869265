use std::ops::Range;

use regex::{Regex, RegexBuilder};

const PHRASE_TRIM: &[char] = &[',', ';', ':', '(', ')', '[', ']', '{', '}', '"'];

/// Case-insensitive whole-word matcher for a literal. The literal itself is
/// capture group 1 so callers can recover its exact span.
pub fn word_matcher(literal: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&format!(r"(?:^|\W)({})(?:\W|$)", regex::escape(literal)))
        .case_insensitive(true)
        .build()
}

pub fn word_span(matcher: &Regex, text: &str) -> Option<Range<usize>> {
    matcher
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|found| found.range())
}

pub fn locate_literal(text: &str, literal: &str) -> Option<Range<usize>> {
    if literal.trim().is_empty() {
        return None;
    }
    let matcher = word_matcher(literal).ok()?;
    word_span(&matcher, text)
}

/// Removes every span from `text` and collapses the remaining whitespace.
pub fn excise(text: &str, spans: &[Range<usize>]) -> String {
    let mut ordered = spans
        .iter()
        .filter(|span| span.start < span.end && span.end <= text.len())
        .cloned()
        .collect::<Vec<Range<usize>>>();
    ordered.sort_by_key(|span| span.start);

    let mut output = String::with_capacity(text.len());
    let mut cursor = 0usize;
    for span in ordered {
        if span.end <= cursor {
            continue;
        }
        let start = span.start.max(cursor);
        if let Some(kept) = text.get(cursor..start) {
            output.push_str(kept);
        }
        output.push(' ');
        cursor = span.end;
    }
    if let Some(rest) = text.get(cursor..) {
        output.push_str(rest);
    }

    collapse_whitespace(&output)
}

/// Removes every whole-word occurrence of `phrase`.
pub fn strip_phrase(text: &str, phrase: &str) -> String {
    let Ok(matcher) = word_matcher(phrase) else {
        return text.to_string();
    };
    let mut current = collapse_whitespace(text);
    while let Some(span) = word_span(&matcher, &current) {
        current = excise(&current, &[span]);
    }
    current
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<&str>>().join(" ")
}

pub fn residual_phrases(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|token| token.trim_matches(PHRASE_TRIM))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::{excise, locate_literal, residual_phrases, strip_phrase, word_matcher};

    #[test]
    fn word_matcher_requires_word_edges() {
        let matcher = word_matcher("Oak");
        assert!(matcher.is_ok());
        if let Ok(matcher) = matcher {
            assert!(matcher.is_match("Acme Cab Oak 2015"));
            assert!(matcher.is_match("oak"));
            assert!(!matcher.is_match("Acme Cab Oakville 2015"));
            assert!(!matcher.is_match("Silveroak"));
        }
    }

    #[test]
    fn word_matcher_escapes_punctuation() {
        let matcher = word_matcher("Stag's");
        assert!(matcher.is_ok());
        if let Ok(matcher) = matcher {
            assert!(matcher.is_match("stag's leap"));
            assert!(!matcher.is_match("stags leap"));
        }
    }

    #[test]
    fn locate_literal_returns_exact_span() {
        let text = "Harlan Estate The Maiden 2016";
        assert_eq!(locate_literal(text, "the maiden"), Some(14..24));
        assert_eq!(locate_literal(text, "Maid"), None);
    }

    #[test]
    fn excise_merges_overlapping_spans() {
        let text = "Acme Cab Reserve 2015 1.5Ltr";
        assert_eq!(excise(text, &[0..4, 2..8, 17..21]), "Reserve 1.5Ltr");
    }

    #[test]
    fn strip_phrase_removes_adjacent_repeats() {
        assert_eq!(strip_phrase("Oak Oak Reserve oak", "Oak"), "Reserve");
    }

    #[test]
    fn residual_phrases_drop_bare_punctuation() {
        assert_eq!(
            residual_phrases(" Reserve , (Oak) "),
            vec!["Reserve".to_string(), "Oak".to_string()]
        );
    }
}
