// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Free-text relevance matching shared by the global-search and fallback paths.
//!
//! Both paths must go through [`QueryMatcher`] so the same query filters the same
//! way whichever path served it.

/// Default minimum phrase length (in characters, exclusive) for the exact-phrase shortcut.
pub const DEFAULT_PHRASE_MIN_CHARS: usize = 5;

/// Characters removed from both the query and the candidate text before matching.
const PUNCTUATION: [char; 6] = ['؟', '!', '.', ',', ';', ':'];

/// Pashto function words and numerals that carry no search intent on their own.
const STOP_WORDS: [&str; 48] = [
    "د", "او", "په", "چې", "له", "ته", "دې", "دا", "هم", "یو", "یوه", "دوه", "درې", "څلور",
    "پنځه", "شپږ", "اووه", "اته", "نهه", "لس", "کې", "کښې", "سره", "نه", "څه", "ده", "دي", "وي",
    "شو", "شوي", "کړي", "کوي", "هغه", "دغه", "دلته", "هلته", "لپاره", "باندې", "پورې", "څخه", "تر",
    "بیا", "خو", "یا", "که", "ولې", "څنګه", "کوم",
];

/// Lower-case `text` and drop the punctuation set.
pub fn clean_text(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| !PUNCTUATION.contains(c))
        .collect()
}

fn is_meaningful(token: &str) -> bool {
    token.chars().count() > 1
        && !STOP_WORDS.contains(&token)
        && token.chars().any(char::is_alphanumeric)
}

/// A query prepared for repeated relevance checks against candidate records.
#[derive(Debug, Clone)]
pub struct QueryMatcher {
    phrase: String,
    terms: Vec<String>,
    has_meaningful_terms: bool,
    phrase_min_chars: usize,
}

impl QueryMatcher {
    pub fn new(query: &str) -> Self {
        Self::with_phrase_min_chars(query, DEFAULT_PHRASE_MIN_CHARS)
    }

    /// Prepare `query`, taking the exact-phrase shortcut only for phrases
    /// longer than `phrase_min_chars` characters.
    pub fn with_phrase_min_chars(query: &str, phrase_min_chars: usize) -> Self {
        let phrase = clean_text(query.trim()).trim().to_string();
        let tokens: Vec<String> = phrase.split_whitespace().map(str::to_string).collect();
        let meaningful: Vec<String> = tokens
            .iter()
            .filter(|t| is_meaningful(t))
            .cloned()
            .collect();

        let has_meaningful_terms = !meaningful.is_empty();
        let terms = if has_meaningful_terms {
            meaningful
        } else {
            tokens
        };

        Self {
            phrase,
            terms,
            has_meaningful_terms,
            phrase_min_chars,
        }
    }

    /// Terms a candidate is scored against
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Decide whether `candidate` (the record's searchable text) is relevant.
    pub fn matches(&self, candidate: &str) -> bool {
        let text = clean_text(candidate);

        if self.phrase.chars().count() > self.phrase_min_chars && text.contains(&self.phrase) {
            return true;
        }

        if !self.terms.is_empty() {
            let hits = self
                .terms
                .iter()
                .filter(|term| text.contains(term.as_str()))
                .count();
            // Short queries must match every term
            let required = if self.terms.len() <= 2 { 1.0 } else { 0.6 };
            if hits as f64 / self.terms.len() as f64 >= required {
                return true;
            }
        }

        !self.has_meaningful_terms && text.contains(&self.phrase)
    }
}

/// One-shot form of [`QueryMatcher::matches`].
pub fn matches_query(candidate: &str, query: &str) -> bool {
    QueryMatcher::new(query).matches(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_phrase_shortcut() {
        assert!(matches_query(
            "Islamic Finance Principles",
            "Islamic Finance Principles"
        ));
    }

    #[test]
    fn test_phrase_shortcut_ignores_case_and_punctuation() {
        assert!(matches_query(
            "A primer on islamic finance, principles and practice",
            "Islamic Finance: principles!"
        ));
    }

    #[test]
    fn test_three_terms_two_present_matches() {
        // 2/3 >= 0.6
        assert!(matches_query(
            "islamic finance principles",
            "islamic finance banking"
        ));
    }

    #[test]
    fn test_two_terms_one_present_does_not_match() {
        // 1/2 < 1.0
        assert!(!matches_query("islamic finance", "islamic banking"));
    }

    #[test]
    fn test_three_terms_one_present_does_not_match() {
        assert!(!matches_query(
            "islamic studies",
            "islamic banking mortgages"
        ));
    }

    #[test]
    fn test_single_term_substring_match() {
        assert!(matches_query("د نمانځنې مراسم", "نمانځنې"));
        assert!(!matches_query("د نمانځنې مراسم", "کتاب"));
    }

    #[test]
    fn test_stop_words_are_not_scored() {
        let matcher = QueryMatcher::new("د لمانځه احکام");
        assert_eq!(matcher.terms(), ["لمانځه", "احکام"]);
        assert!(matcher.matches("لمانځه احکام او مسایل"));
    }

    #[test]
    fn test_stop_word_only_query_uses_all_tokens() {
        let matcher = QueryMatcher::new("د او");
        assert_eq!(matcher.terms(), ["د", "او"]);
        assert!(matcher.matches("د علم او عمل"));
        assert!(!matcher.matches("علم"));
    }

    #[test]
    fn test_stop_word_only_query_phrase_fallback() {
        // phrase is shorter than the shortcut threshold, so only the
        // no-meaningful-words fallback can accept it
        let matcher = QueryMatcher::new("په دې");
        assert!(matcher.matches("خبرې په دې اړه"));
    }

    #[test]
    fn test_punctuation_only_query_matches_via_phrase_fallback() {
        let matcher = QueryMatcher::new("؟!");
        assert!(matcher.terms().is_empty());
        assert!(matcher.matches("anything at all"));
    }

    #[test]
    fn test_short_phrase_does_not_take_shortcut() {
        // "ab cd" is 5 chars, not > 5; both terms must be present
        let matcher = QueryMatcher::new("ab cd");
        assert!(matcher.matches("xx ab yy cd"));
        assert!(!matcher.matches("xx ab yy"));
    }

    #[test]
    fn test_phrase_threshold_is_tunable() {
        let strict = QueryMatcher::with_phrase_min_chars("alpha beta gamma", 100);
        let loose = QueryMatcher::with_phrase_min_chars("alpha beta gamma", 3);
        assert!(strict.matches("the alpha beta gamma release"));
        assert!(loose.matches("the alpha beta gamma release"));
        assert!(!strict.matches("alpha only"));
        assert!(!loose.matches("alpha only"));
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("Hello, World! ؟"), "hello world ");
    }
}
