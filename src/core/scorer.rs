//! Flesch-Kincaid grade level over normalized text.

use crate::core::normalizer::is_sentinel;
use crate::utils::error::{GradeError, Result};
use regex::Regex;
use std::sync::LazyLock;

static RE_TERMINATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("terminator pattern compiles"));

static RE_SILENT_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[^laeiouy]es|ed|[^laeiouy]e)$").expect("suffix pattern compiles")
});

static RE_VOWEL_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[aeiouy]{1,2}").expect("vowel pattern compiles"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextCounts {
    pub words: u32,
    pub sentences: u32,
    pub syllables: u32,
}

impl TextCounts {
    pub fn of(text: &str) -> Self {
        let mut words = 0;
        let mut syllables = 0;
        for token in text.split_whitespace() {
            if token.chars().any(char::is_alphanumeric) {
                words += 1;
                syllables += count_syllables(token);
            }
        }
        let sentences = RE_TERMINATORS.find_iter(text).count().max(1) as u32;
        Self {
            words,
            sentences,
            syllables,
        }
    }

    /// `None` when there are no words to average over.
    pub fn grade_level(&self) -> Option<f64> {
        if self.words == 0 {
            return None;
        }
        let words = f64::from(self.words);
        let words_per_sentence = words / f64::from(self.sentences);
        let syllables_per_word = f64::from(self.syllables) / words;
        Some(0.39 * words_per_sentence + 11.8 * syllables_per_word - 15.59)
    }
}

/// Grade level of one normalized item. The sentinel and word-less text are refused
/// rather than scored as zero.
pub fn score(id: &str, normalized: &str) -> Result<f64> {
    let unscoreable = || GradeError::UnscoreableItem { id: id.to_string() };
    if is_sentinel(normalized) {
        return Err(unscoreable());
    }
    TextCounts::of(normalized).grade_level().ok_or_else(unscoreable)
}

/// Vowel-group approximation; every word has at least one syllable.
pub fn count_syllables(token: &str) -> u32 {
    let word: String = token
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect();

    if word.chars().count() <= 3 {
        return 1;
    }

    let trimmed = RE_SILENT_SUFFIX.replace(&word, "");
    let trimmed = trimmed.strip_prefix('y').unwrap_or(&trimmed);
    (RE_VOWEL_GROUP.find_iter(trimmed).count() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_count_syllables() {
        assert_eq!(count_syllables("the"), 1);
        assert_eq!(count_syllables("hello"), 2);
        assert_eq!(count_syllables("World."), 1);
        assert_eq!(count_syllables("today!."), 2);
        assert_eq!(count_syllables("make"), 1);
        assert_eq!(count_syllables("table"), 2);
        assert_eq!(count_syllables("2024"), 1);
    }

    #[test]
    fn test_counts_words_and_sentences() {
        let counts = TextCounts::of("The cat sat. The dog ran!");
        assert_eq!(counts.words, 6);
        assert_eq!(counts.sentences, 2);
        assert_eq!(counts.syllables, 6);
    }

    #[test]
    fn test_run_of_terminators_is_one_sentence() {
        assert_eq!(TextCounts::of("Visit today!.").sentences, 1);
        assert_eq!(TextCounts::of("No terminator here").sentences, 1);
    }

    #[test]
    fn test_grade_level_formula() {
        // 2 words, 1 sentence, 4 syllables
        let grade = score("1", "Visit today!.").unwrap();
        assert!((grade - (0.39 * 2.0 + 11.8 * 2.0 - 15.59)).abs() < EPS);

        // 2 words, 1 sentence, 3 syllables
        let grade = score("2", "Hello World.").unwrap();
        assert!((grade - (0.39 * 2.0 + 11.8 * 1.5 - 15.59)).abs() < EPS);
    }

    #[test]
    fn test_scores_are_not_clamped() {
        let grade = score("1", "Go. Do. Be.").unwrap();
        assert!(grade < 0.0);
    }

    #[test]
    fn test_sentinel_is_unscoreable() {
        match score("42", " ") {
            Err(GradeError::UnscoreableItem { id }) => assert_eq!(id, "42"),
            other => panic!("expected UnscoreableItem, got {:?}", other),
        }
    }

    #[test]
    fn test_punctuation_only_is_unscoreable() {
        assert!(score("7", "!!! ... ?.").is_err());
    }
}
