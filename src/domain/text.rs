//! Question-text inspection shared by the evaluators
//!
//! Matching is done on a lowercased copy of the text. A *stem* matches where it
//! begins a word ("share" matches "shares"), a *word* must match a whole token.

use once_cell::sync::Lazy;
use regex::Regex;

static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d+\b").expect("valid number regex"));

static FRACTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d+)\s*/\s*(\d+)\b").expect("valid fraction regex"));

#[derive(Debug, Clone)]
pub struct QuestionText {
    raw: String,
    lower: String,
}

impl QuestionText {
    pub fn new(text: impl Into<String>) -> Self {
        let raw = text.into();
        let lower = raw.to_lowercase();
        Self { raw, lower }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn lower(&self) -> &str {
        &self.lower
    }

    pub fn char_count(&self) -> usize {
        self.raw.chars().count()
    }

    pub fn word_count(&self) -> usize {
        self.raw.split_whitespace().count()
    }

    pub fn has_question_mark(&self) -> bool {
        self.raw.contains('?')
    }

    pub fn has_stem(&self, stem: &str) -> bool {
        find_term(&self.lower, stem, false)
    }

    pub fn has_word(&self, word: &str) -> bool {
        find_term(&self.lower, word, true)
    }

    pub fn has_any_stem(&self, stems: &[&str]) -> bool {
        stems.iter().any(|stem| self.has_stem(stem))
    }

    pub fn has_any_word(&self, words: &[&str]) -> bool {
        words.iter().any(|word| self.has_word(word))
    }

    /// Stems that occur in the text, in list order.
    pub fn stems_found<'a>(&self, stems: &[&'a str]) -> Vec<&'a str> {
        stems
            .iter()
            .copied()
            .filter(|stem| self.has_stem(stem))
            .collect()
    }

    /// Distinct lowercase tokens of the text that appear in `words`, in text order.
    pub fn distinct_words_in(&self, words: &[&str]) -> Vec<&str> {
        let mut found: Vec<&str> = Vec::new();
        for token in self.tokens() {
            if words.contains(&token) && !found.contains(&token) {
                found.push(token);
            }
        }
        found
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
    }

    /// Whole numbers written with digits.
    pub fn numbers(&self) -> Vec<f64> {
        NUMBER
            .find_iter(&self.raw)
            .filter_map(|found| found.as_str().parse::<f64>().ok())
            .collect()
    }

    /// `numerator/denominator` pairs written in the text.
    pub fn fractions(&self) -> Vec<(u64, u64)> {
        FRACTION
            .captures_iter(&self.raw)
            .filter_map(|captures| {
                let numerator = captures.get(1)?.as_str().parse().ok()?;
                let denominator = captures.get(2)?.as_str().parse().ok()?;
                Some((numerator, denominator))
            })
            .collect()
    }

    pub fn sentences(&self) -> impl Iterator<Item = &str> {
        self.raw
            .split(['.', '?', '!'])
            .map(str::trim)
            .filter(|sentence| !sentence.is_empty())
    }

    /// Copy of the text with every occurrence of `phrase` blanked out.
    pub fn without(&self, phrase: &str) -> Self {
        let lower = self.lower.replace(phrase, " ");
        Self {
            raw: self.raw.clone(),
            lower,
        }
    }
}

fn find_term(haystack: &str, term: &str, whole_word: bool) -> bool {
    if term.is_empty() {
        return false;
    }

    haystack.match_indices(term).any(|(index, matched)| {
        let starts_word = haystack[..index]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let ends_word = haystack[index + matched.len()..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        starts_word && (!whole_word || ends_word)
    })
}
