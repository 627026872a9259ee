//! Question quality benchmark for Year 3 maths questions
//!
//! Four equally weighted criteria: real-world context, clear language,
//! age-appropriateness and concrete objects.

use std::collections::BTreeMap;

use rust_mcp_sdk::macros;
use serde::{Deserialize, Serialize};

use crate::domain::evaluation::{
    round_to, Criterion, CriterionScore, EvaluationResult, WeightedEvaluator,
};
use crate::domain::text::QuestionText;
use crate::domain::vocabulary::{
    topic_hint_words, ACTION_VERBS, BENCHMARK_COMPLEX_WORDS, CHILD_NAMES, CONCRETE_OBJECTS,
    CONTEXT_SCENARIOS, INAPPROPRIATE_THEMES, MAX_BENCHMARK_WORDS, POSITIVE_STEMS,
    QUESTION_OPENERS, VAGUE_QUANTIFIERS,
};
use crate::errors::AppError;

pub const CRITERION_WEIGHT: f64 = 2.5;

#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct GeneratedQuestion {
    /// The question text
    pub text: String,
    /// The correct answer
    #[serde(default)]
    pub answer: Option<f64>,
    /// The maths topic
    #[serde(default)]
    pub topic: Option<String>,
    /// Difficulty level
    #[serde(default)]
    pub difficulty: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkReport {
    pub quality_score: f64,
    pub passes_benchmark: bool,
    pub improvements_needed: Vec<String>,
    pub criterion_scores: BTreeMap<String, f64>,
}

impl From<EvaluationResult> for BenchmarkReport {
    fn from(result: EvaluationResult) -> Self {
        Self {
            quality_score: result.score,
            passes_benchmark: result.passes,
            improvements_needed: result.improvements,
            // reported to two decimals; the evaluation keeps raw partials
            criterion_scores: result
                .criterion_scores
                .into_iter()
                .map(|(name, score)| (name, round_to(score, 2)))
                .collect(),
        }
    }
}

pub struct BenchmarkInput {
    pub text: QuestionText,
    pub topic: Option<String>,
}

pub struct BenchmarkChecker {
    evaluator: WeightedEvaluator<BenchmarkInput>,
}

impl BenchmarkChecker {
    pub fn new(pass_threshold: f64) -> Result<Self, AppError> {
        let evaluator = WeightedEvaluator::new(
            vec![
                Criterion::new("real_world_context", CRITERION_WEIGHT, score_real_world_context),
                Criterion::new("clear_language", CRITERION_WEIGHT, score_clear_language),
                Criterion::new("age_appropriate", CRITERION_WEIGHT, score_age_appropriate),
                Criterion::new("concrete_objects", CRITERION_WEIGHT, score_concrete_objects),
            ],
            pass_threshold,
        )?;

        Ok(Self { evaluator })
    }

    pub fn threshold(&self) -> f64 {
        self.evaluator.threshold()
    }

    /// `topic` wins over the topic carried by the question itself.
    pub fn check(
        &self,
        question: &GeneratedQuestion,
        topic: Option<&str>,
    ) -> Result<BenchmarkReport, AppError> {
        let topic = topic
            .or(question.topic.as_deref())
            .map(|value| value.trim().to_ascii_lowercase())
            .filter(|value| !value.is_empty());

        let input = BenchmarkInput {
            text: QuestionText::new(question.text.as_str()),
            topic,
        };

        self.evaluator.evaluate(&input).map(BenchmarkReport::from)
    }
}

fn score_real_world_context(input: &BenchmarkInput) -> Result<CriterionScore, AppError> {
    let text = &input.text;
    let mut score = CriterionScore::default();

    if text.has_any_stem(CONTEXT_SCENARIOS) {
        score.award(0.4);
    } else {
        score.improve("Add a real-world scenario (e.g., shop, school, party)");
    }

    if text.has_any_word(CHILD_NAMES) {
        score.award(0.3);
    } else {
        score.improve("Include a character name to make it relatable");
    }

    if text.has_any_word(ACTION_VERBS) {
        score.award(0.3);
    } else {
        score.improve("Use action verbs (e.g., 'Sam buys', 'Emma shares')");
    }

    Ok(score)
}

fn score_clear_language(input: &BenchmarkInput) -> Result<CriterionScore, AppError> {
    let text = &input.text;
    let mut score = CriterionScore::default();

    if text.has_any_stem(QUESTION_OPENERS) {
        score.award(0.3);
    } else {
        score.improve("Start with a clear question phrase (e.g., 'How many...?')");
    }

    if text.has_question_mark() {
        score.award(0.2);
    } else {
        score.improve("End with a question mark");
    }

    let words = text.word_count();
    if words <= MAX_BENCHMARK_WORDS {
        score.award(0.25);
    } else {
        score.improve(format!(
            "Shorten the question (currently {words} words, aim for under {MAX_BENCHMARK_WORDS})"
        ));
    }

    // "how many" is the preferred opener, not a vague quantity
    if !text.without("how many").has_any_word(VAGUE_QUANTIFIERS) {
        score.award(0.25);
    } else {
        score.improve("Replace vague words ('some', 'few') with specific numbers");
    }

    Ok(score)
}

fn score_age_appropriate(input: &BenchmarkInput) -> Result<CriterionScore, AppError> {
    let text = &input.text;
    let mut score = CriterionScore::default();

    let complex = text.stems_found(BENCHMARK_COMPLEX_WORDS);
    if complex.is_empty() {
        score.award(0.4);
    } else {
        score.improve(format!("Simplify complex words: {}", complex.join(", ")));
    }

    if !text.has_any_word(INAPPROPRIATE_THEMES) {
        score.award(0.3);
    } else {
        score.improve("Remove any inappropriate themes");
    }

    if text.has_any_stem(POSITIVE_STEMS) {
        score.award(0.3);
    } else {
        score.improve("Consider adding positive context (sharing, helping, playing)");
    }

    Ok(score)
}

fn score_concrete_objects(input: &BenchmarkInput) -> Result<CriterionScore, AppError> {
    let text = &input.text;
    let mut score = CriterionScore::default();

    let objects = text.distinct_words_in(CONCRETE_OBJECTS);
    if objects.is_empty() {
        score.improve("Use concrete objects children can visualize (e.g., apples, toys, stickers)");
    } else {
        score.award(0.5);
        if objects.len() >= 2 {
            score.award(0.2);
        }
    }

    if !text.numbers().is_empty() {
        score.award(0.3);
    } else {
        score.improve("Include specific numbers rather than vague quantities");
    }

    if let Some(hints) = input.topic.as_deref().and_then(topic_hint_words) {
        if !text.has_any_stem(hints) {
            let suggested = hints.iter().take(3).copied().collect::<Vec<_>>().join(", ");
            let topic = input.topic.as_deref().unwrap_or_default();
            score.improve(format!("For {topic}, consider using: {suggested}"));
        }
    }

    Ok(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::evaluation::DEFAULT_PASS_THRESHOLD;

    fn question(text: &str) -> GeneratedQuestion {
        GeneratedQuestion {
            text: text.to_string(),
            answer: None,
            topic: None,
            difficulty: None,
        }
    }

    fn checker() -> BenchmarkChecker {
        BenchmarkChecker::new(DEFAULT_PASS_THRESHOLD).expect("valid checker")
    }

    #[test]
    fn contextual_sharing_question_passes() {
        let report = checker()
            .check(
                &question(
                    "Emma has 24 stickers. She shares them equally among 4 friends. How many stickers does each friend get?",
                ),
                Some("division"),
            )
            .expect("benchmark report");

        assert!(report.quality_score >= 7.0);
        assert!(report.passes_benchmark);
        assert_eq!(report.criterion_scores["concrete_objects"], 1.0);
        assert_eq!(report.criterion_scores["clear_language"], 1.0);
        assert_eq!(report.criterion_scores["age_appropriate"], 1.0);
        assert_eq!(report.criterion_scores["real_world_context"], 0.6);
        assert_eq!(report.quality_score, 9.0);
    }

    #[test]
    fn bare_calculation_fails_with_context_nudge() {
        let report = checker()
            .check(&question("Calculate 48 divided by 8."), Some("division"))
            .expect("benchmark report");

        assert!(report.quality_score < 7.0);
        assert!(!report.passes_benchmark);
        assert!(report
            .improvements_needed
            .iter()
            .any(|item| item.starts_with("Add a real-world scenario")));
        assert!(report
            .improvements_needed
            .iter()
            .any(|item| item == "Simplify complex words: calculate"));
        assert!(report
            .improvements_needed
            .iter()
            .any(|item| item.starts_with("For division, consider using")));
        assert_eq!(report.quality_score, 3.5);
    }

    #[test]
    fn topic_hint_does_not_change_score() {
        let text = "Sam has 12 apples at the shop. How many apples are left if he eats 3?";
        let with_topic = checker()
            .check(&question(text), Some("division"))
            .expect("benchmark report");
        let without_topic = checker().check(&question(text), None).expect("benchmark report");

        assert_eq!(with_topic.quality_score, without_topic.quality_score);
        assert_eq!(
            with_topic.improvements_needed.len(),
            without_topic.improvements_needed.len() + 1
        );
    }

    #[test]
    fn question_topic_is_used_when_argument_missing() {
        let mut generated = question("Work out 6 times 7.");
        generated.topic = Some("Multiplication".to_string());

        let report = checker().check(&generated, None).expect("benchmark report");
        assert!(report
            .improvements_needed
            .iter()
            .any(|item| item == "For multiplication, consider using: groups, rows, arrays"));
    }

    #[test]
    fn each_failed_check_adds_one_improvement() {
        let report = checker().check(&question("x"), None).expect("benchmark report");

        // every sub-check fails except word count, vague words and themes
        assert_eq!(report.improvements_needed.len(), 8);
        assert_eq!(report.criterion_scores["clear_language"], 0.5);
        assert_eq!(report.criterion_scores["age_appropriate"], 0.7);
        assert_eq!(report.criterion_scores["real_world_context"], 0.0);
        assert_eq!(report.criterion_scores["concrete_objects"], 0.0);
    }

    #[test]
    fn long_vague_question_loses_language_credit() {
        let text = "Some children at the party had lots of balloons and a few of them popped when the wind blew them against the fence near the garden gate so how many are left?";
        let report = checker().check(&question(text), None).expect("benchmark report");

        assert_eq!(report.criterion_scores["clear_language"], 0.5);
        assert!(report
            .improvements_needed
            .iter()
            .any(|item| item.starts_with("Shorten the question (currently 32 words")));
    }

    #[test]
    fn identical_input_gives_identical_report() {
        let input = question("Lily buys 3 cakes at the bakery. How many cakes does she have?");
        let first = checker().check(&input, Some("addition")).expect("benchmark report");
        let second = checker().check(&input, Some("addition")).expect("benchmark report");
        assert_eq!(first, second);
    }

    #[test]
    fn custom_threshold_changes_verdict_only() {
        let strict = BenchmarkChecker::new(9.5).expect("valid checker");
        let report = strict
            .check(
                &question(
                    "Emma has 24 stickers. She shares them equally among 4 friends. How many stickers does each friend get?",
                ),
                None,
            )
            .expect("benchmark report");

        assert_eq!(report.quality_score, 9.0);
        assert!(!report.passes_benchmark);
    }
}
