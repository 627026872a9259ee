//! Weighted-criteria scoring
//!
//! Each criterion scores its input in `0.0..=1.0` and may explain what is
//! missing. The evaluator combines them into a single 0-10 score:
//! `round(sum(partial * weight) / sum(weight) * 10, 1)`.

use std::collections::BTreeMap;

use crate::errors::AppError;

pub const DEFAULT_PASS_THRESHOLD: f64 = 7.0;

/// Upper bound of every partial score, with slack for float accumulation.
const MAX_PARTIAL: f64 = 1.0 + 1e-9;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CriterionScore {
    pub score: f64,
    pub improvements: Vec<String>,
}

impl CriterionScore {
    pub fn award(&mut self, points: f64) {
        self.score += points;
    }

    pub fn improve(&mut self, message: impl Into<String>) {
        self.improvements.push(message.into());
    }
}

pub type Scorer<I> = fn(&I) -> Result<CriterionScore, AppError>;

pub struct Criterion<I> {
    pub name: &'static str,
    pub weight: f64,
    scorer: Scorer<I>,
}

impl<I> Criterion<I> {
    pub fn new(name: &'static str, weight: f64, scorer: Scorer<I>) -> Self {
        Self {
            name,
            weight,
            scorer,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    pub score: f64,
    pub passes: bool,
    pub improvements: Vec<String>,
    pub criterion_scores: BTreeMap<String, f64>,
}

pub struct WeightedEvaluator<I> {
    criteria: Vec<Criterion<I>>,
    threshold: f64,
}

impl<I> WeightedEvaluator<I> {
    pub fn new(criteria: Vec<Criterion<I>>, threshold: f64) -> Result<Self, AppError> {
        if criteria.is_empty() {
            return Err(AppError::internal("evaluator requires at least one criterion"));
        }

        for (index, criterion) in criteria.iter().enumerate() {
            if !(criterion.weight.is_finite() && criterion.weight > 0.0) {
                return Err(AppError::internal(format!(
                    "criterion {} must have a positive weight",
                    criterion.name
                )));
            }
            if criteria[..index].iter().any(|other| other.name == criterion.name) {
                return Err(AppError::internal(format!(
                    "criterion {} is declared twice",
                    criterion.name
                )));
            }
        }

        if !(0.0..=10.0).contains(&threshold) {
            return Err(AppError::internal("pass threshold must be between 0 and 10"));
        }

        Ok(Self {
            criteria,
            threshold,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn criteria(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.criteria
            .iter()
            .map(|criterion| (criterion.name, criterion.weight))
    }

    /// Runs every criterion in declaration order. Any scorer failure aborts
    /// the evaluation; no partial result is returned.
    pub fn evaluate(&self, input: &I) -> Result<EvaluationResult, AppError> {
        let mut weighted_sum = 0.0;
        let mut weight_sum = 0.0;
        let mut improvements = Vec::new();
        let mut criterion_scores = BTreeMap::new();

        for criterion in &self.criteria {
            let partial = (criterion.scorer)(input)?;
            if !(0.0..=MAX_PARTIAL).contains(&partial.score) {
                return Err(AppError::internal(format!(
                    "criterion {} scored {} outside 0..=1",
                    criterion.name, partial.score
                )));
            }

            weighted_sum += partial.score * criterion.weight;
            weight_sum += criterion.weight;
            improvements.extend(partial.improvements);
            criterion_scores.insert(criterion.name.to_string(), partial.score);
        }

        let score = round_to(weighted_sum / weight_sum * 10.0, 1).min(10.0);

        Ok(EvaluationResult {
            score,
            passes: score >= self.threshold,
            improvements,
            criterion_scores,
        })
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(score: f64) -> CriterionScore {
        CriterionScore {
            score,
            improvements: vec![format!("scored {score}")],
        }
    }

    fn half(_: &f64) -> Result<CriterionScore, AppError> {
        Ok(fixed(0.5))
    }

    fn full(_: &f64) -> Result<CriterionScore, AppError> {
        Ok(CriterionScore {
            score: 1.0,
            improvements: vec![],
        })
    }

    fn from_input(input: &f64) -> Result<CriterionScore, AppError> {
        Ok(fixed(*input))
    }

    fn failing(_: &f64) -> Result<CriterionScore, AppError> {
        Err(AppError::internal("scorer failed"))
    }

    #[test]
    fn normalizes_by_weight_sum() {
        let evaluator = WeightedEvaluator::new(
            vec![Criterion::new("a", 3.0, half), Criterion::new("b", 1.0, full)],
            DEFAULT_PASS_THRESHOLD,
        )
        .expect("valid evaluator");

        let result = evaluator.evaluate(&0.0).expect("evaluation");
        // (0.5 * 3 + 1.0 * 1) / 4 * 10 = 6.25
        assert_eq!(result.score, 6.3);
        assert!(!result.passes);
        assert_eq!(result.improvements, vec!["scored 0.5".to_string()]);
        assert_eq!(result.criterion_scores["a"], 0.5);
        assert_eq!(result.criterion_scores["b"], 1.0);
    }

    #[test]
    fn criterion_scores_keep_raw_partials() {
        let evaluator = WeightedEvaluator::new(
            vec![Criterion::new("only", 2.5, from_input)],
            DEFAULT_PASS_THRESHOLD,
        )
        .expect("valid evaluator");

        let result = evaluator.evaluate(&(1.0 / 3.0)).expect("evaluation");
        assert_eq!(result.criterion_scores["only"], 1.0 / 3.0);
        assert_eq!(result.score, 3.3);
    }

    #[test]
    fn threshold_boundary_passes() {
        let evaluator = WeightedEvaluator::new(
            vec![Criterion::new("only", 2.5, from_input)],
            DEFAULT_PASS_THRESHOLD,
        )
        .expect("valid evaluator");

        assert!(evaluator.evaluate(&0.7).expect("evaluation").passes);
        assert!(!evaluator.evaluate(&0.69).expect("evaluation").passes);
    }

    #[test]
    fn improvements_keep_declaration_order_without_dedup() {
        let evaluator = WeightedEvaluator::new(
            vec![
                Criterion::new("first", 1.0, half),
                Criterion::new("second", 1.0, half),
            ],
            DEFAULT_PASS_THRESHOLD,
        )
        .expect("valid evaluator");

        let result = evaluator.evaluate(&0.0).expect("evaluation");
        assert_eq!(result.improvements, vec!["scored 0.5", "scored 0.5"]);
        assert_eq!(result.score, 5.0);
    }

    #[test]
    fn scorer_failure_aborts_evaluation() {
        let evaluator = WeightedEvaluator::new(
            vec![Criterion::new("ok", 1.0, full), Criterion::new("broken", 1.0, failing)],
            DEFAULT_PASS_THRESHOLD,
        )
        .expect("valid evaluator");

        let error = evaluator.evaluate(&0.0).expect_err("expected failure");
        assert!(matches!(error, AppError::Internal { .. }));
    }

    #[test]
    fn out_of_range_partial_is_rejected() {
        let evaluator = WeightedEvaluator::new(
            vec![Criterion::new("only", 1.0, from_input)],
            DEFAULT_PASS_THRESHOLD,
        )
        .expect("valid evaluator");

        assert!(evaluator.evaluate(&1.5).is_err());
        assert!(evaluator.evaluate(&-0.1).is_err());
    }

    #[test]
    fn rejects_invalid_configuration() {
        assert!(WeightedEvaluator::<f64>::new(vec![], 7.0).is_err());
        assert!(WeightedEvaluator::new(vec![Criterion::new("a", 0.0, full)], 7.0).is_err());
        assert!(WeightedEvaluator::new(
            vec![Criterion::new("a", 1.0, full), Criterion::new("a", 1.0, half)],
            7.0
        )
        .is_err());
        assert!(WeightedEvaluator::new(vec![Criterion::new("a", 1.0, full)], 12.0).is_err());
    }

    #[test]
    fn score_stays_within_bounds() {
        let evaluator = WeightedEvaluator::new(
            vec![Criterion::new("a", 0.1, from_input), Criterion::new("b", 9.0, from_input)],
            DEFAULT_PASS_THRESHOLD,
        )
        .expect("valid evaluator");

        for step in 0..=10 {
            let partial = f64::from(step) / 10.0;
            let result = evaluator.evaluate(&partial).expect("evaluation");
            assert!((0.0..=10.0).contains(&result.score));
            assert_eq!(result.score, round_to(partial * 10.0, 1));
        }
    }
}
