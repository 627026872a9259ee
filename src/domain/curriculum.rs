//! UK Year 3 National Curriculum checks
//!
//! Unlike the benchmark, validation is pass/fail: anything reported in
//! `issues` invalidates the question, `suggestions` are advisory.

use rust_mcp_sdk::macros;
use serde::{Deserialize, Serialize};

use crate::domain::text::QuestionText;
use crate::domain::vocabulary::{
    ADDITION_WORDS, CONTEXT_NOUN_STEMS, CURRICULUM_COMPLEX_WORDS, DIVISION_WORDS, DIVISORS,
    FRACTION_DENOMINATORS, MAX_DIVIDEND, MAX_MINUEND, MAX_PLACE_VALUE, MAX_PRODUCT,
    MAX_SENTENCE_WORDS, MAX_SUM, MIN_QUESTION_CHARS, MULTIPLICATION_WORDS, SUBTRACTION_WORDS,
    TABLE_MULTIPLIERS, TIMES_TABLES,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Multiplication,
    Division,
    Addition,
    Subtraction,
}

impl Operation {
    /// Checked in this order when inferring a single operation.
    pub const ALL: [Operation; 4] = [
        Operation::Multiplication,
        Operation::Division,
        Operation::Addition,
        Operation::Subtraction,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "multiplication" | "multiply" | "times" => Some(Self::Multiplication),
            "division" | "divide" => Some(Self::Division),
            "addition" | "add" | "plus" => Some(Self::Addition),
            "subtraction" | "subtract" | "minus" => Some(Self::Subtraction),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Multiplication => "multiplication",
            Self::Division => "division",
            Self::Addition => "addition",
            Self::Subtraction => "subtraction",
        }
    }

    fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Multiplication => MULTIPLICATION_WORDS,
            Self::Division => DIVISION_WORDS,
            Self::Addition => ADDITION_WORDS,
            Self::Subtraction => SUBTRACTION_WORDS,
        }
    }

    pub fn infer(text: &QuestionText) -> Option<Self> {
        Self::mentioned_in(text).into_iter().next()
    }

    pub fn mentioned_in(text: &QuestionText) -> Vec<Self> {
        // "how many more" asks for a difference, not a sum
        let text = text.without("how many more");
        Self::ALL
            .into_iter()
            .filter(|operation| text.has_any_word(operation.keywords()))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurriculumTopic {
    Multiplication,
    Division,
    Addition,
    Subtraction,
    PlaceValue,
    WordProblems,
    Fractions,
}

impl CurriculumTopic {
    pub const ALL: [CurriculumTopic; 7] = [
        CurriculumTopic::Multiplication,
        CurriculumTopic::Division,
        CurriculumTopic::Addition,
        CurriculumTopic::Subtraction,
        CurriculumTopic::PlaceValue,
        CurriculumTopic::WordProblems,
        CurriculumTopic::Fractions,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|topic| topic.as_str() == normalized)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Multiplication => "multiplication",
            Self::Division => "division",
            Self::Addition => "addition",
            Self::Subtraction => "subtraction",
            Self::PlaceValue => "place_value",
            Self::WordProblems => "word_problems",
            Self::Fractions => "fractions",
        }
    }

    fn operation(self) -> Option<Operation> {
        match self {
            Self::Multiplication => Some(Operation::Multiplication),
            Self::Division => Some(Operation::Division),
            Self::Addition => Some(Operation::Addition),
            Self::Subtraction => Some(Operation::Subtraction),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct QuestionInput {
    /// The question text
    pub text: String,
    /// The correct answer
    #[serde(default)]
    pub answer: Option<f64>,
    /// The mathematical operation involved
    #[serde(default)]
    pub operation: Option<String>,
    /// Numbers appearing in the question
    #[serde(default, alias = "numbersUsed")]
    pub numbers_used: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
}

#[derive(Default)]
struct Findings {
    issues: Vec<String>,
    suggestions: Vec<String>,
}

impl Findings {
    fn issue(&mut self, message: impl Into<String>) {
        self.issues.push(message.into());
    }

    /// Identical suggestions are reported once.
    fn suggest(&mut self, message: impl Into<String>) {
        let message = message.into();
        if !self.suggestions.contains(&message) {
            self.suggestions.push(message);
        }
    }

    fn into_report(self) -> ValidationReport {
        ValidationReport {
            is_valid: self.issues.is_empty(),
            issues: self.issues,
            suggestions: self.suggestions,
        }
    }
}

pub fn validate_question(question: &QuestionInput, topic: Option<&str>) -> ValidationReport {
    let text = QuestionText::new(question.text.as_str());
    let numbers = question
        .numbers_used
        .clone()
        .unwrap_or_else(|| text.numbers());
    let operation = question
        .operation
        .as_deref()
        .and_then(Operation::from_name)
        .or_else(|| Operation::infer(&text));

    let topic_name = topic.map(str::trim).filter(|name| !name.is_empty());
    let curriculum_topic = topic_name.and_then(CurriculumTopic::from_name);

    let mut findings = Findings::default();

    match (topic_name, curriculum_topic) {
        (_, Some(topic)) => {
            check_topic_standards(&mut findings, topic, &text, &numbers, question.answer, operation)
        }
        (Some(name), None) => findings.suggest(format!(
            "Topic '{name}' not in standard curriculum list. Consider using: {}",
            CurriculumTopic::ALL
                .iter()
                .map(|topic| topic.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )),
        (None, None) => {}
    }

    check_vocabulary(&mut findings, &text);
    check_structure(&mut findings, &text, curriculum_topic);

    findings.into_report()
}

fn check_topic_standards(
    findings: &mut Findings,
    topic: CurriculumTopic,
    text: &QuestionText,
    numbers: &[f64],
    answer: Option<f64>,
    operation: Option<Operation>,
) {
    if let (Some(expected), Some(found)) = (topic.operation(), operation) {
        if expected != found {
            findings.suggest(format!(
                "Question reads as {} but the topic is {}",
                found.as_str(),
                expected.as_str()
            ));
        }
    }

    match topic {
        CurriculumTopic::Multiplication => {
            for &number in numbers {
                if number > 10.0 && !is_times_table_product(number) {
                    findings.issue(format!(
                        "Number {number} may be outside Year 3 multiplication range"
                    ));
                }
            }

            if let Some(answer) = answer.filter(|answer| *answer > MAX_PRODUCT) {
                findings.issue(format!(
                    "Product {answer} exceeds Year 3 maximum of {MAX_PRODUCT}"
                ));
                findings.suggest("Consider using smaller factors to keep product under 100");
            }
        }
        CurriculumTopic::Division => {
            if let Some(dividend) = largest(numbers).filter(|value| *value > MAX_DIVIDEND) {
                findings.issue(format!(
                    "Dividend {dividend} exceeds Year 3 maximum of {MAX_DIVIDEND}"
                ));
            }

            // numbers above 10 are read as dividends
            let unusual_divisor = numbers
                .iter()
                .any(|&number| number <= 10.0 && !is_listed(number, DIVISORS));
            if unusual_divisor {
                findings.suggest(format!("Consider using divisors from {DIVISORS:?}"));
            }
        }
        CurriculumTopic::Addition => {
            if let Some(answer) = answer.filter(|answer| *answer > MAX_SUM) {
                findings.issue(format!("Sum {answer} exceeds Year 3 maximum of {MAX_SUM}"));
            }
        }
        CurriculumTopic::Subtraction => {
            if let Some(minuend) = largest(numbers).filter(|value| *value > MAX_MINUEND) {
                findings.issue(format!(
                    "Number {minuend} exceeds Year 3 maximum of {MAX_MINUEND}"
                ));
            }
        }
        CurriculumTopic::PlaceValue => {
            for &number in numbers {
                if number > MAX_PLACE_VALUE {
                    findings.issue(format!(
                        "Number {number} exceeds Year 3 place value range of {MAX_PLACE_VALUE}"
                    ));
                }
            }
        }
        CurriculumTopic::WordProblems => {
            if Operation::mentioned_in(text).len() > 1 {
                findings.issue("Year 3 word problems should be one-step only");
                findings.suggest("Simplify to a single operation");
            }
        }
        CurriculumTopic::Fractions => {
            for (_, denominator) in text.fractions() {
                if !FRACTION_DENOMINATORS.contains(&denominator) {
                    findings.suggest(format!(
                        "Consider using denominators from {FRACTION_DENOMINATORS:?}"
                    ));
                }
            }
        }
    }
}

fn check_vocabulary(findings: &mut Findings, text: &QuestionText) {
    for word in text.stems_found(CURRICULUM_COMPLEX_WORDS) {
        findings.issue(format!("Vocabulary '{word}' may be too complex for Year 3"));
        findings.suggest(format!("Consider simpler alternatives for '{word}'"));
    }

    let long_sentence = text
        .sentences()
        .any(|sentence| sentence.split_whitespace().count() > MAX_SENTENCE_WORDS);
    if long_sentence {
        findings.suggest(format!(
            "Consider shorter sentences (under {MAX_SENTENCE_WORDS} words) for Year 3"
        ));
    }
}

fn check_structure(findings: &mut Findings, text: &QuestionText, topic: Option<CurriculumTopic>) {
    if !text.has_question_mark() {
        findings.suggest("Consider ending with a question mark for clarity");
    }

    if text.char_count() < MIN_QUESTION_CHARS {
        findings.issue("Question text too short - may lack context");
    }

    if topic == Some(CurriculumTopic::WordProblems) && !text.has_any_stem(CONTEXT_NOUN_STEMS) {
        findings.suggest(
            "Word problems should include real-world context (e.g., apples, toys, books)",
        );
    }
}

fn largest(numbers: &[f64]) -> Option<f64> {
    numbers.iter().copied().reduce(f64::max)
}

fn is_listed(number: f64, values: &[u64]) -> bool {
    number.fract() == 0.0 && number >= 0.0 && values.contains(&(number as u64))
}

fn is_times_table_product(number: f64) -> bool {
    if number.fract() != 0.0 || number < 0.0 {
        return false;
    }
    let number = number as u64;
    TIMES_TABLES
        .into_iter()
        .any(|table| TABLE_MULTIPLIERS.into_iter().any(|multiplier| table * multiplier == number))
}
