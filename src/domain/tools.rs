//! Tools exposed via Model Context Protocol
//!
//! Provides `analyze_student_gaps`, `validate_question` and
//! `compare_to_benchmark`. The registry is built once at startup and only
//! read afterwards.

use std::{fmt, str::FromStr};

use rust_mcp_sdk::{macros, schema::Tool};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::benchmark::{BenchmarkChecker, GeneratedQuestion};
use crate::domain::curriculum::{validate_question, QuestionInput};
use crate::domain::student::{analyze_student_gaps, StudentProfile};
use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    AnalyzeStudentGaps,
    ValidateQuestion,
    CompareToBenchmark,
}

impl ToolName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AnalyzeStudentGaps => "analyze_student_gaps",
            Self::ValidateQuestion => "validate_question",
            Self::CompareToBenchmark => "compare_to_benchmark",
        }
    }
}

impl FromStr for ToolName {
    type Err = AppError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "analyze_student_gaps" => Ok(Self::AnalyzeStudentGaps),
            "validate_question" => Ok(Self::ValidateQuestion),
            "compare_to_benchmark" => Ok(Self::CompareToBenchmark),
            _ => Err(AppError::unknown_tool(name)),
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[macros::mcp_tool(
    name = "analyze_student_gaps",
    description = "Analyzes student diagnostic scores and recent session data to identify knowledge gaps, recommend appropriate difficulty levels, and suggest focus areas for adaptive learning."
)]
#[derive(Debug, Deserialize, macros::JsonSchema)]
pub struct AnalyzeStudentGapsTool {
    /// Student performance data containing diagnostic scores and session history
    #[serde(alias = "studentData")]
    pub student_data: StudentProfile,
}

#[macros::mcp_tool(
    name = "validate_question",
    description = "Validates a maths question against UK Year 3 National Curriculum standards. Checks topic appropriateness, number ranges, operation complexity, and vocabulary level."
)]
#[derive(Debug, Deserialize, macros::JsonSchema)]
pub struct ValidateQuestionTool {
    /// The question to validate
    pub question: QuestionInput,
    /// The curriculum topic (e.g., 'multiplication', 'division', 'word_problems')
    #[serde(default)]
    pub topic: Option<String>,
}

#[macros::mcp_tool(
    name = "compare_to_benchmark",
    description = "Evaluates a generated maths question against quality benchmarks for Year 3 students. Checks for real-world context, clear language, age-appropriateness, and use of concrete objects."
)]
#[derive(Debug, Deserialize, macros::JsonSchema)]
pub struct CompareToBenchmarkTool {
    /// The question to evaluate
    #[serde(alias = "generatedQuestion")]
    pub generated_question: GeneratedQuestion,
    /// The curriculum topic for context-specific benchmarks
    #[serde(default)]
    pub topic: Option<String>,
}

/// A registered tool. Closed over the known tools; any state a handler
/// needs is built with it.
pub enum ToolHandler {
    AnalyzeStudentGaps,
    ValidateQuestion,
    CompareToBenchmark(BenchmarkChecker),
}

impl ToolHandler {
    pub fn name(&self) -> ToolName {
        match self {
            Self::AnalyzeStudentGaps => ToolName::AnalyzeStudentGaps,
            Self::ValidateQuestion => ToolName::ValidateQuestion,
            Self::CompareToBenchmark(_) => ToolName::CompareToBenchmark,
        }
    }

    /// Descriptor advertised by `tools/list`.
    pub fn definition(&self) -> Tool {
        match self {
            Self::AnalyzeStudentGaps => AnalyzeStudentGapsTool::tool(),
            Self::ValidateQuestion => ValidateQuestionTool::tool(),
            Self::CompareToBenchmark(_) => CompareToBenchmarkTool::tool(),
        }
    }

    pub fn invoke(&self, arguments: Map<String, Value>) -> Result<Value, AppError> {
        match self {
            Self::AnalyzeStudentGaps => {
                let args: AnalyzeStudentGapsTool = parse_arguments(arguments)?;
                to_result_value(analyze_student_gaps(&args.student_data)?)
            }
            Self::ValidateQuestion => {
                let args: ValidateQuestionTool = parse_arguments(arguments)?;
                to_result_value(validate_question(&args.question, args.topic.as_deref()))
            }
            Self::CompareToBenchmark(checker) => {
                let args: CompareToBenchmarkTool = parse_arguments(arguments)?;
                to_result_value(checker.check(&args.generated_question, args.topic.as_deref())?)
            }
        }
    }
}

pub struct ToolRegistry {
    handlers: Vec<ToolHandler>,
}

impl ToolRegistry {
    pub fn from_handlers(handlers: Vec<ToolHandler>) -> Result<Self, AppError> {
        for (index, handler) in handlers.iter().enumerate() {
            if handlers[..index].iter().any(|other| other.name() == handler.name()) {
                return Err(AppError::internal(format!(
                    "tool {} registered twice",
                    handler.name()
                )));
            }
        }

        Ok(Self { handlers })
    }

    /// The three maths tutor tools, with the benchmark passing at `pass_threshold`.
    pub fn standard(pass_threshold: f64) -> Result<Self, AppError> {
        Self::from_handlers(vec![
            ToolHandler::AnalyzeStudentGaps,
            ToolHandler::ValidateQuestion,
            ToolHandler::CompareToBenchmark(BenchmarkChecker::new(pass_threshold)?),
        ])
    }

    pub fn get(&self, name: ToolName) -> Option<&ToolHandler> {
        self.handlers.iter().find(|handler| handler.name() == name)
    }

    pub fn handlers(&self) -> &[ToolHandler] {
        &self.handlers
    }

    pub fn definitions(&self) -> Vec<Tool> {
        self.handlers.iter().map(ToolHandler::definition).collect()
    }

    pub fn call(&self, name: &str, arguments: Map<String, Value>) -> Result<Value, AppError> {
        let tool_name = name.parse::<ToolName>()?;
        let handler = self
            .get(tool_name)
            .ok_or_else(|| AppError::unknown_tool(name))?;
        handler.invoke(arguments)
    }
}

fn parse_arguments<T: DeserializeOwned>(arguments: Map<String, Value>) -> Result<T, AppError> {
    serde_json::from_value(Value::Object(arguments))
        .map_err(|err| AppError::invalid_params("invalid_arguments", err.to_string()))
}

fn to_result_value<T: Serialize>(result: T) -> Result<Value, AppError> {
    serde_json::to_value(result)
        .map_err(|err| AppError::internal(format!("tool result serialization: {err}")))
}
