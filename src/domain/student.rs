//! Student gap analysis
//!
//! Combines diagnostic scores with recent practice sessions to find weak
//! topics, a difficulty band and a short prioritized list of focus areas.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::domain::evaluation::round_to;
use crate::domain::vocabulary::{
    prerequisites, HIGH_PRIORITY_THRESHOLD, MAX_FOCUS_AREAS, MIN_PERFORMANCES_FOR_TREND,
    TREND_MARGIN, WEAK_TOPIC_THRESHOLD,
};
use crate::errors::AppError;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    #[serde(default, alias = "diagnostic_scores")]
    pub diagnostic_scores: BTreeMap<String, f64>,
    #[serde(default, alias = "recent_sessions")]
    pub recent_sessions: Vec<Session>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default, alias = "questions_correct")]
    pub correct: u32,
    #[serde(default, alias = "questions_total")]
    pub total: Option<u32>,
    #[serde(default, alias = "topics_covered")]
    pub topics_covered: BTreeMap<String, f64>,
}

impl Session {
    /// Questions attempted; a session that does not say counts as one.
    pub fn questions(&self) -> u32 {
        self.total.unwrap_or(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Foundation,
    Core,
    Challenge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusReason {
    RecentDecline,
    PrerequisiteGap,
    DiagnosticGap,
}

impl FocusReason {
    pub fn suggested_approach(self) -> &'static str {
        match self {
            Self::RecentDecline => "review_fundamentals",
            Self::PrerequisiteGap => "build_foundation",
            Self::DiagnosticGap => "targeted_practice",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusArea {
    pub topic: String,
    pub priority: Priority,
    pub reason: FocusReason,
    pub suggested_approach: &'static str,
}

impl FocusArea {
    fn new(topic: &str, priority: Priority, reason: FocusReason) -> Self {
        Self {
            topic: topic.to_string(),
            priority,
            reason,
            suggested_approach: reason.suggested_approach(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
    InsufficientData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTrends {
    pub trend: Trend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_score: Option<f64>,
    pub improving_topics: Vec<String>,
    pub declining_topics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GapAnalysis {
    pub weak_topics: Vec<String>,
    pub recommended_difficulty: Difficulty,
    pub focus_areas: Vec<FocusArea>,
}

impl StudentProfile {
    /// Input schema for the profile, nested into the `analyze_student_gaps`
    /// tool schema. Written out because both maps are keyed by topic name.
    pub fn json_schema() -> Map<String, Value> {
        let schema = json!({
            "type": "object",
            "properties": {
                "diagnosticScores": {
                    "type": "object",
                    "description": "Mapping of topic names to scores (0-100)",
                    "additionalProperties": {"type": "number"}
                },
                "recentSessions": {
                    "type": "array",
                    "description": "Recent practice sessions, oldest first",
                    "items": {
                        "type": "object",
                        "properties": {
                            "correct": {"type": "integer", "minimum": 0},
                            "total": {"type": "integer", "minimum": 0},
                            "topicsCovered": {
                                "type": "object",
                                "description": "Mapping of topic names to session performance (0-100)",
                                "additionalProperties": {"type": "number"}
                            }
                        }
                    }
                }
            }
        });

        match schema {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        for (topic, score) in &self.diagnostic_scores {
            if !(0.0..=100.0).contains(score) {
                return Err(AppError::invalid_params(
                    "invalid_diagnostic_score",
                    format!("diagnostic score for {topic} must be between 0 and 100"),
                ));
            }
        }

        for (index, session) in self.recent_sessions.iter().enumerate() {
            if session.total.is_some_and(|total| session.correct > total) {
                return Err(AppError::invalid_params(
                    "invalid_session",
                    format!("session {index} has more correct answers than questions"),
                ));
            }
            if session.topics_covered.values().any(|value| !value.is_finite()) {
                return Err(AppError::invalid_params(
                    "invalid_session",
                    format!("session {index} has a non-numeric topic performance"),
                ));
            }
        }

        Ok(())
    }
}

pub fn analyze_student_gaps(profile: &StudentProfile) -> Result<GapAnalysis, AppError> {
    profile.validate()?;

    let weak_topics = weak_topics(&profile.diagnostic_scores);
    let trends = session_trends(&profile.recent_sessions);
    let recommended_difficulty = recommend_difficulty(&profile.diagnostic_scores, trends.trend);
    let focus_areas = focus_areas(&weak_topics, &profile.diagnostic_scores, &trends);

    Ok(GapAnalysis {
        weak_topics,
        recommended_difficulty,
        focus_areas,
    })
}

/// Topics below the weak threshold, weakest first.
pub fn weak_topics(scores: &BTreeMap<String, f64>) -> Vec<String> {
    let mut weak = scores
        .iter()
        .filter(|(_, score)| **score < WEAK_TOPIC_THRESHOLD)
        .collect::<Vec<_>>();
    weak.sort_by(|(_, left), (_, right)| left.total_cmp(right));
    weak.into_iter().map(|(topic, _)| topic.clone()).collect()
}

pub fn session_trends(sessions: &[Session]) -> SessionTrends {
    if sessions.is_empty() {
        return SessionTrends {
            trend: Trend::InsufficientData,
            average_score: None,
            improving_topics: vec![],
            declining_topics: vec![],
        };
    }

    let mut total_correct = 0u64;
    let mut total_questions = 0u64;
    let mut performances: BTreeMap<&str, Vec<f64>> = BTreeMap::new();

    for session in sessions {
        total_correct += u64::from(session.correct);
        total_questions += u64::from(session.questions());
        for (topic, performance) in &session.topics_covered {
            performances.entry(topic).or_default().push(*performance);
        }
    }

    let average_score = if total_questions > 0 {
        total_correct as f64 / total_questions as f64 * 100.0
    } else {
        0.0
    };

    let mut improving_topics = Vec::new();
    let mut declining_topics = Vec::new();

    for (topic, history) in performances {
        if history.len() < MIN_PERFORMANCES_FOR_TREND {
            continue;
        }

        let (earlier, recent) = history.split_at(history.len() - MIN_PERFORMANCES_FOR_TREND);
        let recent_avg = recent.iter().sum::<f64>() / recent.len() as f64;
        // no earlier history compares against a zero baseline
        let earlier_avg = earlier.iter().sum::<f64>() / earlier.len().max(1) as f64;

        if recent_avg > earlier_avg + TREND_MARGIN {
            improving_topics.push(topic.to_string());
        } else if recent_avg < earlier_avg - TREND_MARGIN {
            declining_topics.push(topic.to_string());
        }
    }

    let trend = match improving_topics.len().cmp(&declining_topics.len()) {
        std::cmp::Ordering::Greater => Trend::Improving,
        std::cmp::Ordering::Less => Trend::Declining,
        std::cmp::Ordering::Equal => Trend::Stable,
    };

    SessionTrends {
        trend,
        average_score: Some(round_to(average_score, 1)),
        improving_topics,
        declining_topics,
    }
}

pub fn recommend_difficulty(scores: &BTreeMap<String, f64>, trend: Trend) -> Difficulty {
    if scores.is_empty() {
        return Difficulty::Foundation;
    }

    let mut average = scores.values().sum::<f64>() / scores.len() as f64;
    match trend {
        Trend::Improving => average += 5.0,
        Trend::Declining => average -= 5.0,
        Trend::Stable | Trend::InsufficientData => {}
    }

    if average >= 75.0 {
        Difficulty::Challenge
    } else if average >= 50.0 {
        Difficulty::Core
    } else {
        Difficulty::Foundation
    }
}

pub fn focus_areas(
    weak_topics: &[String],
    scores: &BTreeMap<String, f64>,
    trends: &SessionTrends,
) -> Vec<FocusArea> {
    let mut areas: Vec<FocusArea> = Vec::new();
    let already_listed =
        |areas: &[FocusArea], topic: &str| areas.iter().any(|area| area.topic == topic);

    for topic in &trends.declining_topics {
        if !weak_topics.contains(topic) && !already_listed(&areas, topic) {
            areas.push(FocusArea::new(topic, Priority::High, FocusReason::RecentDecline));
        }
    }

    for topic in weak_topics {
        for prerequisite in prerequisites(topic) {
            let is_weak = weak_topics.iter().any(|weak| weak == prerequisite);
            if is_weak && !already_listed(&areas, prerequisite) {
                areas.push(FocusArea::new(
                    prerequisite,
                    Priority::High,
                    FocusReason::PrerequisiteGap,
                ));
            }
        }

        if !already_listed(&areas, topic) {
            let score = scores.get(topic).copied().unwrap_or_default();
            let priority = if score < HIGH_PRIORITY_THRESHOLD {
                Priority::High
            } else {
                Priority::Medium
            };
            areas.push(FocusArea::new(topic, priority, FocusReason::DiagnosticGap));
        }
    }

    areas.truncate(MAX_FOCUS_AREAS);
    areas
}
