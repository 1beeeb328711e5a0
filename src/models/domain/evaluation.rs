use async_graphql::{Enum, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::{
    archive::ArchiveKey, content_item::MaterialItem, lifecycle::QuizLifecycle,
};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Enum, Copy)]
#[serde(rename_all = "snake_case")]
pub enum MistakeCategory {
    Skipped,             // blank answer
    ConceptualConfusion, // picked another listed option
    CarelessError,       // answer not among the options
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, SimpleObject)]
pub struct QuestionOutcome {
    pub question_id: String,
    pub concept: String,
    pub submitted_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, SimpleObject)]
pub struct Mistake {
    pub question_id: String,
    pub question_text: String,
    pub concept: String,
    pub submitted_answer: String,
    pub correct_answer: String,
    pub category: MistakeCategory,
    pub review_tip: String,
    pub remediation_resources: Vec<MaterialItem>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, SimpleObject)]
pub struct ConceptAccuracy {
    pub concept: String,
    pub correct: usize,
    pub attempted: usize,
    pub accuracy: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, SimpleObject)]
pub struct EvaluationResult {
    pub archive_key: ArchiveKey,
    pub per_question_outcome: Vec<QuestionOutcome>,
    pub correct_count: usize,
    pub total_matched: usize,
    pub score: f64,
    pub mistakes: Vec<Mistake>,
    pub concept_accuracy: Vec<ConceptAccuracy>,
    pub unmatched_ids: Vec<String>,
    pub lifecycle: QuizLifecycle,
    pub evaluated_at: DateTime<Utc>,
}

/// Percentage score in 0..=100, zero when nothing was matched.
pub fn percentage(correct: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (correct.min(total) as f64 / total as f64) * 100.0
}
