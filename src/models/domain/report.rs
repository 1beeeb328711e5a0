use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::{
    content_item::MaterialItem,
    evaluation::{ConceptAccuracy, MistakeCategory},
};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, SimpleObject)]
pub struct ReportMistake {
    pub question_id: String,
    pub concept: String,
    pub your_answer: String,
    pub correct_answer: String,
    pub category: MistakeCategory,
    pub review_tip: String,
    pub resources: Vec<MaterialItem>,
}

/// Renderer-neutral report document produced from an evaluation.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, SimpleObject)]
pub struct ReportDocument {
    pub title: String,
    pub subject_id: String,
    pub unit: String,
    pub generated_at: DateTime<Utc>,
    pub score: f64,
    pub grade: String,
    pub summary: String,
    pub correct_count: usize,
    pub total_questions: usize,
    pub concept_breakdown: Vec<ConceptAccuracy>,
    pub weak_concepts: Vec<String>,
    pub mistakes: Vec<ReportMistake>,
    pub action_plan: Vec<String>,
}
