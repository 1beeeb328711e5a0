use std::collections::HashMap;

use async_graphql::InputObject;
use serde::Deserialize;
use validator::Validate;

use crate::models::domain::{ArchiveKey, ContentKind, ContentRequest, Difficulty, ItemType};

fn default_requested_count() -> u32 {
    10
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct GenerateContentRequest {
    #[validate(length(min = 1, max = 200))]
    #[serde(alias = "subject")]
    pub subject_id: String,

    #[validate(length(min = 1, max = 20))]
    #[serde(alias = "units")]
    pub topics: Vec<String>,

    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_requested_count", alias = "num_questions")]
    #[graphql(default = 10)]
    pub requested_count: u32,

    #[serde(default)]
    #[graphql(default)]
    pub difficulty: Difficulty,

    #[serde(default, alias = "question_types")]
    #[graphql(default)]
    pub item_types: Vec<ItemType>,

    #[serde(default)]
    pub accept_cached: Option<bool>,
}

impl GenerateContentRequest {
    pub fn into_content_request(self, content_kind: ContentKind) -> ContentRequest {
        ContentRequest {
            subject_id: self.subject_id.trim().to_string(),
            topics: self.topics.iter().map(|t| t.trim().to_string()).collect(),
            requested_count: self.requested_count as usize,
            difficulty: self.difficulty,
            item_types: self.item_types,
            content_kind,
            accept_cached: self.accept_cached,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EvaluateQuizRequest {
    #[validate(length(min = 1, max = 200))]
    #[serde(alias = "subject")]
    pub subject_id: String,

    #[validate(length(min = 1, max = 200))]
    pub unit: String,

    #[serde(alias = "responses")]
    pub answers: HashMap<String, String>,
}

impl EvaluateQuizRequest {
    pub fn archive_key(&self) -> ArchiveKey {
        ArchiveKey::new(&self.subject_id, &self.unit, ContentKind::Quiz)
    }
}

#[derive(Debug, Clone, Deserialize, InputObject)]
pub struct SubmittedAnswerInput {
    pub question_id: String,
    pub answer: String,
}

#[derive(Debug, Clone, Deserialize, InputObject)]
pub struct EvaluateQuizInput {
    pub key: ArchiveKey,
    pub answers: Vec<SubmittedAnswerInput>,
}

impl EvaluateQuizInput {
    pub fn archive_key(&self) -> ArchiveKey {
        ArchiveKey::new(&self.key.subject_id, &self.key.unit, self.key.content_kind)
    }

    /// Later duplicates of a question id replace earlier ones.
    pub fn answer_map(&self) -> HashMap<String, String> {
        self.answers
            .iter()
            .map(|a| (a.question_id.trim().to_string(), a.answer.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListArchivesQuery {
    pub subject_id: Option<String>,
}
