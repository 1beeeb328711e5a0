use async_graphql::Enum;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, Enum, Copy)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Quiz,
    Material,
    Video,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Quiz => "quiz",
            ContentKind::Material => "material",
            ContentKind::Video => "video",
        }
    }

    pub fn parse(value: &str) -> AppResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "quiz" => Ok(ContentKind::Quiz),
            "material" => Ok(ContentKind::Material),
            "video" => Ok(ContentKind::Video),
            other => Err(AppError::ValidationError(format!(
                "Unknown content kind '{}'",
                other
            ))),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize, Enum, Copy)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize, Enum, Copy)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Mcq,
    TrueFalse,
    FillBlank,
    CodeOutput,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Mcq => "mcq",
            ItemType::TrueFalse => "true_false",
            ItemType::FillBlank => "fill_blank",
            ItemType::CodeOutput => "code_output",
        }
    }

    /// Choice types carry an option list that must contain the correct answer.
    pub fn is_choice(&self) -> bool {
        !matches!(self, ItemType::FillBlank)
    }
}

/// Which tier of the fallback chain satisfied a topic.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Enum, Copy)]
pub enum SourceTier {
    #[serde(rename = "cache-hit")]
    CacheHit,
    #[serde(rename = "primary-ai")]
    PrimaryAi,
    #[serde(rename = "fallback-ai")]
    FallbackAi,
    #[serde(rename = "local-generated")]
    LocalGenerated,
}

impl SourceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTier::CacheHit => "cache-hit",
            SourceTier::PrimaryAi => "primary-ai",
            SourceTier::FallbackAi => "fallback-ai",
            SourceTier::LocalGenerated => "local-generated",
        }
    }

    fn degradation(&self) -> u8 {
        match self {
            SourceTier::CacheHit => 0,
            SourceTier::PrimaryAi => 1,
            SourceTier::FallbackAi => 2,
            SourceTier::LocalGenerated => 3,
        }
    }

    /// The more degraded of two tiers; a response reports its weakest topic.
    pub fn weakest(self, other: SourceTier) -> SourceTier {
        if other.degradation() > self.degradation() {
            other
        } else {
            self
        }
    }
}

/// Caller-owned content request. Topics are kept in input order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentRequest {
    pub subject_id: String,
    pub topics: Vec<String>,
    pub requested_count: usize,
    pub difficulty: Difficulty,
    pub item_types: Vec<ItemType>,
    pub content_kind: ContentKind,
    pub accept_cached: Option<bool>,
}

impl ContentRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.subject_id.trim().is_empty() {
            return Err(AppError::ValidationError(
                "subject_id must not be empty".to_string(),
            ));
        }
        if self.topics.is_empty() {
            return Err(AppError::ValidationError(
                "at least one unit or topic is required".to_string(),
            ));
        }
        if self.topics.iter().any(|t| t.trim().is_empty()) {
            return Err(AppError::ValidationError(
                "unit and topic names must not be blank".to_string(),
            ));
        }
        if self.requested_count == 0 {
            return Err(AppError::ValidationError(
                "requested_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Item types to generate; an empty set means multiple choice only.
    pub fn effective_item_types(&self) -> Vec<ItemType> {
        let mut types = self.item_types.clone();
        types.sort();
        types.dedup();
        if types.is_empty() {
            types.push(ItemType::Mcq);
        }
        types
    }
}
