use async_graphql::{InputObject, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    errors::AppResult,
    models::domain::{
        content::{ContentKind, Difficulty, ItemType},
        content_item::{collapse_whitespace, hash_hex, ContentItem},
        quiz_question::QuizQuestion,
    },
};

/// Stable identity of an archive entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, SimpleObject, InputObject)]
#[graphql(input_name = "ArchiveKeyInput")]
pub struct ArchiveKey {
    pub subject_id: String,
    pub unit: String,
    pub content_kind: ContentKind,
}

impl ArchiveKey {
    pub fn new(subject_id: &str, unit: &str, content_kind: ContentKind) -> Self {
        ArchiveKey {
            subject_id: collapse_whitespace(subject_id),
            unit: collapse_whitespace(unit),
            content_kind,
        }
    }

    pub fn key_id(&self) -> String {
        format!(
            "{}::{}::{}",
            self.subject_id,
            self.content_kind.as_str(),
            self.unit
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct ArchiveEntry {
    pub key: ArchiveKey,
    pub items: Vec<ContentItem>,
    pub created_at: DateTime<Utc>,
    pub difficulty: Difficulty,
    pub item_types: Vec<ItemType>,
    pub item_count: usize,
    pub content_hash: String,
}

/// Index-level view of an entry; listing never loads payloads.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct ArchiveSummary {
    pub key: ArchiveKey,
    pub payload_ref: String,
    pub item_count: usize,
    pub difficulty: Difficulty,
    pub item_types: Vec<ItemType>,
    pub created_at: DateTime<Utc>,
    pub content_hash: String,
}

pub fn content_hash(items: &[ContentItem]) -> AppResult<String> {
    let serialized = serde_json::to_string(items)?;
    Ok(hash_hex(&serialized))
}

impl ArchiveEntry {
    pub fn new(
        key: ArchiveKey,
        items: Vec<ContentItem>,
        difficulty: Difficulty,
        item_types: Vec<ItemType>,
    ) -> AppResult<Self> {
        let content_hash = content_hash(&items)?;
        Ok(ArchiveEntry {
            key,
            item_count: items.len(),
            items,
            created_at: Utc::now(),
            difficulty,
            item_types,
            content_hash,
        })
    }

    pub fn payload_ref(&self) -> String {
        format!("{}:{}", self.key.key_id(), self.content_hash)
    }

    pub fn summary(&self) -> ArchiveSummary {
        ArchiveSummary {
            key: self.key.clone(),
            payload_ref: self.payload_ref(),
            item_count: self.item_count,
            difficulty: self.difficulty,
            item_types: self.item_types.clone(),
            created_at: self.created_at,
            content_hash: self.content_hash.clone(),
        }
    }

    pub fn questions(&self) -> impl Iterator<Item = &QuizQuestion> {
        self.items.iter().filter_map(ContentItem::as_question)
    }
}
