use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};
use serde::{Deserialize, Serialize};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::{
        ArchiveEntry, ArchiveKey, ArchiveSummary, ContentItem, ContentKind, Difficulty, ItemType,
    },
};

/// Persistence for archive entries. Implementations must never expose a
/// partially written entry through `get`.
#[async_trait]
pub trait ArchiveRepository: Send + Sync {
    async fn get(&self, key: &ArchiveKey) -> AppResult<Option<ArchiveEntry>>;
    /// Overwrites any previous entry for the same key.
    async fn put(&self, entry: &ArchiveEntry) -> AppResult<()>;
    async fn list(&self, subject_id: Option<&str>) -> AppResult<Vec<ArchiveSummary>>;
    async fn health_check(&self) -> AppResult<()>;
}

/// One small document per archive key, read by listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveIndexRecord {
    pub key_id: String,
    pub subject_id: String,
    pub unit: String,
    pub content_kind: ContentKind,
    pub payload_ref: String,
    pub item_count: i64,
    pub difficulty: Difficulty,
    pub item_types: Vec<ItemType>,
    pub created_at: DateTime<Utc>,
    pub content_hash: String,
}

/// Full item list of one archived version, addressed by `payload_ref`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivePayloadRecord {
    pub payload_ref: String,
    pub key_id: String,
    pub items: Vec<ContentItem>,
}

impl ArchiveIndexRecord {
    pub fn from_entry(entry: &ArchiveEntry) -> Self {
        Self {
            key_id: entry.key.key_id(),
            subject_id: entry.key.subject_id.clone(),
            unit: entry.key.unit.clone(),
            content_kind: entry.key.content_kind,
            payload_ref: entry.payload_ref(),
            item_count: entry.item_count as i64,
            difficulty: entry.difficulty,
            item_types: entry.item_types.clone(),
            created_at: entry.created_at,
            content_hash: entry.content_hash.clone(),
        }
    }

    pub fn key(&self) -> ArchiveKey {
        ArchiveKey {
            subject_id: self.subject_id.clone(),
            unit: self.unit.clone(),
            content_kind: self.content_kind,
        }
    }

    pub fn summary(&self) -> ArchiveSummary {
        ArchiveSummary {
            key: self.key(),
            payload_ref: self.payload_ref.clone(),
            item_count: self.item_count.max(0) as usize,
            difficulty: self.difficulty,
            item_types: self.item_types.clone(),
            created_at: self.created_at,
            content_hash: self.content_hash.clone(),
        }
    }

    /// Joins the index record with the payload it references.
    pub fn into_entry(self, payload: ArchivePayloadRecord) -> AppResult<ArchiveEntry> {
        if payload.payload_ref != self.payload_ref {
            return Err(AppError::DatabaseError(format!(
                "payload {} does not match index reference {}",
                payload.payload_ref, self.payload_ref
            )));
        }
        Ok(ArchiveEntry {
            key: self.key(),
            item_count: payload.items.len(),
            items: payload.items,
            created_at: self.created_at,
            difficulty: self.difficulty,
            item_types: self.item_types,
            content_hash: self.content_hash,
        })
    }
}

impl ArchivePayloadRecord {
    pub fn from_entry(entry: &ArchiveEntry) -> Self {
        Self {
            payload_ref: entry.payload_ref(),
            key_id: entry.key.key_id(),
            items: entry.items.clone(),
        }
    }
}

pub struct MongoArchiveRepository {
    db: Database,
    index: Collection<ArchiveIndexRecord>,
    payloads: Collection<ArchivePayloadRecord>,
}

impl MongoArchiveRepository {
    pub fn new(db: &Database, index_collection: &str, payload_collection: &str) -> Self {
        Self {
            db: db.clone(),
            index: db.get_collection(index_collection),
            payloads: db.get_collection(payload_collection),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for archive collections");

        let key_index = IndexModel::builder()
            .keys(doc! { "key_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("key_id_unique".to_string())
                    .build(),
            )
            .build();

        let subject_index = IndexModel::builder()
            .keys(doc! { "subject_id": 1, "unit": 1 })
            .options(
                IndexOptions::builder()
                    .name("subject_unit".to_string())
                    .build(),
            )
            .build();

        let payload_index = IndexModel::builder()
            .keys(doc! { "payload_ref": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("payload_ref_unique".to_string())
                    .build(),
            )
            .build();

        let payload_key_index = IndexModel::builder()
            .keys(doc! { "key_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("payload_key_id".to_string())
                    .build(),
            )
            .build();

        self.index.create_index(key_index).await?;
        self.index.create_index(subject_index).await?;
        self.payloads.create_index(payload_index).await?;
        self.payloads.create_index(payload_key_index).await?;

        log::info!("Successfully created indexes for archive collections");
        Ok(())
    }
}

#[async_trait]
impl ArchiveRepository for MongoArchiveRepository {
    async fn get(&self, key: &ArchiveKey) -> AppResult<Option<ArchiveEntry>> {
        let Some(record) = self.index.find_one(doc! { "key_id": key.key_id() }).await? else {
            return Ok(None);
        };

        let payload = self
            .payloads
            .find_one(doc! { "payload_ref": &record.payload_ref })
            .await?
            .ok_or_else(|| {
                AppError::DatabaseError(format!(
                    "archive index {} references missing payload {}",
                    record.key_id, record.payload_ref
                ))
            })?;

        record.into_entry(payload).map(Some)
    }

    async fn put(&self, entry: &ArchiveEntry) -> AppResult<()> {
        let payload = ArchivePayloadRecord::from_entry(entry);
        let record = ArchiveIndexRecord::from_entry(entry);

        self.payloads
            .replace_one(doc! { "payload_ref": &payload.payload_ref }, &payload)
            .upsert(true)
            .await?;

        // The index write is the commit point; readers follow it to the payload above.
        self.index
            .replace_one(doc! { "key_id": &record.key_id }, &record)
            .upsert(true)
            .await?;

        if let Err(e) = self
            .payloads
            .delete_many(doc! {
                "key_id": &record.key_id,
                "payload_ref": { "$ne": &record.payload_ref },
            })
            .await
        {
            log::warn!("Failed to remove stale payloads for {}: {}", record.key_id, e);
        }

        Ok(())
    }

    async fn list(&self, subject_id: Option<&str>) -> AppResult<Vec<ArchiveSummary>> {
        let filter = match subject_id {
            Some(subject) => doc! { "subject_id": subject.trim() },
            None => doc! {},
        };

        let cursor = self
            .index
            .find(filter)
            .sort(doc! { "subject_id": 1, "content_kind": 1, "unit": 1 })
            .await?;
        let records: Vec<ArchiveIndexRecord> = cursor.try_collect().await?;

        Ok(records.iter().map(ArchiveIndexRecord::summary).collect())
    }

    async fn health_check(&self) -> AppResult<()> {
        self.db.health_check().await
    }
}
