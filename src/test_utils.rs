use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{ArchiveEntry, ArchiveKey, ArchiveSummary, ContentItem},
    providers::{Capability, LocalGenerator, Provider, ProviderChains, ProviderFailure, TopicRequest},
    repositories::ArchiveRepository,
};

/// Two-map archive mirroring the index/payload split of the Mongo repository.
#[derive(Default)]
pub struct InMemoryArchiveRepository {
    index: Mutex<HashMap<String, ArchiveSummary>>,
    payloads: Mutex<HashMap<String, ArchiveEntry>>,
    puts: Mutex<usize>,
}

impl InMemoryArchiveRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_count(&self) -> usize {
        *self.puts.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn payload_count(&self) -> usize {
        self.payloads.lock().unwrap_or_else(|p| p.into_inner()).len()
    }
}

#[async_trait]
impl ArchiveRepository for InMemoryArchiveRepository {
    async fn get(&self, key: &ArchiveKey) -> AppResult<Option<ArchiveEntry>> {
        let summary = {
            let index = self.index.lock().unwrap_or_else(|p| p.into_inner());
            index.get(&key.key_id()).cloned()
        };
        let Some(summary) = summary else {
            return Ok(None);
        };

        let payloads = self.payloads.lock().unwrap_or_else(|p| p.into_inner());
        payloads
            .get(&summary.payload_ref)
            .cloned()
            .map(Some)
            .ok_or_else(|| AppError::DatabaseError(format!("missing payload {}", summary.payload_ref)))
    }

    async fn put(&self, entry: &ArchiveEntry) -> AppResult<()> {
        let payload_ref = entry.payload_ref();
        let key_id = entry.key.key_id();

        self.payloads
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(payload_ref.clone(), entry.clone());
        self.index
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(key_id.clone(), entry.summary());
        self.payloads
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .retain(|pref, stored| stored.key.key_id() != key_id || *pref == payload_ref);

        *self.puts.lock().unwrap_or_else(|p| p.into_inner()) += 1;
        Ok(())
    }

    async fn list(&self, subject_id: Option<&str>) -> AppResult<Vec<ArchiveSummary>> {
        let index = self.index.lock().unwrap_or_else(|p| p.into_inner());
        let mut summaries: Vec<ArchiveSummary> = index
            .values()
            .filter(|s| subject_id.map_or(true, |subject| s.key.subject_id == subject.trim()))
            .cloned()
            .collect();
        summaries.sort_by(|a, b| a.key.key_id().cmp(&b.key.key_id()));
        Ok(summaries)
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Non-terminal provider that fails every attempt.
pub struct FailingProvider {
    pub id: String,
    pub capability: Capability,
}

#[async_trait]
impl Provider for FailingProvider {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn capability(&self) -> Capability {
        self.capability
    }

    async fn attempt(&self, _request: &TopicRequest) -> Result<Vec<ContentItem>, ProviderFailure> {
        Err(ProviderFailure::Http("service unavailable".to_string()))
    }
}

/// Chains where every external provider fails, leaving only the local generator.
pub fn offline_chains() -> ProviderChains {
    Capability::ALL
        .into_iter()
        .map(|capability| {
            let chain: Vec<Arc<dyn Provider>> = vec![
                Arc::new(FailingProvider {
                    id: format!("{}-primary", capability.as_str()),
                    capability,
                }),
                Arc::new(FailingProvider {
                    id: format!("{}-secondary", capability.as_str()),
                    capability,
                }),
                Arc::new(LocalGenerator::new(capability)),
            ];
            (capability, chain)
        })
        .collect()
}

pub mod fixtures {
    use crate::models::domain::{
        ArchiveEntry, ArchiveKey, ContentItem, ContentKind, ContentRequest, Difficulty, ItemType,
        QuizQuestion,
    };

    pub const SUBJECT: &str = "315319-OPERATING SYSTEM";

    pub fn question(id: &str, text: &str, correct: &str, concept: &str) -> QuizQuestion {
        QuizQuestion {
            id: id.to_string(),
            question_text: text.to_string(),
            options: vec![
                "A".to_string(),
                "B".to_string(),
                "C".to_string(),
                "D".to_string(),
            ],
            correct_answer: correct.to_string(),
            concept: concept.to_string(),
            difficulty: Difficulty::Medium,
            item_type: ItemType::Mcq,
            explanation: None,
        }
    }

    pub fn quiz_key() -> ArchiveKey {
        ArchiveKey::new(SUBJECT, "Unit 1", ContentKind::Quiz)
    }

    /// Two questions: "1" answered by "B", "2" answered by "C".
    pub fn quiz_entry() -> ArchiveEntry {
        ArchiveEntry::new(
            quiz_key(),
            vec![
                ContentItem::Question(question("1", "Which state follows ready?", "B", "Process States")),
                ContentItem::Question(question("2", "Which policy is preemptive?", "C", "CPU Scheduling")),
            ],
            Difficulty::Medium,
            vec![ItemType::Mcq],
        )
        .expect("fixture entry should build")
    }

    pub fn content_request(kind: ContentKind, topics: &[&str], count: usize) -> ContentRequest {
        ContentRequest {
            subject_id: SUBJECT.to_string(),
            topics: topics.iter().map(|t| t.to_string()).collect(),
            requested_count: count,
            difficulty: Difficulty::Medium,
            item_types: vec![ItemType::Mcq],
            content_kind: kind,
            accept_cached: None,
        }
    }
}

pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_fixture_entry_has_two_questions() {
        let entry = quiz_entry();
        assert_eq!(entry.item_count, 2);
        assert_eq!(entry.questions().count(), 2);
        assert!(entry.questions().all(|q| q.check_shape().is_ok()));
    }

    #[tokio::test]
    async fn test_in_memory_repository_overwrites_and_drops_stale_payloads() {
        let repo = InMemoryArchiveRepository::new();
        let first = quiz_entry();
        repo.put(&first).await.expect("put should succeed");

        let mut second = quiz_entry();
        second.items.truncate(1);
        second.item_count = 1;
        second.content_hash = "different".to_string();
        repo.put(&second).await.expect("put should succeed");

        let stored = repo
            .get(&quiz_key())
            .await
            .expect("get should succeed")
            .expect("entry should exist");
        assert_eq!(stored.item_count, 1);
        assert_eq!(repo.payload_count(), 1);
        assert_eq!(repo.put_count(), 2);
    }

    #[test]
    fn test_offline_chains_cover_every_capability() {
        let chains = offline_chains();
        for capability in Capability::ALL {
            let chain = chains.get(&capability).expect("chain should exist");
            assert!(chain.last().expect("non-empty").is_terminal());
        }
    }
}
