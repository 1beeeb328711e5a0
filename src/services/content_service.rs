use std::collections::HashSet;
use std::sync::Arc;

use futures::{stream, StreamExt, TryStreamExt};

use crate::{
    config::Config,
    errors::AppResult,
    models::{
        domain::{
            content_item::{collapse_whitespace, normalize},
            ArchiveEntry, ArchiveKey, ContentItem, ContentRequest, ProviderResult, QuizLifecycle,
            SourceTier,
        },
        dto::response::{ContentResponse, TopicSection},
    },
    providers::{Capability, TopicRequest},
    services::{
        archive_store::ArchiveStore,
        distribution::{self, TopicQuota},
        resolver::FallbackChainResolver,
        uniqueness::{dedupe, SeenKeys},
    },
};

const ARCHIVE_PROVIDER_ID: &str = "archive";
const MAX_TOP_UP_ROUNDS: u32 = 4;

/// What one topic produced before the request-wide uniqueness pass.
enum Fetched {
    Skipped,
    Cached(ArchiveEntry),
    Resolved(ProviderResult),
}

struct TopicFetch {
    quota: TopicQuota,
    key: ArchiveKey,
    fetched: Fetched,
}

/// Runs the request pipeline: plan quotas, resolve topics in parallel, then
/// dedupe and archive them one by one in topic order.
pub struct ContentService {
    resolver: Arc<FallbackChainResolver>,
    archive: Arc<ArchiveStore>,
    concurrency: usize,
    accept_cached: bool,
}

/// Collapse of repeated topics ignoring case and spacing, first spelling wins.
fn distinct_topics(topics: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    topics
        .iter()
        .map(|t| collapse_whitespace(t))
        .filter(|t| seen.insert(normalize(t)))
        .collect()
}

/// Fresh questions are numbered "1".."n" within their archive entry.
fn number_questions(items: &mut [ContentItem]) {
    for (i, item) in items.iter_mut().enumerate() {
        if let ContentItem::Question(q) = item {
            q.id = (i + 1).to_string();
        }
    }
}

impl ContentService {
    pub fn new(resolver: Arc<FallbackChainResolver>, archive: Arc<ArchiveStore>, config: &Config) -> Self {
        Self {
            resolver,
            archive,
            concurrency: config.resolver_concurrency.max(1),
            accept_cached: config.accept_cached,
        }
    }

    pub async fn generate(&self, request: ContentRequest) -> AppResult<ContentResponse> {
        request.validate()?;

        let topics = distinct_topics(&request.topics);
        let quotas = distribution::plan(request.requested_count, &topics);
        let capability = Capability::for_kind(request.content_kind);
        let accept_cached = request.accept_cached.unwrap_or(self.accept_cached);

        log::info!(
            "Generating {} {} items for {} across {} topics",
            request.requested_count,
            request.content_kind.as_str(),
            request.subject_id,
            quotas.len()
        );

        let fetched: Vec<TopicFetch> = stream::iter(quotas)
            .map(|quota| self.fetch_topic(&request, quota, capability, accept_cached))
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let mut seen = SeenKeys::new();
        let mut sections = Vec::with_capacity(fetched.len());
        for fetch in fetched {
            sections.push(self.commit_topic(&request, fetch, &mut seen).await?);
        }

        let actual_count: usize = sections.iter().map(|s| s.actual_count).sum();
        let source = sections
            .iter()
            .filter_map(|s| s.source)
            .fold(SourceTier::CacheHit, SourceTier::weakest);
        let partial = actual_count < request.requested_count;
        if partial {
            log::warn!(
                "Partial fulfilment for {}: {} of {} {} items",
                request.subject_id,
                actual_count,
                request.requested_count,
                request.content_kind.as_str()
            );
        }

        Ok(ContentResponse {
            subject_id: request.subject_id.clone(),
            content_kind: request.content_kind,
            difficulty: request.difficulty,
            requested_count: request.requested_count,
            actual_count,
            partial,
            source,
            sections,
        })
    }

    async fn fetch_topic(
        &self,
        request: &ContentRequest,
        quota: TopicQuota,
        capability: Capability,
        accept_cached: bool,
    ) -> AppResult<TopicFetch> {
        let key = ArchiveKey::new(&request.subject_id, &quota.topic, request.content_kind);

        if quota.quota == 0 {
            return Ok(TopicFetch {
                quota,
                key,
                fetched: Fetched::Skipped,
            });
        }

        if accept_cached {
            if let Some(entry) = self.archive.get(&key).await? {
                if entry.item_count >= quota.quota && entry.difficulty == request.difficulty {
                    log::info!("Cache hit for {}", key.key_id());
                    return Ok(TopicFetch {
                        quota,
                        key,
                        fetched: Fetched::Cached(entry),
                    });
                }
                log::debug!(
                    "Archived {} holds {} {} items, {} {} needed; regenerating",
                    key.key_id(),
                    entry.item_count,
                    entry.difficulty.as_str(),
                    quota.quota,
                    request.difficulty.as_str()
                );
            }
        }

        let topic_request = TopicRequest::from_content_request(request, &quota.topic, quota.quota);
        let result = self.resolver.resolve(&topic_request, capability).await?;

        Ok(TopicFetch {
            quota,
            key,
            fetched: Fetched::Resolved(result),
        })
    }

    /// Re-asks the terminal generator for longer runs until the topic holds its
    /// quota of items unseen elsewhere in the request. Its output for a larger
    /// count extends the smaller one, so each round only adds new candidates.
    async fn top_up(
        &self,
        request: &ContentRequest,
        quota: &TopicQuota,
        seen: &SeenKeys,
        unique: &mut Vec<ContentItem>,
    ) -> AppResult<()> {
        let capability = Capability::for_kind(request.content_kind);

        for round in 1..=MAX_TOP_UP_ROUNDS {
            let missing = quota.quota.saturating_sub(unique.len());
            if missing == 0 {
                break;
            }

            let count = quota.quota.saturating_mul(2usize.pow(round));
            let topic_request = TopicRequest::from_content_request(request, &quota.topic, count);
            let candidates = self.resolver.terminal_fill(&topic_request, capability).await?;

            let mut taken = seen.clone();
            taken.extend_from(unique);
            let (fresh, _) = dedupe(candidates, taken);
            unique.extend(fresh.into_iter().take(missing));

            log::debug!(
                "Top-up round {} for '{}': {} of {} items",
                round,
                quota.topic,
                unique.len(),
                quota.quota
            );
        }
        Ok(())
    }

    /// Applies the shared uniqueness filter and archives fresh items.
    async fn commit_topic(
        &self,
        request: &ContentRequest,
        fetch: TopicFetch,
        seen: &mut SeenKeys,
    ) -> AppResult<TopicSection> {
        let TopicFetch { quota, key, fetched } = fetch;
        let mut section = TopicSection {
            topic: quota.topic.clone(),
            archive_key: key.clone(),
            requested_count: quota.quota,
            actual_count: 0,
            source: None,
            provider: None,
            lifecycle: QuizLifecycle::Requested,
            attempts: Vec::new(),
            items: Vec::new(),
        };

        match fetched {
            Fetched::Skipped => {}
            Fetched::Cached(entry) => {
                let (mut unique, _) = dedupe(entry.items, seen.clone());
                unique.truncate(quota.quota);
                seen.extend_from(&unique);

                section.actual_count = unique.len();
                section.source = Some(SourceTier::CacheHit);
                section.provider = Some(ARCHIVE_PROVIDER_ID.to_string());
                section.lifecycle = QuizLifecycle::Archived;
                section.items = unique;
            }
            Fetched::Resolved(result) => {
                let lifecycle = QuizLifecycle::Requested.advance_to(QuizLifecycle::Resolving)?;

                let (mut unique, _) = dedupe(result.items, seen.clone());
                unique.truncate(quota.quota);
                if unique.len() < quota.quota && result.tier == SourceTier::LocalGenerated {
                    self.top_up(request, &quota, seen, &mut unique).await?;
                }
                seen.extend_from(&unique);
                number_questions(&mut unique);

                section.lifecycle = lifecycle;
                if unique.is_empty() {
                    log::warn!("No unique items left for {}; nothing archived", key.key_id());
                } else {
                    let entry = ArchiveEntry::new(
                        key,
                        unique.clone(),
                        request.difficulty,
                        request.effective_item_types(),
                    )?;
                    self.archive.put(&entry).await?;
                    section.lifecycle = lifecycle.advance_to(QuizLifecycle::Archived)?;
                }

                section.actual_count = unique.len();
                section.source = Some(result.tier);
                section.provider = Some(result.provider_id);
                section.attempts = result.attempts;
                section.items = unique;
            }
        }

        if section.actual_count < section.requested_count {
            log::warn!(
                "Topic '{}' filled {} of {} items",
                section.topic,
                section.actual_count,
                section.requested_count
            );
        }

        Ok(section)
    }
}
