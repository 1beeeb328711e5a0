use async_graphql::{Enum, SimpleObject};
use serde::{Deserialize, Serialize};

use crate::models::domain::{content::SourceTier, content_item::ContentItem};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Enum, Copy)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    Succeeded,
    Failed,
    Empty,
    TimedOut,
}

/// One provider invocation recorded by the resolver.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct ProviderAttempt {
    pub provider: String,
    pub outcome: AttemptOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub elapsed_ms: u64,
}

/// Outcome of resolving one topic through a fallback chain.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct ProviderResult {
    pub items: Vec<ContentItem>,
    pub provider_id: String,
    pub tier: SourceTier,
    pub succeeded: bool,
    pub attempts: Vec<ProviderAttempt>,
}
