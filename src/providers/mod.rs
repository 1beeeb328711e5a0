use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::Config;
use crate::constants::{
    prompts::{render, MATERIAL_SEARCH_PROMPT, QUIZ_GENERATION_PROMPT},
    syllabus,
};
use crate::models::domain::{ContentItem, ContentKind, ContentRequest, Difficulty, ItemType};

pub mod gemini;
pub mod local;
pub mod openai;
pub mod parse;
pub mod web_search;
pub mod youtube;
pub mod ytdlp;

pub use gemini::GeminiQuizProvider;
pub use local::LocalGenerator;
pub use openai::OpenAiProvider;
pub use web_search::WebSearchProvider;
pub use youtube::YouTubeApiProvider;
pub use ytdlp::YtDlpProvider;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    QuizGeneration,
    MaterialSearch,
    VideoSearch,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::QuizGeneration => "quiz-generation",
            Capability::MaterialSearch => "material-search",
            Capability::VideoSearch => "video-search",
        }
    }

    pub fn for_kind(kind: ContentKind) -> Self {
        match kind {
            ContentKind::Quiz => Capability::QuizGeneration,
            ContentKind::Material => Capability::MaterialSearch,
            ContentKind::Video => Capability::VideoSearch,
        }
    }

    pub const ALL: [Capability; 3] = [
        Capability::QuizGeneration,
        Capability::MaterialSearch,
        Capability::VideoSearch,
    ];
}

/// What a single provider attempt is asked to produce: `count` items for one topic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicRequest {
    pub subject_id: String,
    pub topic: String,
    pub count: usize,
    pub difficulty: Difficulty,
    pub item_types: Vec<ItemType>,
}

impl TopicRequest {
    pub fn from_content_request(request: &ContentRequest, topic: &str, count: usize) -> Self {
        Self {
            subject_id: request.subject_id.clone(),
            topic: topic.to_string(),
            count,
            difficulty: request.difficulty,
            item_types: request.effective_item_types(),
        }
    }

    /// Material lookup for a single concept, used for mistake remediation.
    pub fn for_concept(subject_id: &str, concept: &str, count: usize) -> Self {
        Self {
            subject_id: subject_id.to_string(),
            topic: concept.to_string(),
            count,
            difficulty: Difficulty::default(),
            item_types: vec![ItemType::Mcq],
        }
    }

    /// Catalog topics when `topic` names a syllabus unit, otherwise the topic itself.
    pub fn concepts(&self) -> Vec<String> {
        let topics = syllabus::unit_topics(&self.subject_id, &self.topic);
        if topics.is_empty() {
            vec![self.topic.clone()]
        } else {
            topics.iter().map(|t| t.to_string()).collect()
        }
    }

    pub fn quiz_prompt(&self) -> String {
        let subject = syllabus::subject_name(&self.subject_id);
        let topics = self.concepts().join(", ");
        let count = self.count.to_string();
        let item_types = self
            .item_types
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let prompt = render(
            QUIZ_GENERATION_PROMPT,
            &[
                ("subject", subject.as_str()),
                ("unit", self.topic.as_str()),
                ("topics", topics.as_str()),
                ("count", count.as_str()),
                ("difficulty", self.difficulty.as_str()),
                ("item_types", item_types.as_str()),
            ],
        );
        format!(
            "{}\n\nEach array element must match this JSON schema:\n{}",
            prompt,
            parse::question_schema()
        )
    }

    pub fn material_prompt(&self) -> String {
        let subject = syllabus::subject_name(&self.subject_id);
        let topics = self.concepts().join(", ");
        let count = self.count.to_string();
        let prompt = render(
            MATERIAL_SEARCH_PROMPT,
            &[
                ("subject", subject.as_str()),
                ("unit", self.topic.as_str()),
                ("topics", topics.as_str()),
                ("count", count.as_str()),
            ],
        );
        format!(
            "{}\n\nEach array element must match this JSON schema:\n{}",
            prompt,
            parse::material_schema()
        )
    }

    /// Free-text search phrase for web and video lookups.
    pub fn search_query(&self) -> String {
        format!("{} {}", syllabus::subject_name(&self.subject_id), self.topic)
    }
}

/// Reasons a provider attempt produced nothing. Logged by the resolver, never
/// returned to callers.
#[derive(Debug, Error)]
pub enum ProviderFailure {
    #[error("provider not configured: {0}")]
    NotConfigured(String),

    #[error("request failed: {0}")]
    Http(String),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not parse reply: {0}")]
    Parse(String),

    #[error("external process failed: {0}")]
    Process(String),
}

impl From<reqwest::Error> for ProviderFailure {
    fn from(err: reqwest::Error) -> Self {
        ProviderFailure::Http(err.to_string())
    }
}

impl From<serde_json::Error> for ProviderFailure {
    fn from(err: serde_json::Error) -> Self {
        ProviderFailure::Parse(err.to_string())
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Provider: Send + Sync {
    fn id(&self) -> String;

    fn capability(&self) -> Capability;

    /// Terminal providers never fail and end a fallback chain.
    fn is_terminal(&self) -> bool {
        false
    }

    async fn attempt(&self, request: &TopicRequest) -> Result<Vec<ContentItem>, ProviderFailure>;
}

pub type ProviderChains = HashMap<Capability, Vec<Arc<dyn Provider>>>;

/// Builds the priority-ordered chain for every capability. Adapters whose keys
/// are missing stay in the chain and fail fast with `NotConfigured`.
pub fn default_chains(config: &Config) -> ProviderChains {
    let http = reqwest::Client::new();

    let quiz: Vec<Arc<dyn Provider>> = vec![
        Arc::new(OpenAiProvider::new(config, Capability::QuizGeneration)),
        Arc::new(GeminiQuizProvider::new(config, http.clone())),
        Arc::new(LocalGenerator::new(Capability::QuizGeneration)),
    ];
    let material: Vec<Arc<dyn Provider>> = vec![
        Arc::new(OpenAiProvider::new(config, Capability::MaterialSearch)),
        Arc::new(WebSearchProvider::new(config, http.clone())),
        Arc::new(LocalGenerator::new(Capability::MaterialSearch)),
    ];
    let video: Vec<Arc<dyn Provider>> = vec![
        Arc::new(YouTubeApiProvider::new(config, http)),
        Arc::new(YtDlpProvider::new(config)),
        Arc::new(LocalGenerator::new(Capability::VideoSearch)),
    ];

    let mut chains: ProviderChains = HashMap::new();
    chains.insert(Capability::QuizGeneration, quiz);
    chains.insert(Capability::MaterialSearch, material);
    chains.insert(Capability::VideoSearch, video);

    chains
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_for_kind() {
        assert_eq!(Capability::for_kind(ContentKind::Quiz), Capability::QuizGeneration);
        assert_eq!(Capability::for_kind(ContentKind::Material), Capability::MaterialSearch);
        assert_eq!(Capability::for_kind(ContentKind::Video), Capability::VideoSearch);
    }

    #[test]
    fn test_default_chains_end_with_terminal_provider() {
        let chains = default_chains(&Config::test_config());

        for capability in Capability::ALL {
            let chain = chains.get(&capability).expect("every capability has a chain");
            assert_eq!(chain.len(), 3);
            assert!(chain.last().expect("chain is not empty").is_terminal());
            assert!(chain.iter().all(|p| p.capability() == capability));
            assert_eq!(chain.iter().filter(|p| p.is_terminal()).count(), 1);
        }
    }

    #[test]
    fn test_concepts_expand_catalog_units() {
        let unit = TopicRequest::for_concept("315319-OPERATING SYSTEM", "Unit 2", 3);
        assert_eq!(unit.concepts().len(), 5);
        assert_eq!(unit.concepts()[0], "Process Management");

        let free = TopicRequest::for_concept("315319-OPERATING SYSTEM", "Deadlocks", 3);
        assert_eq!(free.concepts(), vec!["Deadlocks".to_string()]);
        assert_eq!(free.search_query(), "Operating System Deadlocks");
    }

    #[test]
    fn test_quiz_prompt_mentions_request_parameters() {
        let request = TopicRequest {
            subject_id: "315319-OPERATING SYSTEM".to_string(),
            topic: "Unit 3".to_string(),
            count: 4,
            difficulty: Difficulty::Easy,
            item_types: vec![ItemType::Mcq, ItemType::TrueFalse],
        };
        let prompt = request.quiz_prompt();

        assert!(prompt.contains("Subject: Operating System"));
        assert!(prompt.contains("Virtual Memory Concepts"));
        assert!(prompt.contains("Generate 4 quiz questions"));
        assert!(prompt.contains("mcq, true_false"));
        assert!(prompt.contains("JSON schema"));
    }

    #[test]
    fn test_topic_request_uses_effective_item_types() {
        let request = ContentRequest {
            subject_id: "OS".to_string(),
            topics: vec!["Unit 1".to_string()],
            requested_count: 3,
            difficulty: Difficulty::Hard,
            item_types: vec![],
            content_kind: ContentKind::Quiz,
            accept_cached: None,
        };
        let topic = TopicRequest::from_content_request(&request, "Unit 1", 3);

        assert_eq!(topic.item_types, vec![ItemType::Mcq]);
        assert_eq!(topic.difficulty, Difficulty::Hard);
        assert_eq!(topic.count, 3);
    }
}
