use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;

use crate::config::Config;
use crate::constants::prompts::QUIZ_SYSTEM_PROMPT;
use crate::models::domain::ContentItem;
use crate::providers::{parse, Capability, Provider, ProviderFailure, TopicRequest};

#[derive(Debug, Deserialize)]
struct GenerateContentReply {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentReply {
    fn text(self) -> String {
        self.candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| p.text)
            .collect::<Vec<_>>()
            .join("")
    }
}

/// Secondary quiz generator backed by the Gemini `generateContent` endpoint.
pub struct GeminiQuizProvider {
    http: reqwest::Client,
    api_key: Option<SecretString>,
    base_url: String,
    model: String,
}

impl GeminiQuizProvider {
    pub fn new(config: &Config, http: reqwest::Client) -> Self {
        Self {
            http,
            api_key: config.gemini_api_key.clone(),
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            model: config.gemini_model.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl Provider for GeminiQuizProvider {
    fn id(&self) -> String {
        "gemini-quiz".to_string()
    }

    fn capability(&self) -> Capability {
        Capability::QuizGeneration
    }

    async fn attempt(&self, request: &TopicRequest) -> Result<Vec<ContentItem>, ProviderFailure> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| ProviderFailure::NotConfigured("GEMINI_API_KEY is not set".to_string()))?;

        let body = json!({
            "systemInstruction": { "parts": [{ "text": QUIZ_SYSTEM_PROMPT }] },
            "contents": [{ "role": "user", "parts": [{ "text": request.quiz_prompt() }] }],
            "generationConfig": { "temperature": 0.7 },
        });

        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", api_key.expose_secret())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderFailure::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: GenerateContentReply = response.json().await?;
        parse::parse_questions(&reply.text(), request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::{Difficulty, ItemType};

    #[test]
    fn test_endpoint_includes_model() {
        let provider = GeminiQuizProvider::new(&Config::test_config(), reqwest::Client::new());
        assert_eq!(
            provider.endpoint(),
            "http://127.0.0.1:9/v1beta/models/gemini-1.5-pro:generateContent"
        );
    }

    #[test]
    fn test_reply_text_joins_parts() {
        let reply: GenerateContentReply = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "[{\"a\":" }, { "text": "1}]" }] } }]
        }))
        .expect("reply should deserialize");

        assert_eq!(reply.text(), "[{\"a\":1}]");
    }

    #[tokio::test]
    async fn test_missing_key_is_not_configured() {
        let provider = GeminiQuizProvider::new(&Config::test_config(), reqwest::Client::new());
        let request = TopicRequest {
            subject_id: "OS".to_string(),
            topic: "Unit 1".to_string(),
            count: 1,
            difficulty: Difficulty::Easy,
            item_types: vec![ItemType::Mcq],
        };

        assert!(matches!(
            provider.attempt(&request).await,
            Err(ProviderFailure::NotConfigured(_))
        ));
    }
}
