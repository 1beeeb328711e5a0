use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;

use crate::config::Config;
use crate::constants::prompts::{MATERIAL_SYSTEM_PROMPT, QUIZ_SYSTEM_PROMPT};
use crate::models::domain::ContentItem;
use crate::providers::{parse, Capability, Provider, ProviderFailure, TopicRequest};

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completions adapter. Serves quiz generation or material search
/// depending on the capability it was built for.
pub struct OpenAiProvider {
    client: Option<Client<OpenAIConfig>>,
    model: String,
    capability: Capability,
}

impl OpenAiProvider {
    pub fn new(config: &Config, capability: Capability) -> Self {
        let client = config.openai_api_key.as_ref().map(|key| {
            Client::with_config(
                OpenAIConfig::new()
                    .with_api_key(key.expose_secret().to_string())
                    .with_api_base(config.openai_base_url.clone()),
            )
        });

        Self {
            client,
            model: config.openai_model.clone(),
            capability,
        }
    }

    fn prompts(&self, request: &TopicRequest) -> (&'static str, String) {
        match self.capability {
            Capability::MaterialSearch => (MATERIAL_SYSTEM_PROMPT, request.material_prompt()),
            _ => (QUIZ_SYSTEM_PROMPT, request.quiz_prompt()),
        }
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn id(&self) -> String {
        match self.capability {
            Capability::MaterialSearch => "openai-material".to_string(),
            _ => "openai-quiz".to_string(),
        }
    }

    fn capability(&self) -> Capability {
        self.capability
    }

    async fn attempt(&self, request: &TopicRequest) -> Result<Vec<ContentItem>, ProviderFailure> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| ProviderFailure::NotConfigured("OPENAI_API_KEY is not set".to_string()))?;

        let (system, prompt) = self.prompts(request);
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": prompt },
            ],
            "temperature": 0.7,
        });

        let reply: ChatReply = client
            .chat()
            .create_byot(body)
            .await
            .map_err(|e| ProviderFailure::Http(e.to_string()))?;

        let content = reply
            .choices
            .into_iter()
            .find_map(|c| c.message.content)
            .ok_or_else(|| ProviderFailure::Parse("reply has no message content".to_string()))?;

        match self.capability {
            Capability::MaterialSearch => parse::parse_materials(&content),
            _ => parse::parse_questions(&content, request),
        }
    }
}
