use std::env;
use std::time::Duration;

use secrecy::SecretString;

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub archive_index_collection: String,
    pub archive_payload_collection: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub openai_api_key: Option<SecretString>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub gemini_api_key: Option<SecretString>,
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub youtube_api_key: Option<SecretString>,
    pub youtube_base_url: String,
    pub ytdlp_path: String,
    pub web_search_url: String,
    pub provider_timeout_secs: u64,
    pub resolver_concurrency: usize,
    pub accept_cached: bool,
    pub remediation_resource_limit: usize,
}

fn optional_secret(name: &str) -> Option<SecretString> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(SecretString::from)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "studyhub-local".to_string()),
            archive_index_collection: env::var("ARCHIVE_INDEX_COLLECTION")
                .unwrap_or_else(|_| "archive_index".to_string()),
            archive_payload_collection: env::var("ARCHIVE_PAYLOAD_COLLECTION")
                .unwrap_or_else(|_| "archive_payloads".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string())
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            openai_api_key: optional_secret("OPENAI_API_KEY"),
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            gemini_api_key: optional_secret("GEMINI_API_KEY"),
            gemini_base_url: env::var("GEMINI_BASE_URL").unwrap_or_else(|_| {
                "https://generativelanguage.googleapis.com/v1beta".to_string()
            }),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-pro".to_string()),
            youtube_api_key: optional_secret("YOUTUBE_API_KEY"),
            youtube_base_url: env::var("YOUTUBE_BASE_URL")
                .unwrap_or_else(|_| "https://www.googleapis.com/youtube/v3".to_string()),
            ytdlp_path: env::var("YTDLP_PATH").unwrap_or_else(|_| "yt-dlp".to_string()),
            web_search_url: env::var("WEB_SEARCH_URL")
                .unwrap_or_else(|_| "https://html.duckduckgo.com/html/".to_string()),
            provider_timeout_secs: env::var("PROVIDER_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|s| *s > 0)
                .unwrap_or(20),
            resolver_concurrency: env::var("RESOLVER_CONCURRENCY")
                .ok()
                .and_then(|c| c.parse::<usize>().ok())
                .unwrap_or(4)
                .clamp(1, 8),
            accept_cached: env::var("ACCEPT_CACHED")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(true),
            remediation_resource_limit: env::var("REMEDIATION_RESOURCE_LIMIT")
                .ok()
                .and_then(|l| l.parse().ok())
                .unwrap_or(3),
        }
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    /// Logs which external providers will be attempted. Missing keys are not
    /// fatal: the chain falls through to the local generator.
    pub fn log_provider_availability(&self) {
        let status = |key: &Option<SecretString>| if key.is_some() { "configured" } else { "missing" };
        log::info!(
            "Provider keys: openai={}, gemini={}, youtube={}",
            status(&self.openai_api_key),
            status(&self.gemini_api_key),
            status(&self.youtube_api_key)
        );
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "studyhub-test".to_string(),
            archive_index_collection: "archive_index".to_string(),
            archive_payload_collection: "archive_payloads".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            cors_allowed_origins: vec!["http://localhost:3000".to_string()],
            openai_api_key: None,
            openai_base_url: "http://127.0.0.1:9/v1".to_string(),
            openai_model: "gpt-4o-mini".to_string(),
            gemini_api_key: None,
            gemini_base_url: "http://127.0.0.1:9/v1beta".to_string(),
            gemini_model: "gemini-1.5-pro".to_string(),
            youtube_api_key: None,
            youtube_base_url: "http://127.0.0.1:9/youtube/v3".to_string(),
            ytdlp_path: "yt-dlp-not-installed".to_string(),
            web_search_url: "http://127.0.0.1:9/html/".to_string(),
            provider_timeout_secs: 2,
            resolver_concurrency: 2,
            accept_cached: true,
            remediation_resource_limit: 3,
        }
    }
}
