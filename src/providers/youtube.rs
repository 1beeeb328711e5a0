use std::collections::HashMap;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::Config;
use crate::models::domain::{ContentItem, VideoItem};
use crate::providers::{Capability, Provider, ProviderFailure, TopicRequest};

const MAX_RESULTS: usize = 50;

#[derive(Debug, Deserialize)]
struct SearchReply {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    #[serde(default)]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideosReply {
    #[serde(default)]
    items: Vec<VideoResource>,
}

#[derive(Debug, Deserialize)]
struct VideoResource {
    id: String,
    snippet: VideoSnippet,
    #[serde(default)]
    statistics: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    channel_title: String,
    #[serde(default)]
    thumbnails: HashMap<String, Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

impl VideoResource {
    fn stat(&self, name: &str) -> u64 {
        self.statistics
            .get(name)
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    fn into_item(self) -> VideoItem {
        let thumbnail_url = ["high", "medium", "default"]
            .iter()
            .find_map(|size| self.snippet.thumbnails.get(*size))
            .map(|t| t.url.clone())
            .unwrap_or_default();

        VideoItem {
            views: self.stat("viewCount"),
            likes: self.stat("likeCount"),
            comment_count: self.stat("commentCount"),
            video_url: format!("https://www.youtube.com/watch?v={}", self.id),
            title: self.snippet.title,
            channel: self.snippet.channel_title,
            description: self.snippet.description,
            thumbnail_url,
        }
    }
}

/// Primary video search through the YouTube Data API: a search call for ids
/// followed by a videos call for statistics.
pub struct YouTubeApiProvider {
    http: reqwest::Client,
    api_key: Option<SecretString>,
    base_url: String,
}

impl YouTubeApiProvider {
    pub fn new(config: &Config, http: reqwest::Client) -> Self {
        Self {
            http,
            api_key: config.youtube_api_key.clone(),
            base_url: config.youtube_base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ProviderFailure> {
        let response = self
            .http
            .get(format!("{}/{}", self.base_url, path))
            .query(params)
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
        Ok(response.json().await?)
    }
}

#[async_trait]
impl Provider for YouTubeApiProvider {
    fn id(&self) -> String {
        "youtube-api".to_string()
    }

    fn capability(&self) -> Capability {
        Capability::VideoSearch
    }

    async fn attempt(&self, request: &TopicRequest) -> Result<Vec<ContentItem>, ProviderFailure> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| ProviderFailure::NotConfigured("YOUTUBE_API_KEY is not set".to_string()))?;
        let key = api_key.expose_secret();
        let query = format!("{} tutorial", request.search_query());
        let max_results = request.count.clamp(1, MAX_RESULTS).to_string();

        let search: SearchReply = self
            .get_json(
                "search",
                &[
                    ("part", "id,snippet"),
                    ("type", "video"),
                    ("order", "relevance"),
                    ("q", query.as_str()),
                    ("maxResults", max_results.as_str()),
                    ("key", key),
                ],
            )
            .await?;

        let ids: Vec<String> = search.items.into_iter().filter_map(|i| i.id.video_id).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let joined = ids.join(",");
        let videos: VideosReply = self
            .get_json(
                "videos",
                &[("part", "snippet,statistics"), ("id", joined.as_str()), ("key", key)],
            )
            .await?;

        Ok(videos
            .items
            .into_iter()
            .map(|v| ContentItem::Video(v.into_item()))
            .collect())
    }
}
