use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use crate::config::Config;
use crate::models::domain::{ContentItem, VideoItem};
use crate::providers::{Capability, Provider, ProviderFailure, TopicRequest};

#[derive(Debug, Deserialize)]
struct YtDlpEntry {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    webpage_url: Option<String>,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    uploader: Option<String>,
    #[serde(default)]
    view_count: Option<u64>,
    #[serde(default)]
    like_count: Option<u64>,
    #[serde(default)]
    comment_count: Option<u64>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    thumbnail: Option<String>,
}

impl YtDlpEntry {
    fn into_item(self) -> Option<VideoItem> {
        let video_url = self
            .webpage_url
            .filter(|u| !u.is_empty())
            .or_else(|| (!self.id.is_empty()).then(|| format!("https://www.youtube.com/watch?v={}", self.id)))?;
        if self.title.trim().is_empty() {
            return None;
        }
        Some(VideoItem {
            title: self.title,
            video_url,
            channel: self.channel.or(self.uploader).unwrap_or_default(),
            views: self.view_count.unwrap_or(0),
            likes: self.like_count.unwrap_or(0),
            comment_count: self.comment_count.unwrap_or(0),
            description: self.description.unwrap_or_default(),
            thumbnail_url: self.thumbnail.unwrap_or_default(),
        })
    }
}

/// Parses `--dump-json` output: one JSON document per line.
pub fn parse_dump(stdout: &str) -> Vec<VideoItem> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| serde_json::from_str::<YtDlpEntry>(line).ok())
        .filter_map(YtDlpEntry::into_item)
        .collect()
}

/// Fallback video search that shells out to the `yt-dlp` CLI.
pub struct YtDlpProvider {
    binary: String,
}

impl YtDlpProvider {
    pub fn new(config: &Config) -> Self {
        Self {
            binary: config.ytdlp_path.clone(),
        }
    }
}

#[async_trait]
impl Provider for YtDlpProvider {
    fn id(&self) -> String {
        "yt-dlp".to_string()
    }

    fn capability(&self) -> Capability {
        Capability::VideoSearch
    }

    async fn attempt(&self, request: &TopicRequest) -> Result<Vec<ContentItem>, ProviderFailure> {
        let search = format!(
            "ytsearch{}:{} tutorial",
            request.count.max(1),
            request.search_query()
        );

        let output = Command::new(&self.binary)
            .args([
                "--dump-json",
                "--no-playlist",
                "--skip-download",
                "--no-warnings",
                "--quiet",
                search.as_str(),
            ])
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ProviderFailure::Process(format!("could not run {}: {}", self.binary, e)))?;

        if !output.status.success() {
            return Err(ProviderFailure::Process(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(parse_dump(&String::from_utf8_lossy(&output.stdout))
            .into_iter()
            .map(ContentItem::Video)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::{Difficulty, ItemType};

    #[test]
    fn test_parse_dump_reads_each_line() {
        let stdout = concat!(
            r#"{"id":"a1","title":"Paging","webpage_url":"https://www.youtube.com/watch?v=a1","uploader":"Prof","view_count":12}"#,
            "\n",
            "not json\n",
            r#"{"id":"b2","title":"Segmentation","channel":"OS Channel"}"#,
            "\n",
            r#"{"id":"","title":"No url"}"#,
            "\n"
        );
        let items = parse_dump(stdout);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].channel, "Prof");
        assert_eq!(items[0].views, 12);
        assert_eq!(items[1].video_url, "https://www.youtube.com/watch?v=b2");
        assert_eq!(items[1].channel, "OS Channel");
    }

    #[tokio::test]
    async fn test_missing_binary_is_process_failure() {
        let provider = YtDlpProvider::new(&Config::test_config());
        let request = TopicRequest {
            subject_id: "OS".to_string(),
            topic: "Paging".to_string(),
            count: 2,
            difficulty: Difficulty::Easy,
            item_types: vec![ItemType::Mcq],
        };

        assert!(matches!(
            provider.attempt(&request).await,
            Err(ProviderFailure::Process(_))
        ));
    }
}
