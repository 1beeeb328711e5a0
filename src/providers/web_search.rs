use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::Config;
use crate::models::domain::{ContentItem, MaterialItem, MaterialType};
use crate::providers::{Capability, Provider, ProviderFailure, TopicRequest};

static RESULT_LINK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<a[^>]*class="result__a"[^>]*href="([^"]+)"[^>]*>(.*?)</a>"#)
        .expect("RESULT_LINK_REGEX is a valid regex pattern")
});

static RESULT_SNIPPET_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<a[^>]*class="result__snippet"[^>]*>(.*?)</a>"#)
        .expect("RESULT_SNIPPET_REGEX is a valid regex pattern")
});

static TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]+>").expect("TAG_REGEX is a valid regex pattern"));

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Fallback material search that scrapes an HTML search results page.
pub struct WebSearchProvider {
    http: reqwest::Client,
    search_url: String,
}

fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
}

fn clean_text(html: &str) -> String {
    decode_entities(&TAG_REGEX.replace_all(html, ""))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Unwraps redirect links of the form `//duckduckgo.com/l/?uddg=<target>`.
fn resolve_href(href: &str) -> Option<String> {
    let href = decode_entities(href);
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href
    };
    let url = reqwest::Url::parse(&absolute).ok()?;
    let target = url
        .query_pairs()
        .find(|(name, _)| name == "uddg")
        .map(|(_, value)| value.into_owned())
        .unwrap_or(absolute);

    if target.starts_with("http://") || target.starts_with("https://") {
        Some(target)
    } else {
        None
    }
}

fn classify(url: &str) -> MaterialType {
    let lower = url.to_ascii_lowercase();
    if lower.contains("youtube.com") || lower.contains("youtu.be") {
        MaterialType::Video
    } else if lower.ends_with(".pdf") || lower.contains("slideshare") {
        MaterialType::Notes
    } else if lower.contains("practice") || lower.contains("quiz") || lower.contains("mcq") {
        MaterialType::Practice
    } else {
        MaterialType::Article
    }
}

fn source_name(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
        .unwrap_or_default()
}

/// Extracts result links from a search results page, skipping ads.
pub fn parse_results(html: &str, limit: usize) -> Vec<MaterialItem> {
    let snippets: Vec<String> = RESULT_SNIPPET_REGEX
        .captures_iter(html)
        .map(|c| clean_text(&c[1]))
        .collect();

    RESULT_LINK_REGEX
        .captures_iter(html)
        .enumerate()
        .filter_map(|(i, caps)| {
            let url = resolve_href(&caps[1])?;
            if url.contains("duckduckgo.com/y.js") {
                return None;
            }
            let title = clean_text(&caps[2]);
            if title.is_empty() {
                return None;
            }
            Some(MaterialItem {
                title,
                description: snippets.get(i).cloned().unwrap_or_default(),
                source: source_name(&url),
                material_type: classify(&url),
                url,
            })
        })
        .take(limit)
        .collect()
}

impl WebSearchProvider {
    pub fn new(config: &Config, http: reqwest::Client) -> Self {
        Self {
            http,
            search_url: config.web_search_url.clone(),
        }
    }
}

#[async_trait]
impl Provider for WebSearchProvider {
    fn id(&self) -> String {
        "web-search".to_string()
    }

    fn capability(&self) -> Capability {
        Capability::MaterialSearch
    }

    async fn attempt(&self, request: &TopicRequest) -> Result<Vec<ContentItem>, ProviderFailure> {
        let query = format!("{} tutorial notes", request.search_query());
        let response = self
            .http
            .get(&self.search_url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .query(&[("q", query.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderFailure::Status {
                status: status.as_u16(),
                body: String::new(),
            });
        }

        let html = response.text().await?;
        Ok(parse_results(&html, request.count)
            .into_iter()
            .map(ContentItem::Material)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"
        <div class="result">
          <a rel="nofollow" class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.geeksforgeeks.org%2Fpaging-in-operating-system%2F&amp;rut=abc">Paging in <b>Operating System</b></a>
          <a class="result__snippet" href="#">Paging is a memory management scheme &amp; more.</a>
        </div>
        <div class="result">
          <a rel="nofollow" class="result__a" href="https://duckduckgo.com/y.js?ad_provider=x">Sponsored</a>
          <a class="result__snippet" href="#">Ad</a>
        </div>
        <div class="result">
          <a rel="nofollow" class="result__a" href="https://www.youtube.com/watch?v=abc">Paging explained</a>
          <a class="result__snippet" href="#">Video lecture</a>
        </div>
    "##;

    #[test]
    fn test_parse_results_unwraps_redirects_and_skips_ads() {
        let items = parse_results(SAMPLE, 10);

        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0].url,
            "https://www.geeksforgeeks.org/paging-in-operating-system/"
        );
        assert_eq!(items[0].title, "Paging in Operating System");
        assert_eq!(items[0].description, "Paging is a memory management scheme & more.");
        assert_eq!(items[0].source, "geeksforgeeks.org");
        assert_eq!(items[0].material_type, MaterialType::Article);
        assert_eq!(items[1].material_type, MaterialType::Video);
    }

    #[test]
    fn test_parse_results_respects_limit() {
        assert_eq!(parse_results(SAMPLE, 1).len(), 1);
        assert!(parse_results("<html></html>", 5).is_empty());
    }
}
