use async_graphql::{Enum, SimpleObject, Union};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::models::domain::quiz_question::QuizQuestion;

static WHITESPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("WHITESPACE_REGEX is a valid regex pattern"));

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Enum, Copy)]
#[serde(rename_all = "snake_case")]
pub enum MaterialType {
    Article,
    Video,
    Notes,
    Practice,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct MaterialItem {
    pub title: String,
    pub url: String,
    pub description: String,
    pub source: String,
    pub material_type: MaterialType,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct VideoItem {
    pub title: String,
    pub video_url: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comment_count: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail_url: String,
}

/// One candidate or archived item of any content kind.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Union)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentItem {
    Question(QuizQuestion),
    Material(MaterialItem),
    Video(VideoItem),
}

/// Trims and collapses inner whitespace, keeping case.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text.trim(), " ").into_owned()
}

/// Lowercases, trims and collapses inner whitespace.
pub fn normalize(text: &str) -> String {
    collapse_whitespace(text).to_lowercase()
}

pub fn hash_hex(input: &str) -> String {
    format!("{:x}", Sha256::digest(input.as_bytes()))
}

impl ContentItem {
    /// Content-derived identity used by the uniqueness filter. Questions are
    /// keyed on text plus correct answer, links on their URL.
    pub fn dedup_key(&self) -> String {
        let raw = match self {
            ContentItem::Question(q) => {
                format!("{}|{}", normalize(&q.question_text), normalize(&q.correct_answer))
            }
            ContentItem::Material(m) if !m.url.trim().is_empty() => {
                format!("url|{}", normalize(&m.url))
            }
            ContentItem::Material(m) => format!("title|{}", normalize(&m.title)),
            ContentItem::Video(v) if !v.video_url.trim().is_empty() => {
                format!("url|{}", normalize(&v.video_url))
            }
            ContentItem::Video(v) => format!("title|{}", normalize(&v.title)),
        };
        hash_hex(&raw)
    }

    pub fn as_question(&self) -> Option<&QuizQuestion> {
        match self {
            ContentItem::Question(q) => Some(q),
            _ => None,
        }
    }

    pub fn as_material(&self) -> Option<&MaterialItem> {
        match self {
            ContentItem::Material(m) => Some(m),
            _ => None,
        }
    }
}
