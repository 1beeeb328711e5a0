use schemars::JsonSchema;
use serde::Deserialize;

use crate::models::domain::{
    ContentItem, ItemType, MaterialItem, MaterialType, QuizQuestion,
};
use crate::providers::{ProviderFailure, TopicRequest};

/// Question shape AI providers are asked to return.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GeneratedQuestion {
    #[serde(alias = "question_text")]
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(alias = "answer")]
    pub correct_answer: String,
    #[serde(default)]
    pub concept: Option<String>,
    #[serde(default, alias = "type")]
    pub question_type: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// Study resource shape AI providers are asked to return.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GeneratedMaterial {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub source: String,
    #[serde(default, alias = "type")]
    pub material_type: Option<String>,
}

/// Slice from the first `[` to the last `]`. AI replies often wrap the array in
/// prose or markdown fences.
pub fn extract_json_array(text: &str) -> Result<&str, ProviderFailure> {
    let start = text.find('[');
    let end = text.rfind(']');
    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok(&text[start..=end]),
        _ => Err(ProviderFailure::Parse(
            "reply does not contain a JSON array".to_string(),
        )),
    }
}

pub fn question_schema() -> String {
    serde_json::to_string(&schemars::schema_for!(GeneratedQuestion)).unwrap_or_default()
}

pub fn material_schema() -> String {
    serde_json::to_string(&schemars::schema_for!(GeneratedMaterial)).unwrap_or_default()
}

fn item_type_from_label(label: Option<&str>) -> ItemType {
    let label = label
        .unwrap_or("mcq")
        .trim()
        .to_ascii_lowercase()
        .replace(['-', ' ', '/'], "_");
    match label.as_str() {
        "true_false" | "truefalse" | "boolean" => ItemType::TrueFalse,
        "fill_blank" | "fill_in_the_blank" | "fill_in_blank" => ItemType::FillBlank,
        "code_output" | "code" => ItemType::CodeOutput,
        _ => ItemType::Mcq,
    }
}

fn material_type_from_label(label: Option<&str>) -> MaterialType {
    match label.map(|l| l.trim().to_ascii_lowercase()).as_deref() {
        Some("video") => MaterialType::Video,
        Some("notes") | Some("pdf") | Some("slides") => MaterialType::Notes,
        Some("practice") | Some("exercise") => MaterialType::Practice,
        _ => MaterialType::Article,
    }
}

impl GeneratedQuestion {
    /// Converts into a domain question, or `None` when the question is
    /// malformed or of a type the request did not ask for.
    pub fn into_question(self, request: &TopicRequest) -> Option<QuizQuestion> {
        let item_type = item_type_from_label(self.question_type.as_deref());
        if !request.item_types.contains(&item_type) {
            return None;
        }

        let question = QuizQuestion {
            id: String::new(),
            question_text: self.question.trim().to_string(),
            options: self.options.into_iter().map(|o| o.trim().to_string()).collect(),
            correct_answer: self.correct_answer.trim().to_string(),
            concept: self
                .concept
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| request.topic.clone()),
            difficulty: request.difficulty,
            item_type,
            explanation: self.explanation.filter(|e| !e.trim().is_empty()),
        };

        match question.check_shape() {
            Ok(()) => Some(question),
            Err(reason) => {
                log::debug!("Dropping generated question '{}': {}", question.question_text, reason);
                None
            }
        }
    }
}

impl GeneratedMaterial {
    pub fn into_material(self) -> Option<MaterialItem> {
        let url = self.url.trim().to_string();
        if self.title.trim().is_empty() || !(url.starts_with("https://") || url.starts_with("http://")) {
            return None;
        }
        Some(MaterialItem {
            title: self.title.trim().to_string(),
            url,
            description: self.description.trim().to_string(),
            source: self.source.trim().to_string(),
            material_type: material_type_from_label(self.material_type.as_deref()),
        })
    }
}

/// Parses an AI reply into questions. Individual malformed entries are dropped;
/// a reply without any JSON array is a failure.
pub fn parse_questions(
    text: &str,
    request: &TopicRequest,
) -> Result<Vec<ContentItem>, ProviderFailure> {
    let raw: Vec<serde_json::Value> = serde_json::from_str(extract_json_array(text)?)?;
    Ok(raw
        .into_iter()
        .filter_map(|value| serde_json::from_value::<GeneratedQuestion>(value).ok())
        .filter_map(|q| q.into_question(request))
        .map(ContentItem::Question)
        .collect())
}

pub fn parse_materials(text: &str) -> Result<Vec<ContentItem>, ProviderFailure> {
    let raw: Vec<serde_json::Value> = serde_json::from_str(extract_json_array(text)?)?;
    Ok(raw
        .into_iter()
        .filter_map(|value| serde_json::from_value::<GeneratedMaterial>(value).ok())
        .filter_map(GeneratedMaterial::into_material)
        .map(ContentItem::Material)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::Difficulty;

    fn request(types: Vec<ItemType>) -> TopicRequest {
        TopicRequest {
            subject_id: "315319-OPERATING SYSTEM".to_string(),
            topic: "Unit 3".to_string(),
            count: 3,
            difficulty: Difficulty::Hard,
            item_types: types,
        }
    }

    #[test]
    fn test_extract_json_array_from_fenced_reply() {
        let text = "Here you go:\n```json\n[{\"a\": 1}]\n```";
        assert_eq!(extract_json_array(text).expect("array"), "[{\"a\": 1}]");
        assert!(extract_json_array("no json here").is_err());
        assert!(extract_json_array("] backwards [").is_err());
    }

    #[test]
    fn test_parse_questions_drops_malformed_entries() {
        let text = r#"[
            {"question": "What is paging?", "options": ["Fixed blocks", "Variable blocks"], "correct_answer": "Fixed blocks", "concept": "Paging", "question_type": "mcq"},
            {"question": "Missing answer option", "options": ["A", "B"], "correct_answer": "C"},
            {"question": "Too few options", "options": ["A"], "correct_answer": "A"},
            {"not_a_question": true}
        ]"#;
        let items = parse_questions(text, &request(vec![ItemType::Mcq])).expect("reply should parse");

        assert_eq!(items.len(), 1);
        let q = items[0].as_question().expect("question item");
        assert_eq!(q.concept, "Paging");
        assert_eq!(q.difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_parse_questions_defaults_concept_and_filters_types() {
        let text = r#"[
            {"question": "Paging avoids external fragmentation.", "options": ["True", "False"], "correct_answer": "True", "question_type": "True/False"},
            {"question": "The unit of paging is a ____.", "options": [], "correct_answer": "page", "question_type": "fill-in-the-blank"}
        ]"#;
        let items = parse_questions(text, &request(vec![ItemType::FillBlank]))
            .expect("reply should parse");

        assert_eq!(items.len(), 1);
        let q = items[0].as_question().expect("question item");
        assert_eq!(q.item_type, ItemType::FillBlank);
        assert_eq!(q.concept, "Unit 3");
    }

    #[test]
    fn test_parse_materials_requires_http_urls() {
        let text = r#"[
            {"title": "Paging", "url": "https://example.org/paging", "source": "Example", "material_type": "notes"},
            {"title": "Broken", "url": "ftp://example.org/file"}
        ]"#;
        let items = parse_materials(text).expect("reply should parse");

        assert_eq!(items.len(), 1);
        let m = items[0].as_material().expect("material item");
        assert_eq!(m.material_type, MaterialType::Notes);
    }

    #[test]
    fn test_schemas_are_rendered() {
        assert!(question_schema().contains("correct_answer"));
        assert!(material_schema().contains("url"));
    }
}
