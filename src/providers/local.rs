use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::{
    question_bank::{bank_for_subject, QuestionStem, GENERIC_STEMS},
    study_resources::STUDY_SITES,
    syllabus,
};
use crate::models::domain::{ContentItem, ItemType, MaterialItem, QuizQuestion, VideoItem};
use crate::providers::{Capability, Provider, ProviderFailure, TopicRequest};

static UNIT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*unit\s*(\d+)\s*$").expect("UNIT_REGEX is a valid regex pattern")
});

const UNITS_PER_SUBJECT: usize = 5;
const YOUTUBE_SEARCH_URL: &str = "https://www.youtube.com/results";

const MATERIAL_VARIANTS: [&str; 5] = ["", " notes", " examples", " practice questions", " lecture"];
const VIDEO_VARIANTS: [&str; 5] = ["tutorial", "lecture", "explained", "examples", "crash course"];

/// A question before it is shaped into a concrete item type.
#[derive(Debug, Clone)]
struct Draft {
    question: String,
    correct_answer: String,
    distractors: Vec<String>,
    concept: String,
    explanation: String,
}

/// Terminal provider that synthesizes items from built-in banks and templates.
/// Output is deterministic and always holds exactly `count` distinct items.
pub struct LocalGenerator {
    capability: Capability,
}

impl LocalGenerator {
    pub fn new(capability: Capability) -> Self {
        Self { capability }
    }

    pub fn generate(&self, request: &TopicRequest) -> Vec<ContentItem> {
        match self.capability {
            Capability::QuizGeneration => questions(request),
            Capability::MaterialSearch => materials(request),
            Capability::VideoSearch => videos(request),
        }
    }
}

/// Curated questions are split across the units of a subject so two units of
/// one request never draw the same bank entry.
fn curated_drafts(request: &TopicRequest) -> Vec<Draft> {
    let unit_slot = UNIT_REGEX
        .captures(&request.topic)
        .and_then(|c| c[1].parse::<usize>().ok())
        .filter(|n| (1..=UNITS_PER_SUBJECT).contains(n))
        .map(|n| n - 1);
    let Some(slot) = unit_slot else {
        return Vec::new();
    };

    let concept = format!(
        "{} {}",
        syllabus::subject_name(&request.subject_id),
        request.topic.trim()
    );
    bank_for_subject(&request.subject_id)
        .iter()
        .enumerate()
        .filter(|(i, _)| i % UNITS_PER_SUBJECT == slot)
        .map(|(_, q)| Draft {
            question: q.question.to_string(),
            correct_answer: q.correct_answer.to_string(),
            distractors: q
                .options
                .iter()
                .filter(|o| **o != q.correct_answer)
                .map(|o| o.to_string())
                .collect(),
            concept: concept.clone(),
            explanation: q.explanation.to_string(),
        })
        .collect()
}

fn stem_drafts(request: &TopicRequest) -> Vec<Draft> {
    let subject = syllabus::subject_name(&request.subject_id);
    let concepts = request.concepts();
    GENERIC_STEMS
        .iter()
        .flat_map(|stem| {
            let subject = subject.clone();
            concepts.iter().map(move |concept| Draft {
                question: QuestionStem::fill(stem.question, concept, &subject),
                correct_answer: QuestionStem::fill(stem.correct_answer, concept, &subject),
                distractors: stem
                    .distractors
                    .iter()
                    .map(|d| QuestionStem::fill(d, concept, &subject))
                    .collect(),
                concept: concept.clone(),
                explanation: QuestionStem::fill(stem.explanation, concept, &subject),
            })
        })
        .collect()
}

fn shape(draft: Draft, item_type: ItemType, index: usize, request: &TopicRequest) -> QuizQuestion {
    let (question_text, options, correct_answer, item_type) = match item_type {
        ItemType::TrueFalse => {
            let claim_is_true = index % 2 == 0 || draft.distractors.is_empty();
            let claimed = if claim_is_true {
                draft.correct_answer.clone()
            } else {
                draft.distractors[0].clone()
            };
            (
                format!("True or false: \"{}\" is the answer to \"{}\"", claimed, draft.question),
                vec!["True".to_string(), "False".to_string()],
                if claim_is_true { "True" } else { "False" }.to_string(),
                ItemType::TrueFalse,
            )
        }
        ItemType::FillBlank => (
            format!("Fill in the blank: {} ____", draft.question),
            Vec::new(),
            draft.correct_answer.clone(),
            ItemType::FillBlank,
        ),
        // Code output questions need real code; the local bank renders them as multiple choice.
        ItemType::Mcq | ItemType::CodeOutput => {
            let mut options = draft.distractors.clone();
            options.truncate(3);
            let position = index % (options.len() + 1);
            options.insert(position, draft.correct_answer.clone());
            (draft.question.clone(), options, draft.correct_answer.clone(), ItemType::Mcq)
        }
    };

    QuizQuestion {
        id: String::new(),
        question_text,
        options,
        correct_answer,
        concept: draft.concept,
        difficulty: request.difficulty,
        item_type,
        explanation: Some(draft.explanation),
    }
}

fn questions(request: &TopicRequest) -> Vec<ContentItem> {
    let mut drafts = curated_drafts(request);
    drafts.extend(stem_drafts(request));
    let types = if request.item_types.is_empty() {
        vec![ItemType::Mcq]
    } else {
        request.item_types.clone()
    };

    // Once every draft is used, later rounds repeat them as numbered review sets.
    let pool_size = drafts.len();
    (0..request.count)
        .map(|i| {
            let mut draft = drafts[i % pool_size].clone();
            let round = i / pool_size;
            if round > 0 {
                draft.question = format!("{} (review set {})", draft.question, round + 1);
            }
            let item_type = types[i % types.len()];
            ContentItem::Question(shape(draft, item_type, i, request))
        })
        .collect()
}

fn variant(variants: &[&'static str], round: usize) -> String {
    variants
        .get(round)
        .map(|v| v.to_string())
        .unwrap_or_else(|| format!(" part {}", round + 1 - variants.len()))
}

fn materials(request: &TopicRequest) -> Vec<ContentItem> {
    let subject = syllabus::subject_name(&request.subject_id);
    let concepts = request.concepts();
    let per_round = concepts.len() * STUDY_SITES.len();

    (0..request.count)
        .map(|i| {
            let round = i / per_round;
            let concept = &concepts[(i % per_round) / STUDY_SITES.len()];
            let site = &STUDY_SITES[i % STUDY_SITES.len()];
            let suffix = variant(&MATERIAL_VARIANTS, round);
            ContentItem::Material(MaterialItem {
                title: format!("{}{} - {}", concept, suffix, site.name),
                url: site.link_for(&format!("{} {}{}", subject, concept, suffix)),
                description: format!("Search results for {}{} on {}", concept, suffix, site.name),
                source: site.name.to_string(),
                material_type: site.material_type,
            })
        })
        .collect()
}

fn videos(request: &TopicRequest) -> Vec<ContentItem> {
    let subject = syllabus::subject_name(&request.subject_id);
    let concepts = request.concepts();

    (0..request.count)
        .map(|i| {
            let concept = &concepts[i % concepts.len()];
            let label = variant(&VIDEO_VARIANTS, i / concepts.len());
            let label = label.trim();
            let query = format!("{} {} {}", subject, concept, label);
            let video_url = reqwest::Url::parse_with_params(YOUTUBE_SEARCH_URL, &[("search_query", query.as_str())])
                .map(|u| u.to_string())
                .unwrap_or_else(|_| YOUTUBE_SEARCH_URL.to_string());
            ContentItem::Video(VideoItem {
                title: format!("{} {} - YouTube search", concept, label),
                video_url,
                channel: "YouTube".to_string(),
                views: 0,
                likes: 0,
                comment_count: 0,
                description: format!("Video results for {} in {}", concept, subject),
                thumbnail_url: String::new(),
            })
        })
        .collect()
}

#[async_trait]
impl Provider for LocalGenerator {
    fn id(&self) -> String {
        match self.capability {
            Capability::QuizGeneration => "local-quiz-bank",
            Capability::MaterialSearch => "local-study-sites",
            Capability::VideoSearch => "local-video-links",
        }
        .to_string()
    }

    fn capability(&self) -> Capability {
        self.capability
    }

    fn is_terminal(&self) -> bool {
        true
    }

    async fn attempt(&self, request: &TopicRequest) -> Result<Vec<ContentItem>, ProviderFailure> {
        Ok(self.generate(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::Difficulty;
    use std::collections::HashSet;

    fn request(topic: &str, count: usize, types: Vec<ItemType>) -> TopicRequest {
        TopicRequest {
            subject_id: "315319-OPERATING SYSTEM".to_string(),
            topic: topic.to_string(),
            count,
            difficulty: Difficulty::Medium,
            item_types: types,
        }
    }

    fn keys(items: &[ContentItem]) -> HashSet<String> {
        items.iter().map(ContentItem::dedup_key).collect()
    }

    #[test]
    fn test_quiz_fills_quota_with_distinct_questions() {
        let generator = LocalGenerator::new(Capability::QuizGeneration);
        for count in [1, 7, 40, 100] {
            let items = generator.generate(&request("Unit 3", count, vec![ItemType::Mcq]));
            assert_eq!(items.len(), count);
            assert_eq!(keys(&items).len(), count);
            assert!(items
                .iter()
                .all(|i| i.as_question().is_some_and(|q| q.check_shape().is_ok())));
        }
    }

    #[test]
    fn test_quiz_is_deterministic() {
        let generator = LocalGenerator::new(Capability::QuizGeneration);
        let req = request("Unit 2", 12, vec![ItemType::Mcq, ItemType::TrueFalse]);
        assert_eq!(generator.generate(&req), generator.generate(&req));
    }

    #[test]
    fn test_units_do_not_share_questions() {
        let generator = LocalGenerator::new(Capability::QuizGeneration);
        let unit1 = keys(&generator.generate(&request("Unit 1", 60, vec![ItemType::Mcq])));
        let unit2 = keys(&generator.generate(&request("Unit 2", 60, vec![ItemType::Mcq])));
        assert!(unit1.is_disjoint(&unit2));
    }

    #[test]
    fn test_quiz_cycles_requested_item_types() {
        let generator = LocalGenerator::new(Capability::QuizGeneration);
        let items = generator.generate(&request(
            "Deadlocks",
            6,
            vec![ItemType::Mcq, ItemType::TrueFalse, ItemType::FillBlank],
        ));
        let types: Vec<ItemType> = items
            .iter()
            .filter_map(|i| i.as_question().map(|q| q.item_type))
            .collect();

        assert_eq!(
            types,
            vec![
                ItemType::Mcq,
                ItemType::TrueFalse,
                ItemType::FillBlank,
                ItemType::Mcq,
                ItemType::TrueFalse,
                ItemType::FillBlank
            ]
        );
        assert!(items
            .iter()
            .all(|i| i.as_question().is_some_and(|q| q.check_shape().is_ok())));
    }

    #[test]
    fn test_units_beyond_the_catalog_do_not_reuse_curated_questions() {
        let generator = LocalGenerator::new(Capability::QuizGeneration);
        let first = keys(&generator.generate(&request("Unit 1", 10, vec![ItemType::Mcq])));
        let sixth = keys(&generator.generate(&request("Unit 6", 10, vec![ItemType::Mcq])));

        assert_eq!(sixth.len(), 10);
        assert!(first.is_disjoint(&sixth));
    }

    #[test]
    fn test_free_text_topic_uses_topic_as_concept() {
        let generator = LocalGenerator::new(Capability::QuizGeneration);
        let items = generator.generate(&request("Deadlocks", 3, vec![ItemType::Mcq]));
        let q = items[0].as_question().expect("question item");

        assert_eq!(q.concept, "Deadlocks");
        assert!(q.question_text.contains("Deadlocks"));
    }

    #[test]
    fn test_materials_and_videos_fill_quota() {
        for capability in [Capability::MaterialSearch, Capability::VideoSearch] {
            let generator = LocalGenerator::new(capability);
            for count in [1, 5, 45] {
                let items = generator.generate(&request("Paging", count, vec![]));
                assert_eq!(items.len(), count);
                assert_eq!(keys(&items).len(), count, "{:?} count {}", capability, count);
            }
        }
    }

    #[tokio::test]
    async fn test_attempt_never_fails() {
        let generator = LocalGenerator::new(Capability::MaterialSearch);
        assert!(generator.is_terminal());
        let items = generator
            .attempt(&request("Unit 4", 4, vec![]))
            .await
            .expect("local generator should not fail");
        assert_eq!(items.len(), 4);
    }
}
