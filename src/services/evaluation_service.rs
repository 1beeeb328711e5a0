use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;

use crate::{
    config::Config,
    constants::study_resources::{REVIEW_TIPS, SKIPPED_TIP},
    errors::{AppError, AppResult},
    models::domain::{
        content_item::hash_hex,
        evaluation::{percentage, ConceptAccuracy, Mistake, MistakeCategory, QuestionOutcome},
        ArchiveKey, ContentItem, ContentKind, EvaluationResult, MaterialItem, QuizLifecycle,
        QuizQuestion,
    },
    providers::{Capability, TopicRequest},
    services::{archive_store::ArchiveStore, resolver::FallbackChainResolver},
};

/// Scores submitted answers against an archived quiz and annotates mistakes
/// with study resources from the material-search chain.
pub struct EvaluationService {
    archive: Arc<ArchiveStore>,
    resolver: Arc<FallbackChainResolver>,
    remediation_limit: usize,
}

pub fn classify(question: &QuizQuestion, submitted: &str) -> MistakeCategory {
    if submitted.trim().is_empty() {
        MistakeCategory::Skipped
    } else if question.is_listed_option(submitted) {
        MistakeCategory::ConceptualConfusion
    } else {
        MistakeCategory::CarelessError
    }
}

/// Same concept, same template.
pub fn review_tip(category: MistakeCategory, concept: &str, submitted: &str, correct: &str) -> String {
    let template = if category == MistakeCategory::Skipped || REVIEW_TIPS.is_empty() {
        SKIPPED_TIP
    } else {
        let digest = hash_hex(concept);
        let slot = u64::from_str_radix(&digest[..8], 16).unwrap_or(0) as usize % REVIEW_TIPS.len();
        REVIEW_TIPS[slot]
    };

    template
        .replace("{concept}", concept)
        .replace("{your_answer}", submitted)
        .replace("{correct_answer}", correct)
}

fn concept_accuracy(outcomes: &[QuestionOutcome]) -> Vec<ConceptAccuracy> {
    let mut order: Vec<&str> = Vec::new();
    let mut tally: HashMap<&str, (usize, usize)> = HashMap::new();

    for outcome in outcomes {
        let entry = tally.entry(outcome.concept.as_str()).or_insert_with(|| {
            order.push(outcome.concept.as_str());
            (0, 0)
        });
        entry.1 += 1;
        if outcome.is_correct {
            entry.0 += 1;
        }
    }

    order
        .into_iter()
        .map(|concept| {
            let (correct, attempted) = tally.get(concept).copied().unwrap_or_default();
            ConceptAccuracy {
                concept: concept.to_string(),
                correct,
                attempted,
                accuracy: percentage(correct, attempted),
            }
        })
        .collect()
}

impl EvaluationService {
    pub fn new(archive: Arc<ArchiveStore>, resolver: Arc<FallbackChainResolver>, config: &Config) -> Self {
        Self {
            archive,
            resolver,
            remediation_limit: config.remediation_resource_limit,
        }
    }

    pub async fn evaluate(
        &self,
        key: &ArchiveKey,
        answers: &HashMap<String, String>,
    ) -> AppResult<EvaluationResult> {
        if key.content_kind != ContentKind::Quiz {
            return Err(AppError::ValidationError(format!(
                "Only quizzes can be evaluated, got {}",
                key.content_kind.as_str()
            )));
        }

        let entry = self.archive.load(key).await?;
        let lifecycle = QuizLifecycle::Archived.advance_to(QuizLifecycle::Evaluated)?;

        let known: HashSet<&str> = entry.questions().map(|q| q.id.as_str()).collect();
        let mut unmatched_ids: Vec<String> = answers
            .keys()
            .filter(|id| !known.contains(id.as_str()))
            .cloned()
            .collect();
        unmatched_ids.sort();
        for id in &unmatched_ids {
            log::warn!("Ignoring answer for unknown question '{}' in {}", id, key.key_id());
        }

        let mut outcomes = Vec::new();
        let mut mistakes = Vec::new();
        for question in entry.questions() {
            let Some(submitted) = answers.get(&question.id) else {
                continue;
            };
            let is_correct = *submitted == question.correct_answer;

            outcomes.push(QuestionOutcome {
                question_id: question.id.clone(),
                concept: question.concept.clone(),
                submitted_answer: submitted.clone(),
                correct_answer: question.correct_answer.clone(),
                is_correct,
            });

            if !is_correct {
                let category = classify(question, submitted);
                mistakes.push(Mistake {
                    question_id: question.id.clone(),
                    question_text: question.question_text.clone(),
                    concept: question.concept.clone(),
                    submitted_answer: submitted.clone(),
                    correct_answer: question.correct_answer.clone(),
                    category,
                    review_tip: review_tip(
                        category,
                        &question.concept,
                        submitted,
                        &question.correct_answer,
                    ),
                    remediation_resources: Vec::new(),
                });
            }
        }

        let resources = self.remediation(&key.subject_id, &mistakes).await;
        for mistake in &mut mistakes {
            if let Some(found) = resources.get(&mistake.concept) {
                mistake.remediation_resources = found.clone();
            }
        }

        let correct_count = outcomes.iter().filter(|o| o.is_correct).count();
        let total_matched = outcomes.len();
        let score = percentage(correct_count, total_matched);

        log::info!(
            "Evaluated {}: {}/{} correct ({:.1}%), {} unmatched",
            key.key_id(),
            correct_count,
            total_matched,
            score,
            unmatched_ids.len()
        );

        Ok(EvaluationResult {
            archive_key: key.clone(),
            concept_accuracy: concept_accuracy(&outcomes),
            per_question_outcome: outcomes,
            correct_count,
            total_matched,
            score,
            mistakes,
            unmatched_ids,
            lifecycle,
            evaluated_at: Utc::now(),
        })
    }

    /// One material-search resolution per distinct concept. A failed
    /// resolution yields no resources for that concept.
    async fn remediation(&self, subject_id: &str, mistakes: &[Mistake]) -> HashMap<String, Vec<MaterialItem>> {
        let mut concepts: Vec<&str> = Vec::new();
        for mistake in mistakes {
            if !concepts.contains(&mistake.concept.as_str()) {
                concepts.push(mistake.concept.as_str());
            }
        }

        let lookups = concepts.iter().map(|concept| async move {
            let request = TopicRequest::for_concept(subject_id, concept, self.remediation_limit);
            let resources = match self.resolver.resolve(&request, Capability::MaterialSearch).await {
                Ok(result) => result
                    .items
                    .iter()
                    .filter_map(ContentItem::as_material)
                    .take(self.remediation_limit)
                    .cloned()
                    .collect(),
                Err(e) => {
                    log::warn!("No remediation resources for '{}': {}", concept, e);
                    Vec::new()
                }
            };
            (concept.to_string(), resources)
        });

        join_all(lookups).await.into_iter().collect()
    }
}
