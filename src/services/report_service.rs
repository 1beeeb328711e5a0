use chrono::Utc;

use crate::{
    constants::syllabus,
    errors::AppResult,
    models::domain::{report::ReportMistake, EvaluationResult, ReportDocument},
};

const WEAK_CONCEPT_THRESHOLD: f64 = 70.0;

const EXCELLENT_PLAN: &[&str] = &[
    "Maintain your high level of performance",
    "Challenge yourself with advanced problems",
    "Help others learn by explaining concepts",
    "Explore advanced topics in the subject",
];

const GOOD_PLAN: &[&str] = &[
    "Review mistakes and understand why they occurred",
    "Focus on weak areas identified in the analysis",
    "Use the provided study resources",
    "Practice with similar questions",
];

const IMPROVEMENT_PLAN: &[&str] = &[
    "Thoroughly review all incorrect answers",
    "Focus on fundamental concepts first",
    "Use basic study resources before advanced ones",
    "Break down complex topics into smaller parts",
    "Practice regularly with simpler questions first",
];

/// Consumes an evaluation and produces a document. Rendering formats beyond
/// the structured document live behind this trait.
pub trait ReportAssembler: Send + Sync {
    fn assemble(&self, evaluation: &EvaluationResult) -> ReportDocument;

    fn content_type(&self) -> &'static str;

    fn render(&self, report: &ReportDocument) -> AppResult<Vec<u8>>;
}

pub fn grade(score: f64) -> &'static str {
    if score >= 90.0 {
        "Excellent"
    } else if score >= 80.0 {
        "Good"
    } else if score >= 70.0 {
        "Satisfactory"
    } else {
        "Needs Improvement"
    }
}

/// JSON report assembler.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredReportAssembler;

impl StructuredReportAssembler {
    fn action_plan(evaluation: &EvaluationResult, weak_concepts: &[String]) -> Vec<String> {
        let base = if evaluation.score >= 90.0 {
            EXCELLENT_PLAN
        } else if evaluation.score >= 70.0 {
            GOOD_PLAN
        } else {
            IMPROVEMENT_PLAN
        };

        let mut plan: Vec<String> = base.iter().map(|s| s.to_string()).collect();
        plan.extend(
            weak_concepts
                .iter()
                .map(|concept| format!("Revisit {} and redo its practice questions", concept)),
        );
        plan
    }
}

impl ReportAssembler for StructuredReportAssembler {
    fn assemble(&self, evaluation: &EvaluationResult) -> ReportDocument {
        let key = &evaluation.archive_key;
        let subject = syllabus::subject_name(&key.subject_id);
        let grade = grade(evaluation.score);

        let weak_concepts: Vec<String> = evaluation
            .concept_accuracy
            .iter()
            .filter(|c| c.attempted > 0 && c.accuracy < WEAK_CONCEPT_THRESHOLD)
            .map(|c| c.concept.clone())
            .collect();

        let mistakes = evaluation
            .mistakes
            .iter()
            .map(|m| ReportMistake {
                question_id: m.question_id.clone(),
                concept: m.concept.clone(),
                your_answer: m.submitted_answer.clone(),
                correct_answer: m.correct_answer.clone(),
                category: m.category,
                review_tip: m.review_tip.clone(),
                resources: m.remediation_resources.clone(),
            })
            .collect();

        let summary = if evaluation.total_matched == 0 {
            "No answered questions matched this quiz.".to_string()
        } else {
            format!(
                "{} of {} answered questions correct ({:.1}%): {}.",
                evaluation.correct_count, evaluation.total_matched, evaluation.score, grade
            )
        };

        ReportDocument {
            title: format!("{} {} Quiz Report", subject, key.unit),
            subject_id: key.subject_id.clone(),
            unit: key.unit.clone(),
            generated_at: Utc::now(),
            score: evaluation.score,
            grade: grade.to_string(),
            summary,
            correct_count: evaluation.correct_count,
            total_questions: evaluation.total_matched,
            concept_breakdown: evaluation.concept_accuracy.clone(),
            action_plan: Self::action_plan(evaluation, &weak_concepts),
            weak_concepts,
            mistakes,
        }
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn render(&self, report: &ReportDocument) -> AppResult<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(report)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::models::domain::{
        evaluation::{ConceptAccuracy, Mistake, MistakeCategory},
        QuizLifecycle,
    };
    use crate::test_utils::fixtures;

    fn evaluation(score: f64, accuracy: Vec<(&str, usize, usize)>) -> EvaluationResult {
        EvaluationResult {
            archive_key: fixtures::quiz_key(),
            per_question_outcome: Vec::new(),
            correct_count: 1,
            total_matched: 2,
            score,
            mistakes: vec![Mistake {
                question_id: "2".to_string(),
                question_text: "Which policy is preemptive?".to_string(),
                concept: "CPU Scheduling".to_string(),
                submitted_answer: "A".to_string(),
                correct_answer: "C".to_string(),
                category: MistakeCategory::ConceptualConfusion,
                review_tip: "Review CPU Scheduling".to_string(),
                remediation_resources: Vec::new(),
            }],
            concept_accuracy: accuracy
                .into_iter()
                .map(|(concept, correct, attempted)| ConceptAccuracy {
                    concept: concept.to_string(),
                    correct,
                    attempted,
                    accuracy: crate::models::domain::evaluation::percentage(correct, attempted),
                })
                .collect(),
            unmatched_ids: Vec::new(),
            lifecycle: QuizLifecycle::Evaluated,
            evaluated_at: Utc::now(),
        }
    }

    #[test]
    fn test_grade_bands() {
        assert_eq!(grade(95.0), "Excellent");
        assert_eq!(grade(90.0), "Excellent");
        assert_eq!(grade(85.0), "Good");
        assert_eq!(grade(70.0), "Satisfactory");
        assert_eq!(grade(50.0), "Needs Improvement");
        assert_eq!(grade(0.0), "Needs Improvement");
    }

    #[test]
    fn test_assemble_lists_weak_concepts_and_mistakes() {
        let eval = evaluation(
            50.0,
            vec![("Process States", 1, 1), ("CPU Scheduling", 0, 1)],
        );
        let report = StructuredReportAssembler.assemble(&eval);

        assert_eq!(report.grade, "Needs Improvement");
        assert_eq!(report.weak_concepts, vec!["CPU Scheduling"]);
        assert_eq!(report.mistakes.len(), 1);
        assert_eq!(report.mistakes[0].your_answer, "A");
        assert_eq!(report.total_questions, 2);
        assert!(report.title.contains("Unit 1"));
        assert_eq!(report.action_plan[0], IMPROVEMENT_PLAN[0]);
        assert!(report
            .action_plan
            .last()
            .is_some_and(|step| step.contains("CPU Scheduling")));
    }

    #[test]
    fn test_high_score_uses_excellent_plan() {
        let report = StructuredReportAssembler.assemble(&evaluation(100.0, vec![("Paging", 2, 2)]));
        assert_eq!(report.grade, "Excellent");
        assert!(report.weak_concepts.is_empty());
        assert_eq!(report.action_plan.len(), EXCELLENT_PLAN.len());
    }

    #[test]
    fn test_render_produces_json() {
        let assembler = StructuredReportAssembler;
        let report = assembler.assemble(&evaluation(75.0, Vec::new()));
        let bytes = assembler.render(&report).expect("report should render");
        let value: serde_json::Value = serde_json::from_slice(&bytes).expect("valid json");

        assert_eq!(value["grade"], "Satisfactory");
        assert_eq!(assembler.content_type(), "application/json");
    }
}
