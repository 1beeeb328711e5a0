use async_graphql::SimpleObject;
use serde::Serialize;

use crate::constants::syllabus::{SyllabusSubject, SyllabusUnit, SUBJECTS};
use crate::models::domain::{
    ArchiveKey, ArchiveSummary, ContentItem, ContentKind, Difficulty, ProviderAttempt,
    QuizLifecycle, SourceTier,
};

/// Items contributed by one topic of a request. Topics with a zero quota
/// carry no source.
#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct TopicSection {
    pub topic: String,
    pub archive_key: ArchiveKey,
    pub requested_count: usize,
    pub actual_count: usize,
    pub source: Option<SourceTier>,
    pub provider: Option<String>,
    pub lifecycle: QuizLifecycle,
    pub attempts: Vec<ProviderAttempt>,
    pub items: Vec<ContentItem>,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct ContentResponse {
    pub subject_id: String,
    pub content_kind: ContentKind,
    pub difficulty: Difficulty,
    pub requested_count: usize,
    pub actual_count: usize,
    pub partial: bool,
    pub source: SourceTier,
    pub sections: Vec<TopicSection>,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct ArchiveListResponse {
    pub total: usize,
    pub items: Vec<ArchiveSummary>,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct UnitDto {
    pub name: String,
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct SubjectDto {
    pub code: String,
    pub name: String,
    pub description: String,
    pub units: Vec<UnitDto>,
}

impl UnitDto {
    pub fn from_syllabus(unit: &SyllabusUnit) -> Self {
        Self {
            name: unit.name.to_string(),
            topics: unit.topics.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl SubjectDto {
    pub fn from_syllabus(subject: &SyllabusSubject) -> Self {
        Self {
            code: subject.code.to_string(),
            name: subject.name.to_string(),
            description: subject.description.to_string(),
            units: subject.units.iter().map(UnitDto::from_syllabus).collect(),
        }
    }

    /// Every subject of the built-in syllabus.
    pub fn catalog() -> Vec<Self> {
        SUBJECTS.iter().map(Self::from_syllabus).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_mirrors_syllabus() {
        let catalog = SubjectDto::catalog();
        assert_eq!(catalog.len(), SUBJECTS.len());
        assert!(catalog.iter().all(|s| s.units.len() == 5));
    }
}
