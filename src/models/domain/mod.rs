pub mod archive;
pub mod content;
pub mod content_item;
pub mod evaluation;
pub mod lifecycle;
pub mod provider_result;
pub mod quiz_question;
pub mod report;
pub use archive::{ArchiveEntry, ArchiveKey, ArchiveSummary};
pub use content::{ContentKind, ContentRequest, Difficulty, ItemType, SourceTier};
pub use content_item::{ContentItem, MaterialItem, MaterialType, VideoItem};
pub use evaluation::EvaluationResult;
pub use lifecycle::QuizLifecycle;
pub use provider_result::{AttemptOutcome, ProviderAttempt, ProviderResult};
pub use quiz_question::QuizQuestion;
pub use report::ReportDocument;
