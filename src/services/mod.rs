pub mod archive_store;
pub mod content_service;
pub mod distribution;
pub mod evaluation_service;
pub mod report_service;
pub mod resolver;
pub mod uniqueness;

pub use archive_store::ArchiveStore;
pub use content_service::ContentService;
pub use evaluation_service::EvaluationService;
pub use report_service::{ReportAssembler, StructuredReportAssembler};
pub use resolver::FallbackChainResolver;
