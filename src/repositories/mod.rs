pub mod archive_repository;

pub use archive_repository::{
    ArchiveIndexRecord, ArchivePayloadRecord, ArchiveRepository, MongoArchiveRepository,
};
