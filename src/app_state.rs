use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    providers::{default_chains, ProviderChains},
    repositories::{ArchiveRepository, MongoArchiveRepository},
    services::{
        ArchiveStore, ContentService, EvaluationService, FallbackChainResolver, ReportAssembler,
        StructuredReportAssembler,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub content_service: Arc<ContentService>,
    pub evaluation_service: Arc<EvaluationService>,
    pub report_assembler: Arc<dyn ReportAssembler>,
    pub archive_store: Arc<ArchiveStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let archive_repository = Arc::new(MongoArchiveRepository::new(
            &db,
            &config.archive_index_collection,
            &config.archive_payload_collection,
        ));
        archive_repository.ensure_indexes().await?;

        config.log_provider_availability();
        let chains = default_chains(&config);

        Self::from_parts(config, archive_repository, chains)
    }

    /// Wires the services over an arbitrary repository and provider chains.
    pub fn from_parts(
        config: Config,
        archive_repository: Arc<dyn ArchiveRepository>,
        chains: ProviderChains,
    ) -> AppResult<Self> {
        let resolver = Arc::new(FallbackChainResolver::new(chains, config.provider_timeout())?);
        let archive_store = Arc::new(ArchiveStore::new(archive_repository));

        let content_service = Arc::new(ContentService::new(
            resolver.clone(),
            archive_store.clone(),
            &config,
        ));
        let evaluation_service = Arc::new(EvaluationService::new(
            archive_store.clone(),
            resolver,
            &config,
        ));

        Ok(Self {
            content_service,
            evaluation_service,
            report_assembler: Arc::new(StructuredReportAssembler),
            archive_store,
            config: Arc::new(config),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{offline_chains, InMemoryArchiveRepository};

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_from_parts_rejects_chain_without_terminal() {
        let mut chains = offline_chains();
        if let Some(chain) = chains.get_mut(&crate::providers::Capability::VideoSearch) {
            chain.pop();
        }

        let result = AppState::from_parts(
            Config::test_config(),
            Arc::new(InMemoryArchiveRepository::new()),
            chains,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_from_parts_with_offline_chains() {
        let state = AppState::from_parts(
            Config::test_config(),
            Arc::new(InMemoryArchiveRepository::new()),
            offline_chains(),
        )
        .expect("state should build");
        assert_eq!(state.config.mongo_db_name, "studyhub-test");
    }
}
