use async_graphql::{Context, Object};

use crate::{
    constants::syllabus,
    errors::AppResult,
    graphql::helpers::app_state,
    models::{
        domain::{ArchiveEntry, ArchiveKey},
        dto::response::{ArchiveListResponse, SubjectDto},
    },
};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn subjects(&self) -> Vec<SubjectDto> {
        SubjectDto::catalog()
    }

    async fn subject(&self, code: String) -> Option<SubjectDto> {
        syllabus::find_subject(&code).map(SubjectDto::from_syllabus)
    }

    async fn archives(
        &self,
        ctx: &Context<'_>,
        subject_id: Option<String>,
    ) -> AppResult<ArchiveListResponse> {
        let state = app_state(ctx)?;
        let items = state.archive_store.list(subject_id.as_deref()).await?;
        Ok(ArchiveListResponse {
            total: items.len(),
            items,
        })
    }

    async fn archive(&self, ctx: &Context<'_>, key: ArchiveKey) -> AppResult<ArchiveEntry> {
        let state = app_state(ctx)?;
        let key = ArchiveKey::new(&key.subject_id, &key.unit, key.content_kind);
        state.archive_store.load(&key).await
    }
}
