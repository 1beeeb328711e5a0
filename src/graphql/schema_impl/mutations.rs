use async_graphql::{Context, Object};

use crate::{
    errors::AppResult,
    graphql::helpers::{app_state, validated},
    models::{
        domain::{ContentKind, EvaluationResult, ReportDocument},
        dto::{
            request::{EvaluateQuizInput, GenerateContentRequest},
            response::ContentResponse,
        },
    },
};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn generate_content(
        &self,
        ctx: &Context<'_>,
        kind: ContentKind,
        input: GenerateContentRequest,
    ) -> AppResult<ContentResponse> {
        let state = app_state(ctx)?;
        let input = validated(input)?;

        state
            .content_service
            .generate(input.into_content_request(kind))
            .await
    }

    async fn evaluate_quiz(
        &self,
        ctx: &Context<'_>,
        input: EvaluateQuizInput,
    ) -> AppResult<EvaluationResult> {
        let state = app_state(ctx)?;

        state
            .evaluation_service
            .evaluate(&input.archive_key(), &input.answer_map())
            .await
    }

    /// Evaluates and assembles the report in one call.
    async fn generate_report(
        &self,
        ctx: &Context<'_>,
        input: EvaluateQuizInput,
    ) -> AppResult<ReportDocument> {
        let state = app_state(ctx)?;

        let evaluation = state
            .evaluation_service
            .evaluate(&input.archive_key(), &input.answer_map())
            .await?;
        Ok(state.report_assembler.assemble(&evaluation))
    }
}
