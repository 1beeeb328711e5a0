use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    constants::syllabus,
    errors::AppError,
    models::{
        domain::{ArchiveKey, ContentKind, EvaluationResult},
        dto::{
            request::{EvaluateQuizRequest, GenerateContentRequest, ListArchivesQuery},
            response::{ArchiveListResponse, SubjectDto, UnitDto},
        },
    },
};

async fn generate(
    state: &AppState,
    request: GenerateContentRequest,
    content_kind: ContentKind,
) -> Result<HttpResponse, AppError> {
    request.validate()?;
    let response = state
        .content_service
        .generate(request.into_content_request(content_kind))
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/api/study/quiz")]
async fn generate_quiz(
    state: web::Data<Arc<AppState>>,
    request: web::Json<GenerateContentRequest>,
) -> Result<HttpResponse, AppError> {
    generate(&state, request.into_inner(), ContentKind::Quiz).await
}

#[post("/api/study/material")]
async fn generate_material(
    state: web::Data<Arc<AppState>>,
    request: web::Json<GenerateContentRequest>,
) -> Result<HttpResponse, AppError> {
    generate(&state, request.into_inner(), ContentKind::Material).await
}

#[post("/api/study/videos")]
async fn search_videos(
    state: web::Data<Arc<AppState>>,
    request: web::Json<GenerateContentRequest>,
) -> Result<HttpResponse, AppError> {
    generate(&state, request.into_inner(), ContentKind::Video).await
}

#[post("/api/study/evaluate")]
async fn evaluate_quiz(
    state: web::Data<Arc<AppState>>,
    request: web::Json<EvaluateQuizRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let result = state
        .evaluation_service
        .evaluate(&request.archive_key(), &request.answers)
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

#[post("/api/study/report")]
async fn generate_report(
    state: web::Data<Arc<AppState>>,
    evaluation: web::Json<EvaluationResult>,
) -> Result<HttpResponse, AppError> {
    let assembler = &state.report_assembler;
    let report = assembler.assemble(&evaluation);
    let body = assembler.render(&report)?;
    Ok(HttpResponse::Ok()
        .content_type(assembler.content_type())
        .body(body))
}

#[get("/api/study/archives")]
async fn list_archives(
    state: web::Data<Arc<AppState>>,
    query: web::Query<ListArchivesQuery>,
) -> Result<HttpResponse, AppError> {
    let items = state
        .archive_store
        .list(query.subject_id.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(ArchiveListResponse {
        total: items.len(),
        items,
    }))
}

#[get("/api/study/archives/{subject_id}/{content_kind}/{unit}")]
async fn get_archive(
    state: web::Data<Arc<AppState>>,
    path: web::Path<(String, String, String)>,
) -> Result<HttpResponse, AppError> {
    let (subject_id, content_kind, unit) = path.into_inner();
    let key = ArchiveKey::new(&subject_id, &unit, ContentKind::parse(&content_kind)?);

    let entry = state.archive_store.load(&key).await?;
    Ok(HttpResponse::Ok().json(entry))
}

#[get("/api/study/subjects")]
async fn list_subjects() -> HttpResponse {
    HttpResponse::Ok().json(SubjectDto::catalog())
}

#[get("/api/study/subjects/{code}/units")]
async fn list_units(code: web::Path<String>) -> Result<HttpResponse, AppError> {
    let subject = syllabus::find_subject(&code)
        .ok_or_else(|| AppError::NotFound(format!("Subject '{}' not found", code.trim())))?;

    let units: Vec<UnitDto> = subject.units.iter().map(UnitDto::from_syllabus).collect();
    Ok(HttpResponse::Ok().json(units))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(generate_quiz)
        .service(generate_material)
        .service(search_videos)
        .service(evaluate_quiz)
        .service(generate_report)
        .service(list_archives)
        .service(get_archive)
        .service(list_subjects)
        .service(list_units);
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    use crate::config::Config;
    use crate::test_utils::{
        fixtures, offline_chains,
        test_helpers::{assert_error_status, assert_success_status},
        InMemoryArchiveRepository,
    };

    fn state() -> Arc<AppState> {
        Arc::new(
            AppState::from_parts(
                Config::test_config(),
                Arc::new(InMemoryArchiveRepository::new()),
                offline_chains(),
            )
            .expect("state should build"),
        )
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state))
                    .configure(configure),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_generate_quiz_then_load_and_evaluate() {
        let app = app!(state());

        let req = test::TestRequest::post()
            .uri("/api/study/quiz")
            .set_json(json!({
                "subject": fixtures::SUBJECT,
                "units": ["Unit 1", "Unit 2"],
                "num_questions": 5
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["source"], "local-generated");
        assert_eq!(body["actual_count"], 5);
        assert_eq!(body["sections"][0]["requested_count"], 3);

        let first = &body["sections"][0]["items"][0];
        let correct = first["correct_answer"].as_str().expect("answer").to_string();

        let req = test::TestRequest::get()
            .uri("/api/study/archives/315319-OPERATING%20SYSTEM/quiz/Unit%201")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_success_status(resp.status());

        let req = test::TestRequest::post()
            .uri("/api/study/evaluate")
            .set_json(json!({
                "subject": fixtures::SUBJECT,
                "unit": "Unit 1",
                "answers": { "1": correct, "2": "" }
            }))
            .to_request();
        let result: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(result["score"], 50.0);
        assert_eq!(result["mistakes"][0]["category"], "skipped");
    }

    #[actix_web::test]
    async fn test_generate_material_rejects_invalid_request() {
        let app = app!(state());

        let req = test::TestRequest::post()
            .uri("/api/study/material")
            .set_json(json!({ "subject": fixtures::SUBJECT, "units": [], "num_questions": 5 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_videos_are_local_when_offline() {
        let app = app!(state());

        let req = test::TestRequest::post()
            .uri("/api/study/videos")
            .set_json(json!({ "subject": fixtures::SUBJECT, "units": ["Unit 3"], "num_questions": 2 }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["content_kind"], "video");
        assert_eq!(body["actual_count"], 2);
    }

    #[actix_web::test]
    async fn test_evaluate_unknown_archive_is_not_found() {
        let app = app!(state());

        let req = test::TestRequest::post()
            .uri("/api/study/evaluate")
            .set_json(json!({ "subject": fixtures::SUBJECT, "unit": "Unit 5", "answers": { "1": "A" } }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_list_archives_filters_by_subject() {
        let state = state();
        state
            .archive_store
            .put(&fixtures::quiz_entry())
            .await
            .expect("put should succeed");
        let app = app!(state);

        let req = test::TestRequest::get()
            .uri("/api/study/archives?subject_id=315323-SOFTWARE%20ENGINEERING")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total"], 0);

        let req = test::TestRequest::get().uri("/api/study/archives").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["items"][0]["item_count"], 2);
    }

    #[actix_web::test]
    async fn test_report_from_evaluation() {
        let state = state();
        state
            .archive_store
            .put(&fixtures::quiz_entry())
            .await
            .expect("put should succeed");
        let answers = [("1".to_string(), "B".to_string()), ("2".to_string(), "A".to_string())]
            .into_iter()
            .collect();
        let evaluation = state
            .evaluation_service
            .evaluate(&fixtures::quiz_key(), &answers)
            .await
            .expect("evaluation should succeed");
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/study/report")
            .set_json(&evaluation)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["grade"], "Needs Improvement");
        assert_eq!(body["mistakes"][0]["question_id"], "2");
    }

    #[actix_web::test]
    async fn test_unknown_content_kind_is_bad_request() {
        let app = app!(state());

        let req = test::TestRequest::get()
            .uri("/api/study/archives/315319-OPERATING%20SYSTEM/podcast/Unit%201")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_error_status(resp.status());
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_subjects_and_units() {
        let app = app!(state());

        let req = test::TestRequest::get().uri("/api/study/subjects").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.as_array().map(Vec::len), Some(3));

        let req = test::TestRequest::get()
            .uri("/api/study/subjects/315326-DATA%20ANALYTICS/units")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.as_array().map(Vec::len), Some(5));

        let req = test::TestRequest::get()
            .uri("/api/study/subjects/unknown/units")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
