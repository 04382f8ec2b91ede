// src/handlers/certifications.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::DEFAULT_SAMPLE_COUNT,
    error::AppError,
    models::certification::{Certification, CreateCertificationRequest},
    models::question::{CreateQuestionRequest, PublicQuestion},
    models::user::MessageResponse,
    services::ExamService,
};

/// Query parameters for question sampling.
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SampleParams {
    /// How many questions to draw; defaults to 10.
    #[validate(range(min = 1, max = 100))]
    pub count: Option<i64>,
}

/// Lists the full certification catalog.
#[utoipa::path(
    get,
    path = "/api/exams/certifications",
    responses(
        (status = 200, description = "All certifications", body = [Certification]),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_token" = [])),
    tag = "exams"
)]
pub async fn list_certifications(
    State(exams): State<ExamService>,
) -> Result<impl IntoResponse, AppError> {
    let certifications = exams.list_certifications().await?;

    Ok(Json(certifications))
}

/// Creates a certification. The passing score defaults to 70 when omitted.
#[utoipa::path(
    post,
    path = "/api/exams/certifications",
    request_body = CreateCertificationRequest,
    responses(
        (status = 201, description = "Certification created", body = Certification),
        (status = 400, description = "Malformed name or passing score outside 0-100"),
        (status = 401, description = "Missing or invalid token"),
        (status = 409, description = "Certification name already registered")
    ),
    security(("bearer_token" = [])),
    tag = "exams"
)]
pub async fn create_certification(
    State(exams): State<ExamService>,
    Json(payload): Json<CreateCertificationRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let certification = exams.create_certification(payload).await?;

    Ok((StatusCode::CREATED, Json(certification)))
}

/// Deletes a certification and everything recorded under it.
#[utoipa::path(
    delete,
    path = "/api/exams/certifications/{id}",
    params(("id" = Uuid, Path, description = "Certification id")),
    responses(
        (status = 200, description = "Certification and its questions and attempts removed", body = MessageResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such certification")
    ),
    security(("bearer_token" = [])),
    tag = "exams"
)]
pub async fn delete_certification(
    State(exams): State<ExamService>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    exams.delete_certification(id).await?;

    Ok(Json(MessageResponse {
        message: "Certification deleted".to_string(),
    }))
}

/// Adds a question to a certification's pool.
#[utoipa::path(
    post,
    path = "/api/exams/certifications/{id}/questions",
    params(("id" = Uuid, Path, description = "Certification id")),
    request_body = CreateQuestionRequest,
    responses(
        (status = 201, description = "Question created", body = PublicQuestion),
        (status = 400, description = "Malformed question or correct_answer not within choices"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such certification")
    ),
    security(("bearer_token" = [])),
    tag = "exams"
)]
pub async fn create_question(
    State(exams): State<ExamService>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let question = exams.add_question(id, payload).await?;

    Ok((StatusCode::CREATED, Json(PublicQuestion::from(question))))
}

/// Serves a random sample of a certification's questions, correct answers
/// withheld. A pool smaller than `count` yields the whole pool; an unknown
/// certification yields an empty list.
#[utoipa::path(
    get,
    path = "/api/exams/certifications/{id}/questions",
    params(("id" = Uuid, Path, description = "Certification id"), SampleParams),
    responses(
        (status = 200, description = "Sampled questions", body = [PublicQuestion]),
        (status = 400, description = "count outside 1-100"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_token" = [])),
    tag = "exams"
)]
pub async fn sample_questions(
    State(exams): State<ExamService>,
    Path(id): Path<Uuid>,
    Query(params): Query<SampleParams>,
) -> Result<impl IntoResponse, AppError> {
    params.validate()?;

    let count = params.count.unwrap_or(DEFAULT_SAMPLE_COUNT);
    let questions = exams.sample_questions(id, count).await?;

    let public: Vec<PublicQuestion> = questions.into_iter().map(PublicQuestion::from).collect();

    Ok(Json(public))
}
