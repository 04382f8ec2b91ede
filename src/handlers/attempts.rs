// src/handlers/attempts.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::exam_attempt::{ExamAttempt, ExamAttemptDetail, RecordAttemptRequest},
    services::{ExamService, IdentityService},
    utils::jwt::Claims,
};

/// Records a finished exam attempt for the authenticated user.
///
/// The submission is graded answer by answer; the stored score is the raw
/// count of correct answers and `passed` compares it against the
/// certification's passing score.
#[utoipa::path(
    post,
    path = "/api/exams/attempts",
    request_body = RecordAttemptRequest,
    responses(
        (status = 201, description = "Attempt graded and stored", body = ExamAttempt),
        (status = 400, description = "Malformed submission"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such certification")
    ),
    security(("bearer_token" = [])),
    tag = "exams"
)]
pub async fn record_attempt(
    State(identity): State<IdentityService>,
    State(exams): State<ExamService>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<RecordAttemptRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = identity.user_for_subject(&claims.sub).await?;
    let attempt = exams
        .record_attempt(user.id, payload.certification_id, payload.answers)
        .await?;

    Ok((StatusCode::CREATED, Json(attempt)))
}

/// Lists the authenticated user's attempts, most recent first.
#[utoipa::path(
    get,
    path = "/api/exams/attempts",
    responses(
        (status = 200, description = "The user's recorded attempts", body = [ExamAttempt]),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_token" = [])),
    tag = "exams"
)]
pub async fn list_my_attempts(
    State(identity): State<IdentityService>,
    State(exams): State<ExamService>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user = identity.user_for_subject(&claims.sub).await?;
    let attempts = exams.attempts_for_user(user.id).await?;

    Ok(Json(attempts))
}

/// Fetches one of the authenticated user's attempts with its graded
/// answers in submission order. Other users' attempts answer 404.
#[utoipa::path(
    get,
    path = "/api/exams/attempts/{id}",
    params(("id" = Uuid, Path, description = "Attempt id")),
    responses(
        (status = 200, description = "Attempt with graded answers", body = ExamAttemptDetail),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such attempt for this user")
    ),
    security(("bearer_token" = [])),
    tag = "exams"
)]
pub async fn get_attempt(
    State(identity): State<IdentityService>,
    State(exams): State<ExamService>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user = identity.user_for_subject(&claims.sub).await?;
    let detail = exams.attempt_detail(id, user.id).await?;

    Ok(Json(detail))
}
