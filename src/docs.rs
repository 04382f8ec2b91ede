// src/docs.rs

use axum::Json;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::models::certification::{Certification, CreateCertificationRequest};
use crate::models::exam_attempt::{
    AnswerSubmission, ExamAttempt, ExamAttemptDetail, ExamAttemptQuestion, RecordAttemptRequest,
};
use crate::models::question::{CreateQuestionRequest, PublicQuestion, QuestionType};
use crate::models::user::{LoginRequest, MessageResponse, RegisterRequest, TokenResponse};

/// OpenAPI description of the whole HTTP surface, served as raw JSON at
/// /api-docs/openapi.json.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::welcome,
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::auth::deactivate,
        crate::handlers::certifications::list_certifications,
        crate::handlers::certifications::create_certification,
        crate::handlers::certifications::delete_certification,
        crate::handlers::certifications::create_question,
        crate::handlers::certifications::sample_questions,
        crate::handlers::attempts::record_attempt,
        crate::handlers::attempts::list_my_attempts,
        crate::handlers::attempts::get_attempt,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        TokenResponse,
        MessageResponse,
        Certification,
        CreateCertificationRequest,
        QuestionType,
        PublicQuestion,
        CreateQuestionRequest,
        AnswerSubmission,
        RecordAttemptRequest,
        ExamAttempt,
        ExamAttemptQuestion,
        ExamAttemptDetail,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, login and account deactivation"),
        (name = "exams", description = "Certification catalog, question sampling and attempt recording")
    )
)]
pub struct ApiDoc;

/// Registers the bearer scheme the protected paths reference.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
