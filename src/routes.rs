// src/routes.rs

use axum::{
    Json, Router,
    http::Method,
    middleware,
    routing::{delete, get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    docs,
    handlers::{attempts, auth, certifications},
    models::user::MessageResponse,
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Landing route; useful as a liveness probe.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service is up", body = MessageResponse))
)]
pub async fn welcome() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Welcome to the Certification Exam API".to_string(),
    })
}

/// Assembles the main application router.
///
/// * Public scope: welcome route, OpenAPI document, register and login.
/// * Everything else sits behind the bearer-token middleware.
/// * Global middleware (Trace, CORS) wraps the lot.
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        // Protected auth routes
        .merge(
            Router::new()
                .route("/deactivate", delete(auth::deactivate))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                )),
        );

    let exam_routes = Router::new()
        .route(
            "/certifications",
            get(certifications::list_certifications).post(certifications::create_certification),
        )
        .route(
            "/certifications/{id}",
            delete(certifications::delete_certification),
        )
        .route(
            "/certifications/{id}/questions",
            get(certifications::sample_questions).post(certifications::create_question),
        )
        .route(
            "/attempts",
            post(attempts::record_attempt).get(attempts::list_my_attempts),
        )
        .route("/attempts/{id}", get(attempts::get_attempt))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/", get(welcome))
        .route("/api-docs/openapi.json", get(docs::openapi_json))
        .nest("/api/auth", auth_routes)
        .nest("/api/exams", exam_routes)
        // Global middleware (outside in: trace, then CORS)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
