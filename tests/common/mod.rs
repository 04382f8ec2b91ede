// tests/common/mod.rs
//
// Shared fixtures: an in-memory implementation of the store traits and a
// helper that spawns the full router on a random port, so the suite runs
// without a database.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::Algorithm;
use tokio::sync::RwLock;
use uuid::Uuid;

use certify_backend::error::AppError;
use certify_backend::models::certification::Certification;
use certify_backend::models::exam_attempt::{ExamAttempt, ExamAttemptQuestion};
use certify_backend::models::question::Question;
use certify_backend::models::user::User;
use certify_backend::routes;
use certify_backend::services::{ExamService, IdentityService};
use certify_backend::state::AppState;
use certify_backend::store::{ExamStore, UserStore};
use certify_backend::utils::jwt::TokenService;

pub const TEST_JWT_SECRET: &str = "test_secret_for_integration_tests";

/// HashMap-backed double of the Postgres store. Uniqueness checks mimic
/// the unique indexes; everything else is straight bookkeeping.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    certifications: RwLock<HashMap<Uuid, Certification>>,
    questions: RwLock<HashMap<Uuid, Question>>,
    attempts: RwLock<HashMap<Uuid, ExamAttempt>>,
    attempt_questions: RwLock<Vec<ExamAttemptQuestion>>,
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(AppError::Conflict(
                "Username or email already registered".to_string(),
            ));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn username_or_email_exists(
        &self,
        username: &str,
        email: &str,
    ) -> Result<bool, AppError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .any(|u| u.username == username || u.email == email))
    }

    async fn deactivate_user(&self, id: Uuid) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        if let Some(user) = users.get_mut(&id) {
            user.is_active = false;
        }
        Ok(())
    }
}

#[async_trait]
impl ExamStore for MemoryStore {
    async fn list_certifications(&self) -> Result<Vec<Certification>, AppError> {
        let certifications = self.certifications.read().await;
        Ok(certifications.values().cloned().collect())
    }

    async fn insert_certification(&self, certification: &Certification) -> Result<(), AppError> {
        let mut certifications = self.certifications.write().await;
        if certifications
            .values()
            .any(|c| c.name == certification.name)
        {
            return Err(AppError::Conflict(
                "Certification name already registered".to_string(),
            ));
        }
        certifications.insert(certification.id, certification.clone());
        Ok(())
    }

    async fn find_certification(&self, id: Uuid) -> Result<Option<Certification>, AppError> {
        let certifications = self.certifications.read().await;
        Ok(certifications.get(&id).cloned())
    }

    async fn delete_certification(&self, id: Uuid) -> Result<bool, AppError> {
        let mut certifications = self.certifications.write().await;
        if certifications.remove(&id).is_none() {
            return Ok(false);
        }

        self.questions
            .write()
            .await
            .retain(|_, q| q.certification_id != id);

        let mut attempts = self.attempts.write().await;
        let removed: Vec<Uuid> = attempts
            .values()
            .filter(|a| a.certification_id == id)
            .map(|a| a.id)
            .collect();
        attempts.retain(|_, a| a.certification_id != id);

        self.attempt_questions
            .write()
            .await
            .retain(|aq| !removed.contains(&aq.exam_attempt_id));

        Ok(true)
    }

    async fn insert_question(&self, question: &Question) -> Result<(), AppError> {
        let mut questions = self.questions.write().await;
        questions.insert(question.id, question.clone());
        Ok(())
    }

    async fn find_question(&self, id: Uuid) -> Result<Option<Question>, AppError> {
        let questions = self.questions.read().await;
        Ok(questions.get(&id).cloned())
    }

    async fn sample_questions(
        &self,
        certification_id: Uuid,
        count: i64,
    ) -> Result<Vec<Question>, AppError> {
        let questions = self.questions.read().await;
        Ok(questions
            .values()
            .filter(|q| q.certification_id == certification_id)
            .take(count as usize)
            .cloned()
            .collect())
    }

    async fn insert_attempt(
        &self,
        attempt: &ExamAttempt,
        questions: &[ExamAttemptQuestion],
    ) -> Result<(), AppError> {
        self.attempts
            .write()
            .await
            .insert(attempt.id, attempt.clone());
        self.attempt_questions
            .write()
            .await
            .extend(questions.iter().cloned());
        Ok(())
    }

    async fn attempts_for_user(&self, user_id: Uuid) -> Result<Vec<ExamAttempt>, AppError> {
        let attempts = self.attempts.read().await;
        let mut mine: Vec<ExamAttempt> = attempts
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.exam_date.cmp(&a.exam_date));
        Ok(mine)
    }

    async fn find_attempt_for_user(
        &self,
        attempt_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ExamAttempt>, AppError> {
        let attempts = self.attempts.read().await;
        Ok(attempts
            .get(&attempt_id)
            .filter(|a| a.user_id == user_id)
            .cloned())
    }

    async fn attempt_questions(
        &self,
        attempt_id: Uuid,
    ) -> Result<Vec<ExamAttemptQuestion>, AppError> {
        let attempt_questions = self.attempt_questions.read().await;
        let mut rows: Vec<ExamAttemptQuestion> = attempt_questions
            .iter()
            .filter(|aq| aq.exam_attempt_id == attempt_id)
            .cloned()
            .collect();
        rows.sort_by_key(|aq| aq.position);
        Ok(rows)
    }
}

/// Spawns the app on a random port and returns the base URL
/// (e.g., "http://127.0.0.1:12345").
pub async fn spawn_app() -> String {
    let store = Arc::new(MemoryStore::default());
    let tokens = TokenService::new(TEST_JWT_SECRET, Algorithm::HS256, 10);

    let state = AppState {
        identity: IdentityService::new(store.clone(), tokens.clone()),
        exams: ExamService::new(store),
        tokens,
    };

    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

/// Registers a fresh user and returns (username, bearer token).
pub async fn register_user(client: &reqwest::Client, address: &str) -> (String, String) {
    let username = format!("u_{}", &Uuid::new_v4().to_string()[..8]);

    let response = client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "password123"
        }))
        .send()
        .await
        .expect("Register failed");
    assert_eq!(response.status().as_u16(), 201);

    let body: serde_json::Value = response.json().await.expect("Failed to parse register json");
    let token = body["access_token"]
        .as_str()
        .expect("Token not found")
        .to_string();

    (username, token)
}

/// Creates a certification and returns its response body.
pub async fn create_certification(
    client: &reqwest::Client,
    address: &str,
    token: &str,
    passing_score: i64,
) -> serde_json::Value {
    let name = format!("cert_{}", &Uuid::new_v4().to_string()[..8]);

    let response = client
        .post(format!("{}/api/exams/certifications", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({
            "name": name,
            "description": "Fixture certification",
            "passing_score": passing_score
        }))
        .send()
        .await
        .expect("Create certification failed");
    assert_eq!(response.status().as_u16(), 201);

    response.json().await.expect("Failed to parse cert json")
}

/// Adds an A-D question whose correct keys are `correct`, returning its id.
pub async fn add_question(
    client: &reqwest::Client,
    address: &str,
    token: &str,
    certification_id: &str,
    correct: &[&str],
) -> String {
    let response = client
        .post(format!(
            "{}/api/exams/certifications/{}/questions",
            address, certification_id
        ))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({
            "text": "Which options apply?",
            "question_type": if correct.len() > 1 { "multiple_choice" } else { "single_choice" },
            "answer_choices": {"A": "First", "B": "Second", "C": "Third", "D": "Fourth"},
            "correct_answer": correct
        }))
        .send()
        .await
        .expect("Create question failed");
    assert_eq!(response.status().as_u16(), 201);

    let body: serde_json::Value = response.json().await.expect("Failed to parse question json");
    body["id"].as_str().expect("Question id not found").to_string()
}
