// src/store/mod.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::certification::Certification;
use crate::models::exam_attempt::{ExamAttempt, ExamAttemptQuestion};
use crate::models::question::Question;
use crate::models::user::User;

pub mod postgres;

pub use postgres::PgStore;

/// Persistence seam for user accounts. The production implementation is
/// [`PgStore`]; tests substitute an in-memory implementation.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a new user. A username or email unique-index violation
    /// surfaces as `AppError::Conflict`, which is what closes the
    /// check-then-insert registration race.
    async fn insert_user(&self, user: &User) -> Result<(), AppError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Single existence probe over both unique columns.
    async fn username_or_email_exists(
        &self,
        username: &str,
        email: &str,
    ) -> Result<bool, AppError>;

    /// Marks the user inactive inside a transaction; a failure rolls back
    /// and leaves the row untouched.
    async fn deactivate_user(&self, id: Uuid) -> Result<(), AppError>;
}

/// Persistence seam for the exam catalog and recorded attempts.
#[async_trait]
pub trait ExamStore: Send + Sync {
    async fn list_certifications(&self) -> Result<Vec<Certification>, AppError>;

    /// A duplicate certification name surfaces as `AppError::Conflict`.
    async fn insert_certification(&self, certification: &Certification) -> Result<(), AppError>;

    async fn find_certification(&self, id: Uuid) -> Result<Option<Certification>, AppError>;

    /// Removes the certification and, by cascade, its questions, attempts
    /// and graded answers. Returns false when no such row existed.
    async fn delete_certification(&self, id: Uuid) -> Result<bool, AppError>;

    async fn insert_question(&self, question: &Question) -> Result<(), AppError>;

    async fn find_question(&self, id: Uuid) -> Result<Option<Question>, AppError>;

    /// Up to `count` questions sampled without replacement from the
    /// certification's pool; fewer when the pool is smaller. No ordering
    /// guarantee.
    async fn sample_questions(
        &self,
        certification_id: Uuid,
        count: i64,
    ) -> Result<Vec<Question>, AppError>;

    /// Persists an attempt and its graded answers as one transaction,
    /// attempt row first.
    async fn insert_attempt(
        &self,
        attempt: &ExamAttempt,
        questions: &[ExamAttemptQuestion],
    ) -> Result<(), AppError>;

    /// All attempts recorded by one user, most recent first.
    async fn attempts_for_user(&self, user_id: Uuid) -> Result<Vec<ExamAttempt>, AppError>;

    /// An attempt scoped to its owning user.
    async fn find_attempt_for_user(
        &self,
        attempt_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ExamAttempt>, AppError>;

    /// Graded answers of one attempt, in submission order.
    async fn attempt_questions(
        &self,
        attempt_id: Uuid,
    ) -> Result<Vec<ExamAttemptQuestion>, AppError>;
}
