// src/store/postgres.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::certification::Certification;
use crate::models::exam_attempt::{ExamAttempt, ExamAttemptQuestion};
use crate::models::question::Question;
use crate::models::user::User;
use crate::store::{ExamStore, UserStore};

/// PostgreSQL-backed store. Runtime-checked queries so the crate compiles
/// without a reachable database.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps a unique-index violation to `Conflict`; everything else stays a
/// storage failure.
fn conflict_or_storage(err: sqlx::Error, conflict_message: &str) -> AppError {
    if err
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation())
    {
        AppError::Conflict(conflict_message.to_string())
    } else {
        AppError::from(err)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, is_active)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_storage(e, "Username or email already registered"))?;

        Ok(())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, is_active
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn username_or_email_exists(
        &self,
        username: &str,
        email: &str,
    ) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 OR email = $2)",
        )
        .bind(username)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn deactivate_user(&self, id: Uuid) -> Result<(), AppError> {
        // Dropping an uncommitted transaction rolls it back, so any failure
        // before commit leaves the row untouched.
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE users SET is_active = FALSE WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}

#[async_trait]
impl ExamStore for PgStore {
    async fn list_certifications(&self) -> Result<Vec<Certification>, AppError> {
        let certifications = sqlx::query_as::<_, Certification>(
            "SELECT id, name, description, passing_score FROM certifications",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(certifications)
    }

    async fn insert_certification(&self, certification: &Certification) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO certifications (id, name, description, passing_score)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(certification.id)
        .bind(&certification.name)
        .bind(&certification.description)
        .bind(certification.passing_score)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_storage(e, "Certification name already registered"))?;

        Ok(())
    }

    async fn find_certification(&self, id: Uuid) -> Result<Option<Certification>, AppError> {
        let certification = sqlx::query_as::<_, Certification>(
            r#"
            SELECT id, name, description, passing_score
            FROM certifications
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(certification)
    }

    async fn delete_certification(&self, id: Uuid) -> Result<bool, AppError> {
        // Questions, attempts and graded answers go with it through the
        // ON DELETE CASCADE foreign keys.
        let result = sqlx::query("DELETE FROM certifications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_question(&self, question: &Question) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO questions
                (id, certification_id, text, question_type, answer_choices, correct_answer)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(question.id)
        .bind(question.certification_id)
        .bind(&question.text)
        .bind(question.question_type)
        .bind(&question.answer_choices)
        .bind(&question.correct_answer)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_question(&self, id: Uuid) -> Result<Option<Question>, AppError> {
        let question = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, certification_id, text, question_type, answer_choices, correct_answer
            FROM questions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(question)
    }

    async fn sample_questions(
        &self,
        certification_id: Uuid,
        count: i64,
    ) -> Result<Vec<Question>, AppError> {
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, certification_id, text, question_type, answer_choices, correct_answer
            FROM questions
            WHERE certification_id = $1
            ORDER BY RANDOM()
            LIMIT $2
            "#,
        )
        .bind(certification_id)
        .bind(count)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    async fn insert_attempt(
        &self,
        attempt: &ExamAttempt,
        questions: &[ExamAttemptQuestion],
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO exam_attempts
                (id, user_id, certification_id, num_questions, time_limit,
                 exam_date, score, passed)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(attempt.id)
        .bind(attempt.user_id)
        .bind(attempt.certification_id)
        .bind(attempt.num_questions)
        .bind(attempt.time_limit)
        .bind(attempt.exam_date)
        .bind(attempt.score)
        .bind(attempt.passed)
        .execute(&mut *tx)
        .await?;

        for question in questions {
            sqlx::query(
                r#"
                INSERT INTO exam_attempt_questions
                    (id, exam_attempt_id, question_id, position, user_answer, is_correct)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(question.id)
            .bind(question.exam_attempt_id)
            .bind(question.question_id)
            .bind(question.position)
            .bind(&question.user_answer)
            .bind(question.is_correct)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    async fn attempts_for_user(&self, user_id: Uuid) -> Result<Vec<ExamAttempt>, AppError> {
        let attempts = sqlx::query_as::<_, ExamAttempt>(
            r#"
            SELECT id, user_id, certification_id, num_questions, time_limit,
                   exam_date, score, passed
            FROM exam_attempts
            WHERE user_id = $1
            ORDER BY exam_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(attempts)
    }

    async fn find_attempt_for_user(
        &self,
        attempt_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ExamAttempt>, AppError> {
        let attempt = sqlx::query_as::<_, ExamAttempt>(
            r#"
            SELECT id, user_id, certification_id, num_questions, time_limit,
                   exam_date, score, passed
            FROM exam_attempts
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(attempt_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attempt)
    }

    async fn attempt_questions(
        &self,
        attempt_id: Uuid,
    ) -> Result<Vec<ExamAttemptQuestion>, AppError> {
        let questions = sqlx::query_as::<_, ExamAttemptQuestion>(
            r#"
            SELECT id, exam_attempt_id, question_id, position, user_answer, is_correct
            FROM exam_attempt_questions
            WHERE exam_attempt_id = $1
            ORDER BY position
            "#,
        )
        .bind(attempt_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }
}
