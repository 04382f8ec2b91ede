// src/services/exams.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::config::{DEFAULT_ATTEMPT_TIME_LIMIT_MINUTES, DEFAULT_PASSING_SCORE};
use crate::error::AppError;
use crate::models::certification::{Certification, CreateCertificationRequest};
use crate::models::exam_attempt::{
    AnswerSubmission, ExamAttempt, ExamAttemptDetail, ExamAttemptQuestion,
};
use crate::models::question::{CreateQuestionRequest, Question, correct_answer_is_valid};
use crate::store::ExamStore;
use crate::utils::html::clean_html;

/// Catalog management, question sampling and attempt grading.
#[derive(Clone)]
pub struct ExamService {
    store: Arc<dyn ExamStore>,
}

impl ExamService {
    pub fn new(store: Arc<dyn ExamStore>) -> Self {
        Self { store }
    }

    pub async fn list_certifications(&self) -> Result<Vec<Certification>, AppError> {
        self.store.list_certifications().await
    }

    pub async fn create_certification(
        &self,
        request: CreateCertificationRequest,
    ) -> Result<Certification, AppError> {
        let certification = Certification::new(
            request.name,
            request.description.map(|d| clean_html(&d)),
            request.passing_score.unwrap_or(DEFAULT_PASSING_SCORE),
        );

        self.store.insert_certification(&certification).await?;

        tracing::info!(certification = %certification.name, "created certification");

        Ok(certification)
    }

    /// Removes a certification together with its questions, attempts and
    /// graded answers.
    pub async fn delete_certification(&self, id: Uuid) -> Result<(), AppError> {
        if !self.store.delete_certification(id).await? {
            return Err(AppError::NotFound("Certification not found".to_string()));
        }

        tracing::info!(certification_id = %id, "deleted certification");

        Ok(())
    }

    pub async fn add_question(
        &self,
        certification_id: Uuid,
        request: CreateQuestionRequest,
    ) -> Result<Question, AppError> {
        if self
            .store
            .find_certification(certification_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound("Certification not found".to_string()));
        }

        if !correct_answer_is_valid(&request.answer_choices, &request.correct_answer) {
            return Err(AppError::Validation(
                "correct_answer must be a non-empty subset of the answer choices".to_string(),
            ));
        }

        let question = Question::new(
            certification_id,
            clean_html(&request.text),
            request.question_type,
            request.answer_choices,
            request.correct_answer,
        );

        self.store.insert_question(&question).await?;

        Ok(question)
    }

    /// Up to `count` randomly chosen questions for one certification. A
    /// smaller pool yields the whole pool; an unknown certification yields
    /// an empty set.
    pub async fn sample_questions(
        &self,
        certification_id: Uuid,
        count: i64,
    ) -> Result<Vec<Question>, AppError> {
        self.store.sample_questions(certification_id, count).await
    }

    /// Grades a submission and persists the attempt with its per-answer
    /// records in one transaction.
    ///
    /// The score is the raw number of correctly answered questions. An
    /// answer is correct when its selected keys equal the question's
    /// correct keys as sets. An answer referencing an unknown question
    /// contributes nothing to the score and stores no row; the rest of the
    /// submission is still graded.
    pub async fn record_attempt(
        &self,
        user_id: Uuid,
        certification_id: Uuid,
        answers: Vec<AnswerSubmission>,
    ) -> Result<ExamAttempt, AppError> {
        let certification = self
            .store
            .find_certification(certification_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Certification not found".to_string()))?;

        let mut score = 0;
        let mut graded = Vec::with_capacity(answers.len());

        for answer in &answers {
            let Some(question) = self.store.find_question(answer.question_id).await? else {
                continue;
            };

            let is_correct = answer.user_answer == question.correct_answer.0;
            if is_correct {
                score += 1;
            }
            graded.push((answer.question_id, answer.user_answer.clone(), is_correct));
        }

        let attempt = ExamAttempt::new(
            user_id,
            certification.id,
            answers.len() as i32,
            DEFAULT_ATTEMPT_TIME_LIMIT_MINUTES,
            score,
            certification.passing_score,
        );

        let questions: Vec<ExamAttemptQuestion> = graded
            .into_iter()
            .enumerate()
            .map(|(position, (question_id, user_answer, is_correct))| {
                ExamAttemptQuestion::new(
                    attempt.id,
                    question_id,
                    position as i32,
                    user_answer,
                    is_correct,
                )
            })
            .collect();

        self.store.insert_attempt(&attempt, &questions).await?;

        tracing::info!(
            user_id = %user_id,
            certification_id = %certification.id,
            score = attempt.score,
            passed = attempt.passed,
            "recorded exam attempt"
        );

        Ok(attempt)
    }

    /// All attempts recorded by one user, most recent first.
    pub async fn attempts_for_user(&self, user_id: Uuid) -> Result<Vec<ExamAttempt>, AppError> {
        self.store.attempts_for_user(user_id).await
    }

    /// One attempt with its graded answers, visible only to its owner.
    pub async fn attempt_detail(
        &self,
        attempt_id: Uuid,
        user_id: Uuid,
    ) -> Result<ExamAttemptDetail, AppError> {
        let attempt = self
            .store
            .find_attempt_for_user(attempt_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Exam attempt not found".to_string()))?;

        let questions = self.store.attempt_questions(attempt.id).await?;

        Ok(ExamAttemptDetail { attempt, questions })
    }
}
