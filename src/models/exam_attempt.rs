// src/models/exam_attempt.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use std::collections::BTreeSet;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Represents the 'exam_attempts' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct ExamAttempt {
    pub id: Uuid,

    pub user_id: Uuid,

    pub certification_id: Uuid,

    /// Number of answers submitted with this attempt.
    pub num_questions: i32,

    /// Time limit in minutes stamped on the attempt.
    pub time_limit: i32,

    pub exam_date: DateTime<Utc>,

    /// Raw count of correctly answered questions. Not normalized.
    pub score: i32,

    pub passed: bool,
}

impl ExamAttempt {
    /// `passed` is derived here and nowhere else: an attempt passes when its
    /// score reaches the certification's passing score.
    pub fn new(
        user_id: Uuid,
        certification_id: Uuid,
        num_questions: i32,
        time_limit: i32,
        score: i32,
        passing_score: i32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            certification_id,
            num_questions,
            time_limit,
            exam_date: Utc::now(),
            score,
            passed: score >= passing_score,
        }
    }
}

/// Represents the 'exam_attempt_questions' table: one graded answer.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct ExamAttemptQuestion {
    pub id: Uuid,

    pub exam_attempt_id: Uuid,

    pub question_id: Uuid,

    /// Zero-based index of this answer within the submission; preserves
    /// submission order across reads.
    pub position: i32,

    /// The choice keys the user selected, order-independent.
    #[schema(value_type = BTreeSet<String>)]
    pub user_answer: Json<BTreeSet<String>>,

    pub is_correct: bool,
}

impl ExamAttemptQuestion {
    pub fn new(
        exam_attempt_id: Uuid,
        question_id: Uuid,
        position: i32,
        user_answer: BTreeSet<String>,
        is_correct: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            exam_attempt_id,
            question_id,
            position,
            user_answer: Json(user_answer),
            is_correct,
        }
    }
}

/// One submitted answer within an attempt.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct AnswerSubmission {
    pub question_id: Uuid,
    /// Selected choice keys; duplicates collapse, order is irrelevant.
    pub user_answer: BTreeSet<String>,
}

/// DTO for recording a finished exam attempt.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecordAttemptRequest {
    pub certification_id: Uuid,
    pub answers: Vec<AnswerSubmission>,
}

/// An attempt together with its graded answers, in submission order.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExamAttemptDetail {
    pub attempt: ExamAttempt,
    pub questions: Vec<ExamAttemptQuestion>,
}
