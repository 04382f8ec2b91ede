// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use std::collections::{BTreeMap, BTreeSet};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Question type: one correct choice key, or several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum QuestionType {
    SingleChoice,
    MultipleChoice,
}

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,

    pub certification_id: Uuid,

    /// The text content of the question.
    pub text: String,

    pub question_type: QuestionType,

    /// Choice key -> display label (e.g., "A" -> "An ordered collection").
    /// Stored as JSONB.
    pub answer_choices: Json<BTreeMap<String, String>>,

    /// The set of correct choice keys. Always a subset of the
    /// answer_choices keys, never empty. Stored as a JSONB array.
    pub correct_answer: Json<BTreeSet<String>>,
}

impl Question {
    pub fn new(
        certification_id: Uuid,
        text: String,
        question_type: QuestionType,
        answer_choices: BTreeMap<String, String>,
        correct_answer: BTreeSet<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            certification_id,
            text,
            question_type,
            answer_choices: Json(answer_choices),
            correct_answer: Json(correct_answer),
        }
    }
}

/// True when `correct` is a non-empty subset of the choice keys.
pub fn correct_answer_is_valid(
    choices: &BTreeMap<String, String>,
    correct: &BTreeSet<String>,
) -> bool {
    !correct.is_empty() && correct.iter().all(|key| choices.contains_key(key))
}

/// DTO for sending a question to an exam taker (excludes the correct answer).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PublicQuestion {
    pub id: Uuid,
    pub certification_id: Uuid,
    pub text: String,
    pub question_type: QuestionType,
    pub answer_choices: BTreeMap<String, String>,
}

impl From<Question> for PublicQuestion {
    fn from(question: Question) -> Self {
        Self {
            id: question.id,
            certification_id: question.certification_id,
            text: question.text,
            question_type: question.question_type,
            answer_choices: question.answer_choices.0,
        }
    }
}

/// DTO for creating a new question.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 2000))]
    pub text: String,
    pub question_type: QuestionType,
    #[validate(custom(function = validate_answer_choices))]
    pub answer_choices: BTreeMap<String, String>,
    /// Must reference keys present in answer_choices; checked against the
    /// stored choices before the question is persisted.
    pub correct_answer: BTreeSet<String>,
}

fn validate_answer_choices(
    choices: &BTreeMap<String, String>,
) -> Result<(), validator::ValidationError> {
    if choices.is_empty() {
        return Err(validator::ValidationError::new("choices_cannot_be_empty"));
    }
    for (key, label) in choices {
        if key.is_empty() || key.len() > 50 {
            return Err(validator::ValidationError::new("choice_key_length"));
        }
        if label.len() > 500 {
            return Err(validator::ValidationError::new("choice_label_too_long"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices(keys: &[&str]) -> BTreeMap<String, String> {
        keys.iter()
            .map(|k| (k.to_string(), format!("label {k}")))
            .collect()
    }

    fn keys(keys: &[&str]) -> BTreeSet<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn accepts_correct_answer_within_choices() {
        assert!(correct_answer_is_valid(
            &choices(&["A", "B", "C"]),
            &keys(&["B"])
        ));
        assert!(correct_answer_is_valid(
            &choices(&["A", "B", "C"]),
            &keys(&["A", "C"])
        ));
    }

    #[test]
    fn rejects_correct_answer_outside_choices() {
        assert!(!correct_answer_is_valid(
            &choices(&["A", "B"]),
            &keys(&["Z"])
        ));
        assert!(!correct_answer_is_valid(
            &choices(&["A", "B"]),
            &keys(&["A", "Z"])
        ));
    }

    #[test]
    fn rejects_empty_correct_answer() {
        assert!(!correct_answer_is_valid(&choices(&["A"]), &BTreeSet::new()));
    }
}
