// src/models/certification.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Represents the 'certifications' table in the database.
/// A certification owns its questions and recorded attempts; deleting one
/// cascades to both at the storage layer.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Certification {
    pub id: Uuid,

    /// Unique human-readable name.
    pub name: String,

    pub description: Option<String>,

    /// Minimum score required to pass, in [0, 100].
    pub passing_score: i32,
}

impl Certification {
    pub fn new(name: String, description: Option<String>, passing_score: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            passing_score,
        }
    }
}

/// DTO for creating a new certification.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCertificationRequest {
    #[validate(length(
        min = 1,
        max = 150,
        message = "Certification name must be between 1 and 150 characters."
    ))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    /// Defaults to 70 when omitted.
    #[validate(range(min = 0, max = 100, message = "Passing score must be within 0-100."))]
    pub passing_score: Option<i32>,
}
