use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::validation::{validate_training_goal, validate_training_name};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrainingStatus {
    #[default]
    Active,
    Paused,
    Completed,
}

impl TrainingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrainingStatus::Active => "active",
            TrainingStatus::Paused => "paused",
            TrainingStatus::Completed => "completed",
        }
    }
}

/// Training program written by a trainer for one of their clients.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TrainingPlan {
    pub id: Uuid,
    pub trainer_client_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub goal: String,
    pub difficulty: String,
    pub duration_weeks: Option<i32>,
    pub days_per_week: i32,
    /// Workout split, e.g. "ABC" or "Push/Pull/Legs".
    pub split: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TrainingPlanListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub plan: TrainingPlan,
    pub client_name: String,
}

fn default_days_per_week() -> i32 {
    3
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTrainingPlanRequest {
    pub trainer_client_id: Uuid,
    #[validate(custom(function = "validate_training_name"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(custom(function = "validate_training_goal"))]
    pub goal: String,
    pub difficulty: Difficulty,
    #[validate(range(min = 1, max = 104, message = "Duration must be between 1 and 104 weeks."))]
    pub duration_weeks: Option<i32>,
    #[serde(default = "default_days_per_week")]
    #[validate(range(min = 1, max = 7, message = "Days per week must be between 1 and 7."))]
    pub days_per_week: i32,
    pub split: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub status: TrainingStatus,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTrainingPlanRequest {
    #[validate(custom(function = "validate_training_name"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(custom(function = "validate_training_goal"))]
    pub goal: String,
    pub difficulty: Difficulty,
    #[validate(range(min = 1, max = 104, message = "Duration must be between 1 and 104 weeks."))]
    pub duration_weeks: Option<i32>,
    #[validate(range(min = 1, max = 7, message = "Days per week must be between 1 and 7."))]
    pub days_per_week: i32,
    pub split: Option<String>,
    pub notes: Option<String>,
    pub status: TrainingStatus,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
}
