use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::{Assessment, ProgressEntry, TrainingPlan};

/// Trainer-facing profile attached to an approved professional.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TrainerProfile {
    pub id: Uuid,
    pub professional_id: Uuid,
    pub cref: Option<String>,
    pub specialties: Option<String>,
    pub biography: Option<String>,
    pub years_experience: Option<i32>,
    pub monthly_fee: Option<f64>,
    pub status: String,
    pub rating_average: Option<f64>,
    pub total_clients: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateTrainerProfileRequest {
    #[validate(length(max = 30, message = "CREF must have at most 30 characters."))]
    pub cref: Option<String>,
    #[validate(length(max = 255, message = "Specialties must have at most 255 characters."))]
    pub specialties: Option<String>,
    #[validate(length(max = 2000, message = "Biography must have at most 2000 characters."))]
    pub biography: Option<String>,
    #[validate(range(min = 0, max = 80, message = "Years of experience must be between 0 and 80."))]
    pub years_experience: Option<i32>,
    #[validate(range(min = 0.0, message = "Monthly fee cannot be negative."))]
    pub monthly_fee: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    #[default]
    Active,
    Inactive,
    Cancelled,
}

impl LinkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStatus::Active => "active",
            LinkStatus::Inactive => "inactive",
            LinkStatus::Cancelled => "cancelled",
        }
    }
}

/// A client followed by a trainer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TrainerClient {
    pub id: Uuid,
    pub trainer_id: Uuid,
    pub client_id: Uuid,
    pub started_on: NaiveDate,
    pub ended_on: Option<NaiveDate>,
    pub status: String,
    pub goal: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TrainerClientListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub link: TrainerClient,
    pub client_name: String,
    pub client_email: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LinkClientRequest {
    pub client_id: Uuid,
    pub started_on: NaiveDate,
    #[serde(default)]
    pub status: LinkStatus,
    #[validate(length(max = 255, message = "Goal must have at most 255 characters."))]
    pub goal: Option<String>,
    #[validate(length(max = 2000, message = "Notes must have at most 2000 characters."))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTrainerClientRequest {
    pub started_on: NaiveDate,
    pub ended_on: Option<NaiveDate>,
    pub status: LinkStatus,
    #[validate(length(max = 255, message = "Goal must have at most 255 characters."))]
    pub goal: Option<String>,
    #[validate(length(max = 2000, message = "Notes must have at most 2000 characters."))]
    pub notes: Option<String>,
}

/// Registered client that can be linked to a trainer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AvailableClient {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrainerClientDetails {
    pub client: TrainerClientListing,
    pub training_plans: Vec<TrainingPlan>,
    pub assessments: Vec<Assessment>,
    pub last_assessment_on: Option<NaiveDate>,
    pub progress: Vec<ProgressEntry>,
}

#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct TrainerDashboard {
    pub total_clients: i64,
    pub active_clients: i64,
    pub total_training_plans: i64,
    pub total_assessments: i64,
    pub rating_average: Option<f64>,
}
