use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Areas a professional can register under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Specialty {
    PersonalTrainer,
    Nutritionist,
    Physiotherapist,
    PhysicalEducator,
    SportsPhysician,
    SportsPsychologist,
    Other,
}

impl Specialty {
    pub const ALL: [Specialty; 7] = [
        Specialty::PersonalTrainer,
        Specialty::Nutritionist,
        Specialty::Physiotherapist,
        Specialty::PhysicalEducator,
        Specialty::SportsPhysician,
        Specialty::SportsPsychologist,
        Specialty::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Specialty::PersonalTrainer => "Personal Trainer",
            Specialty::Nutritionist => "Nutritionist",
            Specialty::Physiotherapist => "Physiotherapist",
            Specialty::PhysicalEducator => "Physical Educator",
            Specialty::SportsPhysician => "Sports Physician",
            Specialty::SportsPsychologist => "Sports Psychologist",
            Specialty::Other => "Other",
        }
    }

    /// Accepts the exact form label, surrounding whitespace ignored.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProfessionalStatus {
    Pending,
    Approved,
    Rejected,
    Inactive,
}

impl ProfessionalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfessionalStatus::Pending => "pending",
            ProfessionalStatus::Approved => "approved",
            ProfessionalStatus::Rejected => "rejected",
            ProfessionalStatus::Inactive => "inactive",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Professional {
    pub user_id: Uuid,
    pub specialty: String,
    pub professional_registry: Option<String>,
    pub tax_id: String,
    pub registry_photo: String,
    pub status: String,
    pub requested_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<Uuid>,
}

/// Professional joined with its account and reviewer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfessionalListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub professional: Professional,
    pub name: String,
    pub email: String,
    pub reviewed_by_name: Option<String>,
}

/// Normalized professional registration, ready to persist.
#[derive(Debug, Clone)]
pub struct NewProfessional {
    pub name: String,
    pub email: String,
    pub password: String,
    pub specialty: Specialty,
    pub professional_registry: Option<String>,
    pub tax_id: String,
}
