use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProgressEntry {
    pub id: Uuid,
    pub trainer_client_id: Uuid,
    pub recorded_on: NaiveDate,
    pub weight_kg: Option<f64>,
    pub measurements: Option<Value>,
    /// JSON list of uploaded photo paths.
    pub photos: Option<Value>,
    pub notes: Option<String>,
    pub mood: Option<String>,
    pub energy: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProgressListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub entry: ProgressEntry,
    pub client_name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProgressRequest {
    pub trainer_client_id: Uuid,
    pub recorded_on: NaiveDate,
    #[validate(range(min = 1.0, max = 500.0, message = "Weight must be between 1 and 500 kg."))]
    pub weight_kg: Option<f64>,
    pub measurements: Option<Value>,
    pub photos: Option<Vec<String>>,
    pub notes: Option<String>,
    #[validate(length(max = 50, message = "Mood must have at most 50 characters."))]
    pub mood: Option<String>,
    #[validate(range(min = 1, max = 10, message = "Energy must be between 1 and 10."))]
    pub energy: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_bounds() {
        let mut request = CreateProgressRequest {
            trainer_client_id: Uuid::new_v4(),
            recorded_on: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            weight_kg: Some(72.5),
            measurements: None,
            photos: None,
            notes: None,
            mood: Some("motivated".to_string()),
            energy: Some(10),
        };
        assert!(request.validate().is_ok());

        request.energy = Some(11);
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("energy"));

        request.energy = None;
        assert!(request.validate().is_ok());
    }
}
