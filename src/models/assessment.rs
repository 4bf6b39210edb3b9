use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Physical assessment of a trainer's client.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Assessment {
    pub id: Uuid,
    pub trainer_client_id: Uuid,
    pub assessed_on: NaiveDate,
    pub weight_kg: Option<f64>,
    pub height_m: Option<f64>,
    pub bmi: Option<f64>,
    pub body_fat_percentage: Option<f64>,
    pub lean_mass_kg: Option<f64>,
    /// Body measurements keyed by site (neck, arm, waist, ...), in centimetres.
    pub circumferences: Option<Value>,
    pub notes: Option<String>,
    pub next_assessment_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AssessmentListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub assessment: Assessment,
    pub client_name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAssessmentRequest {
    pub trainer_client_id: Uuid,
    pub assessed_on: NaiveDate,
    #[validate(range(min = 1.0, max = 500.0, message = "Weight must be between 1 and 500 kg."))]
    pub weight_kg: Option<f64>,
    #[validate(range(min = 0.5, max = 2.5, message = "Height must be between 0.5 and 2.5 m."))]
    pub height_m: Option<f64>,
    #[validate(range(min = 5.0, max = 100.0, message = "BMI must be between 5 and 100."))]
    pub bmi: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0, message = "Body fat must be between 0 and 100%."))]
    pub body_fat_percentage: Option<f64>,
    #[validate(range(min = 0.0, max = 500.0, message = "Lean mass must be between 0 and 500 kg."))]
    pub lean_mass_kg: Option<f64>,
    pub circumferences: Option<Value>,
    pub notes: Option<String>,
    pub next_assessment_on: Option<NaiveDate>,
}

impl CreateAssessmentRequest {
    /// Supplied BMI wins; otherwise derive it from weight and height.
    pub fn resolved_bmi(&self) -> Option<f64> {
        self.bmi.or_else(|| match (self.weight_kg, self.height_m) {
            (Some(weight), Some(height)) => body_mass_index(weight, height),
            _ => None,
        })
    }
}

/// BMI rounded to one decimal place.
pub fn body_mass_index(weight_kg: f64, height_m: f64) -> Option<f64> {
    if weight_kg <= 0.0 || height_m <= 0.0 {
        return None;
    }
    let bmi = weight_kg / (height_m * height_m);
    Some((bmi * 10.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(weight_kg: Option<f64>, height_m: Option<f64>, bmi: Option<f64>) -> CreateAssessmentRequest {
        CreateAssessmentRequest {
            trainer_client_id: Uuid::new_v4(),
            assessed_on: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            weight_kg,
            height_m,
            bmi,
            body_fat_percentage: None,
            lean_mass_kg: None,
            circumferences: None,
            notes: None,
            next_assessment_on: None,
        }
    }

    #[test]
    fn test_body_mass_index() {
        assert_eq!(body_mass_index(70.0, 1.75), Some(22.9));
        assert_eq!(body_mass_index(70.0, 0.0), None);
    }

    #[test]
    fn test_resolved_bmi() {
        assert_eq!(request(Some(80.0), Some(2.0), None).resolved_bmi(), Some(20.0));
        assert_eq!(request(Some(80.0), Some(2.0), Some(21.5)).resolved_bmi(), Some(21.5));
        assert_eq!(request(Some(80.0), None, None).resolved_bmi(), None);
    }

    #[test]
    fn test_range_validation() {
        assert!(request(Some(80.0), Some(1.8), None).validate().is_ok());
        assert!(request(Some(80.0), Some(180.0), None).validate().is_err());
    }
}
