use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::validation::validate_plan_name;

/// Plans lasting at least this long are candidates for the highlighted slot.
pub const FEATURED_MIN_DURATION_DAYS: i32 = 365;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Plan {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub duration_days: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Plan {
    pub fn is_free(&self) -> bool {
        self.price == 0.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePlanRequest {
    #[validate(custom(function = "validate_plan_name"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 1000, message = "Description must have at most 1000 characters."))]
    pub description: String,
    #[validate(range(min = 0.0, message = "Price cannot be negative."))]
    pub price: f64,
    #[validate(range(min = 1, max = 3650, message = "Duration must be between 1 and 3650 days."))]
    pub duration_days: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdatePlanRequest {
    #[validate(custom(function = "validate_plan_name"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 1000, message = "Description must have at most 1000 characters."))]
    pub description: String,
    #[validate(range(min = 0.0, message = "Price cannot be negative."))]
    pub price: f64,
    #[validate(range(min = 1, max = 3650, message = "Duration must be between 1 and 3650 days."))]
    pub duration_days: i32,
    pub active: Option<bool>,
}

/// Public plan listing split the way the landing page shows it.
#[derive(Debug, Clone, Serialize, Default)]
pub struct PlanCatalog {
    /// Longest first.
    pub free_plans: Vec<Plan>,
    /// Cheapest first.
    pub paid_plans: Vec<Plan>,
    pub featured: Option<Plan>,
    pub total: usize,
}

impl PlanCatalog {
    pub fn from_plans(plans: Vec<Plan>) -> Self {
        let total = plans.len();
        let (mut free_plans, mut paid_plans): (Vec<Plan>, Vec<Plan>) =
            plans.into_iter().partition(Plan::is_free);

        free_plans.sort_by(|a, b| b.duration_days.cmp(&a.duration_days));
        paid_plans.sort_by(|a, b| a.price.total_cmp(&b.price));

        let featured = paid_plans
            .iter()
            .find(|p| p.duration_days >= FEATURED_MIN_DURATION_DAYS)
            .cloned();

        Self {
            free_plans,
            paid_plans,
            featured,
            total,
        }
    }
}
