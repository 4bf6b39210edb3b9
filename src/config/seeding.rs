use anyhow::Result;
use sqlx::PgPool;

use crate::auth::UserRole;
use crate::config::AdminSeed;
use crate::models::{CreatePlanRequest, CreateUser};
use crate::services::{PlanService, UserService};

/// Creates the records a fresh installation needs to be usable.
pub struct DatabaseSeeder {
    pool: PgPool,
}

impl DatabaseSeeder {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn seed_all(&self, admin: &AdminSeed) -> Result<()> {
        tracing::info!("Starting database seeding...");

        self.seed_admin(admin).await?;
        self.seed_plans().await?;

        tracing::info!("Database seeding completed");
        Ok(())
    }

    /// Create the default administrator unless one with that email exists.
    pub async fn seed_admin(&self, admin: &AdminSeed) -> Result<bool> {
        let user_service = UserService::new(self.pool.clone());

        if user_service.get_user_by_email(&admin.email).await?.is_some() {
            tracing::debug!("Administrator already exists");
            return Ok(false);
        }

        user_service
            .create_user(CreateUser {
                name: admin.name.clone(),
                email: admin.email.clone(),
                password: admin.password.clone(),
                role: UserRole::Admin,
            })
            .await?;

        tracing::warn!(email = %admin.email, "Created default administrator, change its password after the first login");
        Ok(true)
    }

    /// Starter catalog, only when no plan exists at all.
    pub async fn seed_plans(&self) -> Result<usize> {
        let plan_service = PlanService::new(self.pool.clone());
        if plan_service.count().await? > 0 {
            return Ok(0);
        }

        let plans = default_plans();
        let created = plans.len();
        for plan in plans {
            plan_service.create(plan).await?;
        }

        tracing::info!(count = created, "Created default plans");
        Ok(created)
    }
}

pub fn default_plans() -> Vec<CreatePlanRequest> {
    vec![
        CreatePlanRequest {
            name: "Free Trial".to_string(),
            description: "Seven days to explore the platform".to_string(),
            price: 0.0,
            duration_days: 7,
        },
        CreatePlanRequest {
            name: "Monthly".to_string(),
            description: "Full access, billed every month".to_string(),
            price: 89.90,
            duration_days: 30,
        },
        CreatePlanRequest {
            name: "Quarterly".to_string(),
            description: "Full access for three months".to_string(),
            price: 239.90,
            duration_days: 90,
        },
        CreatePlanRequest {
            name: "Annual".to_string(),
            description: "Full access for a year at the best price".to_string(),
            price: 799.90,
            duration_days: 365,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Plan, PlanCatalog};
    use chrono::Utc;
    use uuid::Uuid;
    use validator::Validate;

    #[test]
    fn test_default_plans_are_valid() {
        for plan in default_plans() {
            assert!(plan.validate().is_ok(), "{} should be valid", plan.name);
        }
    }

    #[test]
    fn test_default_catalog_features_annual_plan() {
        let plans = default_plans()
            .into_iter()
            .map(|p| Plan {
                id: Uuid::new_v4(),
                name: p.name,
                description: p.description,
                price: p.price,
                duration_days: p.duration_days,
                active: true,
                created_at: Utc::now(),
            })
            .collect();

        let catalog = PlanCatalog::from_plans(plans);
        assert_eq!(catalog.free_plans.len(), 1);
        assert_eq!(catalog.featured.map(|p| p.name), Some("Annual".to_string()));
    }
}
