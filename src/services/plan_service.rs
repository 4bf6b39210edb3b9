use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{CreatePlanRequest, Plan, PlanCatalog, UpdatePlanRequest};
use crate::validation::validate_form;

const PLAN_COLUMNS: &str = "id, name, description, price, duration_days, active, created_at";

#[derive(Debug, Clone)]
pub struct PlanService {
    db: PgPool,
}

impl PlanService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list_active(&self) -> ApiResult<Vec<Plan>> {
        let plans = sqlx::query_as::<_, Plan>(&format!(
            "SELECT {PLAN_COLUMNS} FROM plans WHERE active ORDER BY price ASC, duration_days ASC"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(plans)
    }

    pub async fn list_all(&self) -> ApiResult<Vec<Plan>> {
        let plans = sqlx::query_as::<_, Plan>(&format!(
            "SELECT {PLAN_COLUMNS} FROM plans ORDER BY created_at DESC"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(plans)
    }

    pub async fn catalog(&self) -> ApiResult<PlanCatalog> {
        Ok(PlanCatalog::from_plans(self.list_active().await?))
    }

    pub async fn get(&self, plan_id: Uuid) -> ApiResult<Plan> {
        sqlx::query_as::<_, Plan>(&format!("SELECT {PLAN_COLUMNS} FROM plans WHERE id = $1"))
            .bind(plan_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or(ApiError::NotFound("Plan"))
    }

    /// Active plans only, as offered to clients.
    pub async fn get_active(&self, plan_id: Uuid) -> ApiResult<Plan> {
        let plan = self.get(plan_id).await?;
        if !plan.active {
            return Err(ApiError::NotFound("Plan"));
        }
        Ok(plan)
    }

    #[tracing::instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(&self, request: CreatePlanRequest) -> ApiResult<Plan> {
        validate_form(&request)?;

        let plan = sqlx::query_as::<_, Plan>(&format!(
            "INSERT INTO plans (id, name, description, price, duration_days)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {PLAN_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(request.name.trim())
        .bind(request.description.trim())
        .bind(request.price)
        .bind(request.duration_days)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(plan_id = %plan.id, "plan created");
        Ok(plan)
    }

    pub async fn update(&self, plan_id: Uuid, request: UpdatePlanRequest) -> ApiResult<Plan> {
        validate_form(&request)?;

        sqlx::query_as::<_, Plan>(&format!(
            "UPDATE plans
             SET name = $2, description = $3, price = $4, duration_days = $5,
                 active = COALESCE($6, active)
             WHERE id = $1
             RETURNING {PLAN_COLUMNS}"
        ))
        .bind(plan_id)
        .bind(request.name.trim())
        .bind(request.description.trim())
        .bind(request.price)
        .bind(request.duration_days)
        .bind(request.active)
        .fetch_optional(&self.db)
        .await?
        .ok_or(ApiError::NotFound("Plan"))
    }

    pub async fn delete(&self, plan_id: Uuid) -> ApiResult<()> {
        let result = sqlx::query("DELETE FROM plans WHERE id = $1")
            .bind(plan_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Plan"));
        }
        tracing::info!(plan_id = %plan_id, "plan deleted");
        Ok(())
    }

    pub async fn count(&self) -> ApiResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM plans")
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }
}
