use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{
    CreateTrainingPlanRequest, TrainingPlan, TrainingPlanListing, UpdateTrainingPlanRequest,
};
use crate::services::trainer_service::ensure_link_owned;
use crate::validation::validate_form;

const PLAN_COLUMNS: &str = "tp.id, tp.trainer_client_id, tp.name, tp.description, tp.goal, \
     tp.difficulty, tp.duration_weeks, tp.days_per_week, tp.split, tp.notes, tp.status, \
     tp.starts_on, tp.ends_on, tp.created_at, tp.updated_at";

const RETURNING: &str = "RETURNING id, trainer_client_id, name, description, goal, difficulty, \
     duration_weeks, days_per_week, split, notes, status, starts_on, ends_on, created_at, updated_at";

/// Training programs written by trainers for their clients.
#[derive(Debug, Clone)]
pub struct TrainingPlanService {
    db: PgPool,
}

impl TrainingPlanService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Every plan of every client of the trainer, newest first.
    pub async fn list(&self, trainer_id: Uuid) -> ApiResult<Vec<TrainingPlanListing>> {
        let plans = sqlx::query_as::<_, TrainingPlanListing>(&format!(
            "SELECT {PLAN_COLUMNS}, u.name AS client_name
             FROM training_plans tp
             JOIN trainer_clients tc ON tc.id = tp.trainer_client_id
             JOIN users u ON u.id = tc.client_id
             WHERE tc.trainer_id = $1
             ORDER BY tp.created_at DESC"
        ))
        .bind(trainer_id)
        .fetch_all(&self.db)
        .await?;

        Ok(plans)
    }

    pub async fn list_for_link(&self, link_id: Uuid) -> ApiResult<Vec<TrainingPlan>> {
        let plans = sqlx::query_as::<_, TrainingPlan>(&format!(
            "SELECT {PLAN_COLUMNS} FROM training_plans tp
             WHERE tp.trainer_client_id = $1
             ORDER BY tp.created_at DESC"
        ))
        .bind(link_id)
        .fetch_all(&self.db)
        .await?;

        Ok(plans)
    }

    pub async fn get(&self, trainer_id: Uuid, plan_id: Uuid) -> ApiResult<TrainingPlanListing> {
        sqlx::query_as::<_, TrainingPlanListing>(&format!(
            "SELECT {PLAN_COLUMNS}, u.name AS client_name
             FROM training_plans tp
             JOIN trainer_clients tc ON tc.id = tp.trainer_client_id
             JOIN users u ON u.id = tc.client_id
             WHERE tp.id = $1 AND tc.trainer_id = $2"
        ))
        .bind(plan_id)
        .bind(trainer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(ApiError::NotFound("Training plan"))
    }

    #[tracing::instrument(skip(self, request), fields(link_id = %request.trainer_client_id))]
    pub async fn create(
        &self,
        trainer_id: Uuid,
        request: CreateTrainingPlanRequest,
    ) -> ApiResult<TrainingPlan> {
        validate_form(&request)?;
        ensure_link_owned(&self.db, trainer_id, request.trainer_client_id).await?;

        let plan = sqlx::query_as::<_, TrainingPlan>(&format!(
            "INSERT INTO training_plans
                 (id, trainer_client_id, name, description, goal, difficulty, duration_weeks,
                  days_per_week, split, notes, status, starts_on, ends_on)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             {RETURNING}"
        ))
        .bind(Uuid::new_v4())
        .bind(request.trainer_client_id)
        .bind(request.name.trim())
        .bind(request.description)
        .bind(request.goal.trim())
        .bind(request.difficulty.as_str())
        .bind(request.duration_weeks)
        .bind(request.days_per_week)
        .bind(request.split)
        .bind(request.notes)
        .bind(request.status.as_str())
        .bind(request.starts_on)
        .bind(request.ends_on)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(training_plan_id = %plan.id, "training plan created");
        Ok(plan)
    }

    pub async fn update(
        &self,
        trainer_id: Uuid,
        plan_id: Uuid,
        request: UpdateTrainingPlanRequest,
    ) -> ApiResult<TrainingPlan> {
        validate_form(&request)?;

        sqlx::query_as::<_, TrainingPlan>(&format!(
            "UPDATE training_plans tp
             SET name = $3, description = $4, goal = $5, difficulty = $6, duration_weeks = $7,
                 days_per_week = $8, split = $9, notes = $10, status = $11, starts_on = $12,
                 ends_on = $13, updated_at = NOW()
             FROM trainer_clients tc
             WHERE tp.id = $1 AND tc.id = tp.trainer_client_id AND tc.trainer_id = $2
             RETURNING {PLAN_COLUMNS}"
        ))
        .bind(plan_id)
        .bind(trainer_id)
        .bind(request.name.trim())
        .bind(request.description)
        .bind(request.goal.trim())
        .bind(request.difficulty.as_str())
        .bind(request.duration_weeks)
        .bind(request.days_per_week)
        .bind(request.split)
        .bind(request.notes)
        .bind(request.status.as_str())
        .bind(request.starts_on)
        .bind(request.ends_on)
        .fetch_optional(&self.db)
        .await?
        .ok_or(ApiError::NotFound("Training plan"))
    }

    pub async fn delete(&self, trainer_id: Uuid, plan_id: Uuid) -> ApiResult<()> {
        let result = sqlx::query(
            "DELETE FROM training_plans tp
             USING trainer_clients tc
             WHERE tp.id = $1 AND tc.id = tp.trainer_client_id AND tc.trainer_id = $2",
        )
        .bind(plan_id)
        .bind(trainer_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Training plan"));
        }
        Ok(())
    }
}
