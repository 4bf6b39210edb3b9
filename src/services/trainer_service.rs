use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::auth::is_unique_violation;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    AvailableClient, LinkClientRequest, LinkStatus, TrainerClient, TrainerClientDetails,
    TrainerClientListing, TrainerDashboard, TrainerProfile, UpdateTrainerClientRequest,
    UpdateTrainerProfileRequest,
};
use crate::services::{AssessmentService, ProgressService, TrainingPlanService};
use crate::validation::validate_form;

const PROFILE_COLUMNS: &str = "id, professional_id, cref, specialties, biography, years_experience, \
     monthly_fee, status, rating_average, total_clients, created_at";

const LINK_COLUMNS: &str = "tc.id, tc.trainer_id, tc.client_id, tc.started_on, tc.ended_on, \
     tc.status, tc.goal, tc.notes";

/// Fails with not-found unless `link_id` belongs to `trainer_id`.
pub async fn ensure_link_owned<'e, E>(executor: E, trainer_id: Uuid, link_id: Uuid) -> ApiResult<()>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let owned: Option<Uuid> =
        sqlx::query_scalar("SELECT id FROM trainer_clients WHERE id = $1 AND trainer_id = $2")
            .bind(link_id)
            .bind(trainer_id)
            .fetch_optional(executor)
            .await?;

    owned.map(|_| ()).ok_or(ApiError::NotFound("Client"))
}

/// Trainer profile, dashboard and client links.
#[derive(Debug, Clone)]
pub struct TrainerService {
    db: PgPool,
    training_plans: TrainingPlanService,
    assessments: AssessmentService,
    progress: ProgressService,
}

impl TrainerService {
    pub fn new(db: PgPool) -> Self {
        Self {
            training_plans: TrainingPlanService::new(db.clone()),
            assessments: AssessmentService::new(db.clone()),
            progress: ProgressService::new(db.clone()),
            db,
        }
    }

    /// Profile of the professional, created on first access.
    pub async fn profile(&self, professional_id: Uuid) -> ApiResult<TrainerProfile> {
        let is_professional: Option<Uuid> =
            sqlx::query_scalar("SELECT user_id FROM professionals WHERE user_id = $1")
                .bind(professional_id)
                .fetch_optional(&self.db)
                .await?;
        if is_professional.is_none() {
            return Err(ApiError::NotFound("Professional"));
        }

        let created = sqlx::query(
            "INSERT INTO trainer_profiles (id, professional_id) VALUES ($1, $2)
             ON CONFLICT (professional_id) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(professional_id)
        .execute(&self.db)
        .await?;
        if created.rows_affected() > 0 {
            tracing::info!(professional_id = %professional_id, "trainer profile created");
        }

        let profile = sqlx::query_as::<_, TrainerProfile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM trainer_profiles WHERE professional_id = $1"
        ))
        .bind(professional_id)
        .fetch_one(&self.db)
        .await?;

        Ok(profile)
    }

    pub async fn update_profile(
        &self,
        professional_id: Uuid,
        request: UpdateTrainerProfileRequest,
    ) -> ApiResult<TrainerProfile> {
        validate_form(&request)?;
        let profile = self.profile(professional_id).await?;

        let updated = sqlx::query_as::<_, TrainerProfile>(&format!(
            "UPDATE trainer_profiles
             SET cref = $2, specialties = $3, biography = $4, years_experience = $5, monthly_fee = $6
             WHERE id = $1
             RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(profile.id)
        .bind(request.cref)
        .bind(request.specialties)
        .bind(request.biography)
        .bind(request.years_experience)
        .bind(request.monthly_fee)
        .fetch_one(&self.db)
        .await?;

        Ok(updated)
    }

    pub async fn dashboard(&self, trainer: &TrainerProfile) -> ApiResult<TrainerDashboard> {
        let (total_clients, active_clients): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE status = $2)
             FROM trainer_clients WHERE trainer_id = $1",
        )
        .bind(trainer.id)
        .bind(LinkStatus::Active.as_str())
        .fetch_one(&self.db)
        .await?;

        let total_training_plans: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM training_plans tp
             JOIN trainer_clients tc ON tc.id = tp.trainer_client_id
             WHERE tc.trainer_id = $1",
        )
        .bind(trainer.id)
        .fetch_one(&self.db)
        .await?;

        let total_assessments: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM assessments a
             JOIN trainer_clients tc ON tc.id = a.trainer_client_id
             WHERE tc.trainer_id = $1",
        )
        .bind(trainer.id)
        .fetch_one(&self.db)
        .await?;

        Ok(TrainerDashboard {
            total_clients,
            active_clients,
            total_training_plans,
            total_assessments,
            rating_average: trainer.rating_average,
        })
    }

    pub async fn list_clients(&self, trainer_id: Uuid) -> ApiResult<Vec<TrainerClientListing>> {
        let clients = sqlx::query_as::<_, TrainerClientListing>(&format!(
            "SELECT {LINK_COLUMNS}, u.name AS client_name, u.email AS client_email
             FROM trainer_clients tc
             JOIN users u ON u.id = tc.client_id
             WHERE tc.trainer_id = $1
             ORDER BY u.name ASC"
        ))
        .bind(trainer_id)
        .fetch_all(&self.db)
        .await?;

        Ok(clients)
    }

    /// Registered clients not yet linked to this trainer.
    pub async fn available_clients(&self, trainer_id: Uuid) -> ApiResult<Vec<AvailableClient>> {
        let clients = sqlx::query_as::<_, AvailableClient>(
            "SELECT u.id, u.name, u.email
             FROM clients c
             JOIN users u ON u.id = c.user_id
             WHERE NOT EXISTS (
                 SELECT 1 FROM trainer_clients tc
                 WHERE tc.client_id = c.user_id AND tc.trainer_id = $1
             )
             ORDER BY u.name ASC",
        )
        .bind(trainer_id)
        .fetch_all(&self.db)
        .await?;

        Ok(clients)
    }

    #[tracing::instrument(skip(self, request), fields(client_id = %request.client_id))]
    pub async fn link_client(
        &self,
        trainer_id: Uuid,
        request: LinkClientRequest,
    ) -> ApiResult<TrainerClient> {
        validate_form(&request)?;

        let mut tx = self.db.begin().await?;

        let client: Option<Uuid> = sqlx::query_scalar("SELECT user_id FROM clients WHERE user_id = $1")
            .bind(request.client_id)
            .fetch_optional(&mut *tx)
            .await?;
        if client.is_none() {
            return Err(ApiError::field("client_id", "Client not found."));
        }

        let link = sqlx::query_as::<_, TrainerClient>(
            "INSERT INTO trainer_clients (id, trainer_id, client_id, started_on, status, goal, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id, trainer_id, client_id, started_on, ended_on, status, goal, notes",
        )
        .bind(Uuid::new_v4())
        .bind(trainer_id)
        .bind(request.client_id)
        .bind(request.started_on)
        .bind(request.status.as_str())
        .bind(request.goal)
        .bind(request.notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                ApiError::field("client_id", "This client is already linked to you.")
            } else {
                ApiError::Database(err)
            }
        })?;

        sqlx::query("UPDATE trainer_profiles SET total_clients = total_clients + 1 WHERE id = $1")
            .bind(trainer_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(link_id = %link.id, "client linked");
        Ok(link)
    }

    pub async fn get_link(&self, trainer_id: Uuid, link_id: Uuid) -> ApiResult<TrainerClientListing> {
        sqlx::query_as::<_, TrainerClientListing>(&format!(
            "SELECT {LINK_COLUMNS}, u.name AS client_name, u.email AS client_email
             FROM trainer_clients tc
             JOIN users u ON u.id = tc.client_id
             WHERE tc.id = $1 AND tc.trainer_id = $2"
        ))
        .bind(link_id)
        .bind(trainer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(ApiError::NotFound("Client"))
    }

    pub async fn update_link(
        &self,
        trainer_id: Uuid,
        link_id: Uuid,
        request: UpdateTrainerClientRequest,
    ) -> ApiResult<TrainerClient> {
        validate_form(&request)?;

        sqlx::query_as::<_, TrainerClient>(
            "UPDATE trainer_clients
             SET started_on = $3, ended_on = $4, status = $5, goal = $6, notes = $7
             WHERE id = $1 AND trainer_id = $2
             RETURNING id, trainer_id, client_id, started_on, ended_on, status, goal, notes",
        )
        .bind(link_id)
        .bind(trainer_id)
        .bind(request.started_on)
        .bind(request.ended_on)
        .bind(request.status.as_str())
        .bind(request.goal)
        .bind(request.notes)
        .fetch_optional(&self.db)
        .await?
        .ok_or(ApiError::NotFound("Client"))
    }

    pub async fn client_details(
        &self,
        trainer_id: Uuid,
        link_id: Uuid,
    ) -> ApiResult<TrainerClientDetails> {
        let client = self.get_link(trainer_id, link_id).await?;

        let (training_plans, assessments, progress) = tokio::try_join!(
            self.training_plans.list_for_link(link_id),
            self.assessments.list_for_link(link_id),
            self.progress.list_for_link(link_id),
        )?;
        let last_assessment_on = assessments.iter().map(|a| a.assessed_on).max();

        Ok(TrainerClientDetails {
            client,
            training_plans,
            assessments,
            last_assessment_on,
            progress,
        })
    }

    /// Remove the link together with its plans, assessments and progress.
    pub async fn unlink(&self, trainer_id: Uuid, link_id: Uuid) -> ApiResult<()> {
        let mut tx = self.db.begin().await?;

        let result = sqlx::query("DELETE FROM trainer_clients WHERE id = $1 AND trainer_id = $2")
            .bind(link_id)
            .bind(trainer_id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Client"));
        }

        sqlx::query(
            "UPDATE trainer_profiles SET total_clients = GREATEST(total_clients - 1, 0) WHERE id = $1",
        )
        .bind(trainer_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!(link_id = %link_id, "client unlinked");
        Ok(())
    }
}
