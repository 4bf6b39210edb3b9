use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{PendingProfessional, ProfessionalListing, ProfessionalStatus};

const LISTING_SELECT: &str = "
    SELECT p.user_id, p.specialty, p.professional_registry, p.tax_id, p.registry_photo,
           p.status, p.requested_at, p.reviewed_at, p.reviewed_by,
           u.name, u.email, r.name AS reviewed_by_name
    FROM professionals p
    JOIN users u ON u.id = p.user_id
    LEFT JOIN users r ON r.id = p.reviewed_by";

/// Review workflow for professional registrations.
#[derive(Debug, Clone)]
pub struct ProfessionalService {
    db: PgPool,
}

impl ProfessionalService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list_all(&self) -> ApiResult<Vec<ProfessionalListing>> {
        let professionals = sqlx::query_as::<_, ProfessionalListing>(&format!(
            "{LISTING_SELECT} ORDER BY p.requested_at DESC"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(professionals)
    }

    /// Oldest requests first.
    pub async fn list_pending(&self) -> ApiResult<Vec<ProfessionalListing>> {
        let professionals = sqlx::query_as::<_, ProfessionalListing>(&format!(
            "{LISTING_SELECT} WHERE p.status = $1 ORDER BY p.requested_at ASC"
        ))
        .bind(ProfessionalStatus::Pending.as_str())
        .fetch_all(&self.db)
        .await?;

        Ok(professionals)
    }

    pub async fn get(&self, user_id: Uuid) -> ApiResult<ProfessionalListing> {
        sqlx::query_as::<_, ProfessionalListing>(&format!("{LISTING_SELECT} WHERE p.user_id = $1"))
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or(ApiError::NotFound("Professional"))
    }

    pub async fn approve(&self, user_id: Uuid, reviewer_id: Uuid) -> ApiResult<ProfessionalListing> {
        self.set_status(user_id, reviewer_id, ProfessionalStatus::Approved).await
    }

    pub async fn reject(&self, user_id: Uuid, reviewer_id: Uuid) -> ApiResult<ProfessionalListing> {
        self.set_status(user_id, reviewer_id, ProfessionalStatus::Rejected).await
    }

    pub async fn deactivate(&self, user_id: Uuid, reviewer_id: Uuid) -> ApiResult<ProfessionalListing> {
        self.set_status(user_id, reviewer_id, ProfessionalStatus::Inactive).await
    }

    #[tracing::instrument(skip(self), fields(status = status.as_str()))]
    async fn set_status(
        &self,
        user_id: Uuid,
        reviewer_id: Uuid,
        status: ProfessionalStatus,
    ) -> ApiResult<ProfessionalListing> {
        let result = sqlx::query(
            "UPDATE professionals
             SET status = $2, reviewed_at = NOW(), reviewed_by = $3
             WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(status.as_str())
        .bind(reviewer_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Professional"));
        }

        tracing::info!(professional_id = %user_id, "professional status changed");
        self.get(user_id).await
    }

    pub async fn count(&self, status: Option<ProfessionalStatus>) -> ApiResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM professionals WHERE ($1::TEXT IS NULL OR status = $1)",
        )
        .bind(status.map(|s| s.as_str()))
        .fetch_one(&self.db)
        .await?;

        Ok(count)
    }

    pub async fn recent_pending(&self, limit: i64) -> ApiResult<Vec<PendingProfessional>> {
        let pending = sqlx::query_as::<_, PendingProfessional>(
            "SELECT p.user_id, u.name, u.email, p.specialty, p.requested_at
             FROM professionals p
             JOIN users u ON u.id = p.user_id
             WHERE p.status = $1
             ORDER BY p.requested_at DESC
             LIMIT $2",
        )
        .bind(ProfessionalStatus::Pending.as_str())
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(pending)
    }
}
