use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{CreateProgressRequest, ProgressEntry, ProgressListing};
use crate::services::trainer_service::ensure_link_owned;
use crate::validation::validate_form;

const PROGRESS_COLUMNS: &str = "p.id, p.trainer_client_id, p.recorded_on, p.weight_kg, \
     p.measurements, p.photos, p.notes, p.mood, p.energy";

#[derive(Debug, Clone)]
pub struct ProgressService {
    db: PgPool,
}

impl ProgressService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list(&self, trainer_id: Uuid) -> ApiResult<Vec<ProgressListing>> {
        let entries = sqlx::query_as::<_, ProgressListing>(&format!(
            "SELECT {PROGRESS_COLUMNS}, u.name AS client_name
             FROM progress_entries p
             JOIN trainer_clients tc ON tc.id = p.trainer_client_id
             JOIN users u ON u.id = tc.client_id
             WHERE tc.trainer_id = $1
             ORDER BY p.recorded_on DESC"
        ))
        .bind(trainer_id)
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }

    pub async fn list_for_link(&self, link_id: Uuid) -> ApiResult<Vec<ProgressEntry>> {
        let entries = sqlx::query_as::<_, ProgressEntry>(&format!(
            "SELECT {PROGRESS_COLUMNS} FROM progress_entries p
             WHERE p.trainer_client_id = $1
             ORDER BY p.recorded_on DESC"
        ))
        .bind(link_id)
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }

    #[tracing::instrument(skip(self, request), fields(link_id = %request.trainer_client_id))]
    pub async fn create(
        &self,
        trainer_id: Uuid,
        request: CreateProgressRequest,
    ) -> ApiResult<ProgressEntry> {
        validate_form(&request)?;
        ensure_link_owned(&self.db, trainer_id, request.trainer_client_id).await?;

        let photos = request
            .photos
            .map(|paths| Value::Array(paths.into_iter().map(Value::String).collect()));

        let entry = sqlx::query_as::<_, ProgressEntry>(
            "INSERT INTO progress_entries
                 (id, trainer_client_id, recorded_on, weight_kg, measurements, photos, notes, mood, energy)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING id, trainer_client_id, recorded_on, weight_kg, measurements, photos, notes, mood, energy",
        )
        .bind(Uuid::new_v4())
        .bind(request.trainer_client_id)
        .bind(request.recorded_on)
        .bind(request.weight_kg)
        .bind(request.measurements)
        .bind(photos)
        .bind(request.notes)
        .bind(request.mood)
        .bind(request.energy)
        .fetch_one(&self.db)
        .await?;

        Ok(entry)
    }

    pub async fn delete(&self, trainer_id: Uuid, entry_id: Uuid) -> ApiResult<()> {
        let result = sqlx::query(
            "DELETE FROM progress_entries p
             USING trainer_clients tc
             WHERE p.id = $1 AND tc.id = p.trainer_client_id AND tc.trainer_id = $2",
        )
        .bind(entry_id)
        .bind(trainer_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Progress entry"));
        }
        Ok(())
    }
}
