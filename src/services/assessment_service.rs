use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{Assessment, AssessmentListing, CreateAssessmentRequest};
use crate::services::trainer_service::ensure_link_owned;
use crate::validation::validate_form;

const ASSESSMENT_COLUMNS: &str = "a.id, a.trainer_client_id, a.assessed_on, a.weight_kg, \
     a.height_m, a.bmi, a.body_fat_percentage, a.lean_mass_kg, a.circumferences, a.notes, \
     a.next_assessment_on";

#[derive(Debug, Clone)]
pub struct AssessmentService {
    db: PgPool,
}

impl AssessmentService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list(&self, trainer_id: Uuid) -> ApiResult<Vec<AssessmentListing>> {
        let assessments = sqlx::query_as::<_, AssessmentListing>(&format!(
            "SELECT {ASSESSMENT_COLUMNS}, u.name AS client_name
             FROM assessments a
             JOIN trainer_clients tc ON tc.id = a.trainer_client_id
             JOIN users u ON u.id = tc.client_id
             WHERE tc.trainer_id = $1
             ORDER BY a.assessed_on DESC"
        ))
        .bind(trainer_id)
        .fetch_all(&self.db)
        .await?;

        Ok(assessments)
    }

    pub async fn list_for_link(&self, link_id: Uuid) -> ApiResult<Vec<Assessment>> {
        let assessments = sqlx::query_as::<_, Assessment>(&format!(
            "SELECT {ASSESSMENT_COLUMNS} FROM assessments a
             WHERE a.trainer_client_id = $1
             ORDER BY a.assessed_on DESC"
        ))
        .bind(link_id)
        .fetch_all(&self.db)
        .await?;

        Ok(assessments)
    }

    pub async fn get(&self, trainer_id: Uuid, assessment_id: Uuid) -> ApiResult<AssessmentListing> {
        sqlx::query_as::<_, AssessmentListing>(&format!(
            "SELECT {ASSESSMENT_COLUMNS}, u.name AS client_name
             FROM assessments a
             JOIN trainer_clients tc ON tc.id = a.trainer_client_id
             JOIN users u ON u.id = tc.client_id
             WHERE a.id = $1 AND tc.trainer_id = $2"
        ))
        .bind(assessment_id)
        .bind(trainer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(ApiError::NotFound("Assessment"))
    }

    #[tracing::instrument(skip(self, request), fields(link_id = %request.trainer_client_id))]
    pub async fn create(
        &self,
        trainer_id: Uuid,
        request: CreateAssessmentRequest,
    ) -> ApiResult<Assessment> {
        validate_form(&request)?;
        ensure_link_owned(&self.db, trainer_id, request.trainer_client_id).await?;

        let bmi = request.resolved_bmi();
        let assessment = sqlx::query_as::<_, Assessment>(
            "INSERT INTO assessments
                 (id, trainer_client_id, assessed_on, weight_kg, height_m, bmi,
                  body_fat_percentage, lean_mass_kg, circumferences, notes, next_assessment_on)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING id, trainer_client_id, assessed_on, weight_kg, height_m, bmi,
                       body_fat_percentage, lean_mass_kg, circumferences, notes, next_assessment_on",
        )
        .bind(Uuid::new_v4())
        .bind(request.trainer_client_id)
        .bind(request.assessed_on)
        .bind(request.weight_kg)
        .bind(request.height_m)
        .bind(bmi)
        .bind(request.body_fat_percentage)
        .bind(request.lean_mass_kg)
        .bind(request.circumferences)
        .bind(request.notes)
        .bind(request.next_assessment_on)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(assessment_id = %assessment.id, "assessment recorded");
        Ok(assessment)
    }

    pub async fn delete(&self, trainer_id: Uuid, assessment_id: Uuid) -> ApiResult<()> {
        let result = sqlx::query(
            "DELETE FROM assessments a
             USING trainer_clients tc
             WHERE a.id = $1 AND tc.id = a.trainer_client_id AND tc.trainer_id = $2",
        )
        .bind(assessment_id)
        .bind(trainer_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Assessment"));
        }
        Ok(())
    }
}
