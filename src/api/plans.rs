use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::models::{Plan, PlanCatalog};
use crate::services::PlanService;

/// Public plan listing
pub fn plan_routes(plan_service: PlanService) -> Router {
    Router::new()
        .route("/", get(list_plans))
        .route("/catalog", get(plan_catalog))
        .route("/:id", get(get_plan))
        .with_state(plan_service)
}

async fn list_plans(State(plan_service): State<PlanService>) -> ApiResult<Json<Vec<Plan>>> {
    Ok(Json(plan_service.list_active().await?))
}

async fn plan_catalog(State(plan_service): State<PlanService>) -> ApiResult<Json<PlanCatalog>> {
    Ok(Json(plan_service.catalog().await?))
}

#[tracing::instrument(skip(plan_service))]
async fn get_plan(
    State(plan_service): State<PlanService>,
    Path(plan_id): Path<Uuid>,
) -> ApiResult<Json<Plan>> {
    Ok(Json(plan_service.get_active(plan_id).await?))
}
