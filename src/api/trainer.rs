use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{delete, get},
    Extension, Router,
};
use uuid::Uuid;

use crate::auth::{jwt_auth_middleware, professional_only_middleware, AuthService, UserSession};
use crate::error::ApiResult;
use crate::models::{
    Assessment, AssessmentListing, AvailableClient, CreateAssessmentRequest,
    CreateProgressRequest, CreateTrainingPlanRequest, LinkClientRequest, ProgressEntry,
    ProgressListing, TrainerClient, TrainerClientDetails, TrainerClientListing, TrainerDashboard,
    TrainerProfile, TrainingPlan, TrainingPlanListing, UpdateTrainerClientRequest,
    UpdateTrainerProfileRequest, UpdateTrainingPlanRequest,
};
use crate::services::{AssessmentService, ProgressService, TrainerService, TrainingPlanService};

#[derive(Clone)]
pub struct TrainerAppState {
    pub trainer_service: TrainerService,
    pub training_plan_service: TrainingPlanService,
    pub assessment_service: AssessmentService,
    pub progress_service: ProgressService,
}

impl TrainerAppState {
    /// Trainer profile of the logged-in professional.
    async fn trainer(&self, session: &UserSession) -> ApiResult<TrainerProfile> {
        self.trainer_service.profile(session.user_id).await
    }
}

/// Trainer area, professionals only
pub fn trainer_routes(state: TrainerAppState, auth_service: AuthService) -> Router {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/profile", get(get_profile).put(update_profile))
        .route("/clients", get(list_clients).post(link_client))
        .route("/clients/available", get(available_clients))
        .route(
            "/clients/:id",
            get(client_details).put(update_client).delete(unlink_client),
        )
        .route("/trainings", get(list_trainings).post(create_training))
        .route(
            "/trainings/:id",
            get(get_training).put(update_training).delete(delete_training),
        )
        .route("/assessments", get(list_assessments).post(create_assessment))
        .route(
            "/assessments/:id",
            get(get_assessment).delete(delete_assessment),
        )
        .route("/progress", get(list_progress).post(create_progress))
        .route("/progress/:id", delete(delete_progress))
        .route_layer(middleware::from_fn(professional_only_middleware))
        .route_layer(middleware::from_fn_with_state(
            auth_service,
            jwt_auth_middleware,
        ))
        .with_state(state)
}

async fn dashboard(
    State(state): State<TrainerAppState>,
    Extension(session): Extension<UserSession>,
) -> ApiResult<Json<TrainerDashboard>> {
    let trainer = state.trainer(&session).await?;
    Ok(Json(state.trainer_service.dashboard(&trainer).await?))
}

async fn get_profile(
    State(state): State<TrainerAppState>,
    Extension(session): Extension<UserSession>,
) -> ApiResult<Json<TrainerProfile>> {
    Ok(Json(state.trainer(&session).await?))
}

#[tracing::instrument(skip(state, session, request), fields(user_id = %session.user_id))]
async fn update_profile(
    State(state): State<TrainerAppState>,
    Extension(session): Extension<UserSession>,
    Json(request): Json<UpdateTrainerProfileRequest>,
) -> ApiResult<Json<TrainerProfile>> {
    let profile = state
        .trainer_service
        .update_profile(session.user_id, request)
        .await?;
    Ok(Json(profile))
}

// Client links

async fn list_clients(
    State(state): State<TrainerAppState>,
    Extension(session): Extension<UserSession>,
) -> ApiResult<Json<Vec<TrainerClientListing>>> {
    let trainer = state.trainer(&session).await?;
    Ok(Json(state.trainer_service.list_clients(trainer.id).await?))
}

async fn available_clients(
    State(state): State<TrainerAppState>,
    Extension(session): Extension<UserSession>,
) -> ApiResult<Json<Vec<AvailableClient>>> {
    let trainer = state.trainer(&session).await?;
    Ok(Json(state.trainer_service.available_clients(trainer.id).await?))
}

async fn link_client(
    State(state): State<TrainerAppState>,
    Extension(session): Extension<UserSession>,
    Json(request): Json<LinkClientRequest>,
) -> ApiResult<(StatusCode, Json<TrainerClient>)> {
    let trainer = state.trainer(&session).await?;
    let link = state.trainer_service.link_client(trainer.id, request).await?;
    Ok((StatusCode::CREATED, Json(link)))
}

#[tracing::instrument(skip(state, session))]
async fn client_details(
    State(state): State<TrainerAppState>,
    Extension(session): Extension<UserSession>,
    Path(link_id): Path<Uuid>,
) -> ApiResult<Json<TrainerClientDetails>> {
    let trainer = state.trainer(&session).await?;
    let details = state
        .trainer_service
        .client_details(trainer.id, link_id)
        .await?;
    Ok(Json(details))
}

#[tracing::instrument(skip(state, session, request))]
async fn update_client(
    State(state): State<TrainerAppState>,
    Extension(session): Extension<UserSession>,
    Path(link_id): Path<Uuid>,
    Json(request): Json<UpdateTrainerClientRequest>,
) -> ApiResult<Json<TrainerClient>> {
    let trainer = state.trainer(&session).await?;
    let link = state
        .trainer_service
        .update_link(trainer.id, link_id, request)
        .await?;
    Ok(Json(link))
}

#[tracing::instrument(skip(state, session))]
async fn unlink_client(
    State(state): State<TrainerAppState>,
    Extension(session): Extension<UserSession>,
    Path(link_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let trainer = state.trainer(&session).await?;
    state.trainer_service.unlink(trainer.id, link_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Training plans

async fn list_trainings(
    State(state): State<TrainerAppState>,
    Extension(session): Extension<UserSession>,
) -> ApiResult<Json<Vec<TrainingPlanListing>>> {
    let trainer = state.trainer(&session).await?;
    Ok(Json(state.training_plan_service.list(trainer.id).await?))
}

async fn create_training(
    State(state): State<TrainerAppState>,
    Extension(session): Extension<UserSession>,
    Json(request): Json<CreateTrainingPlanRequest>,
) -> ApiResult<(StatusCode, Json<TrainingPlan>)> {
    let trainer = state.trainer(&session).await?;
    let plan = state.training_plan_service.create(trainer.id, request).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

async fn get_training(
    State(state): State<TrainerAppState>,
    Extension(session): Extension<UserSession>,
    Path(plan_id): Path<Uuid>,
) -> ApiResult<Json<TrainingPlanListing>> {
    let trainer = state.trainer(&session).await?;
    Ok(Json(state.training_plan_service.get(trainer.id, plan_id).await?))
}

#[tracing::instrument(skip(state, session, request))]
async fn update_training(
    State(state): State<TrainerAppState>,
    Extension(session): Extension<UserSession>,
    Path(plan_id): Path<Uuid>,
    Json(request): Json<UpdateTrainingPlanRequest>,
) -> ApiResult<Json<TrainingPlan>> {
    let trainer = state.trainer(&session).await?;
    let plan = state
        .training_plan_service
        .update(trainer.id, plan_id, request)
        .await?;
    Ok(Json(plan))
}

#[tracing::instrument(skip(state, session))]
async fn delete_training(
    State(state): State<TrainerAppState>,
    Extension(session): Extension<UserSession>,
    Path(plan_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let trainer = state.trainer(&session).await?;
    state.training_plan_service.delete(trainer.id, plan_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Assessments

async fn list_assessments(
    State(state): State<TrainerAppState>,
    Extension(session): Extension<UserSession>,
) -> ApiResult<Json<Vec<AssessmentListing>>> {
    let trainer = state.trainer(&session).await?;
    Ok(Json(state.assessment_service.list(trainer.id).await?))
}

async fn create_assessment(
    State(state): State<TrainerAppState>,
    Extension(session): Extension<UserSession>,
    Json(request): Json<CreateAssessmentRequest>,
) -> ApiResult<(StatusCode, Json<Assessment>)> {
    let trainer = state.trainer(&session).await?;
    let assessment = state.assessment_service.create(trainer.id, request).await?;
    Ok((StatusCode::CREATED, Json(assessment)))
}

async fn get_assessment(
    State(state): State<TrainerAppState>,
    Extension(session): Extension<UserSession>,
    Path(assessment_id): Path<Uuid>,
) -> ApiResult<Json<AssessmentListing>> {
    let trainer = state.trainer(&session).await?;
    Ok(Json(
        state.assessment_service.get(trainer.id, assessment_id).await?,
    ))
}

#[tracing::instrument(skip(state, session))]
async fn delete_assessment(
    State(state): State<TrainerAppState>,
    Extension(session): Extension<UserSession>,
    Path(assessment_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let trainer = state.trainer(&session).await?;
    state
        .assessment_service
        .delete(trainer.id, assessment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// Progress

async fn list_progress(
    State(state): State<TrainerAppState>,
    Extension(session): Extension<UserSession>,
) -> ApiResult<Json<Vec<ProgressListing>>> {
    let trainer = state.trainer(&session).await?;
    Ok(Json(state.progress_service.list(trainer.id).await?))
}

async fn create_progress(
    State(state): State<TrainerAppState>,
    Extension(session): Extension<UserSession>,
    Json(request): Json<CreateProgressRequest>,
) -> ApiResult<(StatusCode, Json<ProgressEntry>)> {
    let trainer = state.trainer(&session).await?;
    let entry = state.progress_service.create(trainer.id, request).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[tracing::instrument(skip(state, session))]
async fn delete_progress(
    State(state): State<TrainerAppState>,
    Extension(session): Extension<UserSession>,
    Path(entry_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let trainer = state.trainer(&session).await?;
    state.progress_service.delete(trainer.id, entry_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
