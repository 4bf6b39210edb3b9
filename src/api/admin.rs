use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::{admin_only_middleware, jwt_auth_middleware, AuthService, UserSession};
use crate::error::{ApiError, ApiResult};
use crate::models::{
    CreatePlanRequest, CreateUser, DashboardStats, Plan, ProfessionalListing, UpdatePlanRequest,
    UpdateUser, UserListQuery, UserResponse,
};
use crate::services::{AdminService, EmailService, PlanService, ProfessionalService, UserService};

#[derive(Clone)]
pub struct AdminAppState {
    pub admin_service: AdminService,
    pub user_service: UserService,
    pub professional_service: ProfessionalService,
    pub plan_service: PlanService,
    pub email_service: EmailService,
}

#[derive(Debug, Serialize)]
pub struct EmailTestResponse {
    pub configured: bool,
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Admin endpoints
pub fn admin_routes(state: AdminAppState, auth_service: AuthService) -> Router {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", get(get_user).put(update_user).delete(delete_user))
        .route("/professionals", get(list_professionals))
        .route("/professionals/pending", get(list_pending_professionals))
        .route("/professionals/:id", get(get_professional))
        .route("/professionals/:id/approve", post(approve_professional))
        .route("/professionals/:id/reject", post(reject_professional))
        .route("/professionals/:id/deactivate", post(deactivate_professional))
        .route("/plans", get(list_plans).post(create_plan))
        .route("/plans/:id", put(update_plan).delete(delete_plan))
        .route("/email/test", get(test_email))
        .route_layer(middleware::from_fn(admin_only_middleware))
        .route_layer(middleware::from_fn_with_state(
            auth_service,
            jwt_auth_middleware,
        ))
        .with_state(state)
}

async fn dashboard(State(state): State<AdminAppState>) -> ApiResult<Json<DashboardStats>> {
    Ok(Json(state.admin_service.dashboard().await?))
}

// Users

#[tracing::instrument(skip(state))]
async fn list_users(
    State(state): State<AdminAppState>,
    Query(query): Query<UserListQuery>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    Ok(Json(state.user_service.list_users(&query).await?))
}

#[tracing::instrument(skip(state, request))]
async fn create_user(
    State(state): State<AdminAppState>,
    Json(request): Json<CreateUser>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = state.user_service.create_user(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(
    State(state): State<AdminAppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    state
        .user_service
        .get_user_by_id(user_id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("User"))
}

#[tracing::instrument(skip(state, request))]
async fn update_user(
    State(state): State<AdminAppState>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpdateUser>,
) -> ApiResult<Json<UserResponse>> {
    Ok(Json(state.user_service.update_user(user_id, request).await?))
}

#[tracing::instrument(skip(state, session), fields(admin_id = %session.user_id))]
async fn delete_user(
    State(state): State<AdminAppState>,
    Extension(session): Extension<UserSession>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.user_service.delete_user(session.user_id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Professional review

async fn list_professionals(
    State(state): State<AdminAppState>,
) -> ApiResult<Json<Vec<ProfessionalListing>>> {
    Ok(Json(state.professional_service.list_all().await?))
}

async fn list_pending_professionals(
    State(state): State<AdminAppState>,
) -> ApiResult<Json<Vec<ProfessionalListing>>> {
    Ok(Json(state.professional_service.list_pending().await?))
}

async fn get_professional(
    State(state): State<AdminAppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<ProfessionalListing>> {
    Ok(Json(state.professional_service.get(user_id).await?))
}

#[tracing::instrument(skip(state, session), fields(admin_id = %session.user_id))]
async fn approve_professional(
    State(state): State<AdminAppState>,
    Extension(session): Extension<UserSession>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<ProfessionalListing>> {
    let professional = state
        .professional_service
        .approve(user_id, session.user_id)
        .await?;
    Ok(Json(professional))
}

#[tracing::instrument(skip(state, session), fields(admin_id = %session.user_id))]
async fn reject_professional(
    State(state): State<AdminAppState>,
    Extension(session): Extension<UserSession>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<ProfessionalListing>> {
    let professional = state
        .professional_service
        .reject(user_id, session.user_id)
        .await?;
    Ok(Json(professional))
}

#[tracing::instrument(skip(state, session), fields(admin_id = %session.user_id))]
async fn deactivate_professional(
    State(state): State<AdminAppState>,
    Extension(session): Extension<UserSession>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<ProfessionalListing>> {
    let professional = state
        .professional_service
        .deactivate(user_id, session.user_id)
        .await?;
    Ok(Json(professional))
}

// Plans

async fn list_plans(State(state): State<AdminAppState>) -> ApiResult<Json<Vec<Plan>>> {
    Ok(Json(state.plan_service.list_all().await?))
}

#[tracing::instrument(skip(state, request), fields(name = %request.name))]
async fn create_plan(
    State(state): State<AdminAppState>,
    Json(request): Json<CreatePlanRequest>,
) -> ApiResult<(StatusCode, Json<Plan>)> {
    let plan = state.plan_service.create(request).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

#[tracing::instrument(skip(state, request))]
async fn update_plan(
    State(state): State<AdminAppState>,
    Path(plan_id): Path<Uuid>,
    Json(request): Json<UpdatePlanRequest>,
) -> ApiResult<Json<Plan>> {
    Ok(Json(state.plan_service.update(plan_id, request).await?))
}

#[tracing::instrument(skip(state))]
async fn delete_plan(
    State(state): State<AdminAppState>,
    Path(plan_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.plan_service.delete(plan_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Reports SMTP failures in the body instead of failing the request.
async fn test_email(State(state): State<AdminAppState>) -> Json<EmailTestResponse> {
    let configured = state.email_service.is_configured();

    let response = match state.email_service.test_connection().await {
        Ok(connected) => EmailTestResponse {
            configured,
            connected,
            error: None,
        },
        Err(err) => {
            tracing::warn!(error = %err, "smtp connection test failed");
            EmailTestResponse {
                configured,
                connected: false,
                error: Some(err.to_string()),
            }
        }
    };

    Json(response)
}
