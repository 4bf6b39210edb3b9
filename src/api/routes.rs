use axum::{routing::get, Router};
use chrono::Duration;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use super::admin::{admin_routes, AdminAppState};
use super::auth::{auth_routes, AuthAppState};
use super::health::health_check;
use super::plans::plan_routes;
use super::subscriptions::{subscription_routes, SubscriptionsAppState};
use super::support::support_routes;
use super::trainer::{trainer_routes, TrainerAppState};
use crate::auth::{cors_layer, security_headers_layer, AuthService, JwtService};
use crate::config::AppConfig;
use crate::services::{
    upload_service::UPLOADS_ROUTE, AdminService, AssessmentService, EmailService, PlanService,
    ProfessionalService, ProgressService, SubscriptionService, TrainerService,
    TrainingPlanService, UploadService, UserService,
};

pub fn create_routes(db: PgPool, config: &AppConfig, email_service: EmailService) -> Router {
    let jwt_service = JwtService::with_lifetimes(
        &config.jwt_secret,
        Duration::minutes(config.access_token_minutes),
        Duration::days(config.refresh_token_days),
    );
    let auth_service = AuthService::new(db.clone(), jwt_service);
    let upload_service = UploadService::new(config.upload_dir.clone(), config.max_upload_bytes);
    let plan_service = PlanService::new(db.clone());

    let auth_state = AuthAppState {
        auth_service: auth_service.clone(),
        upload_service,
        email_service: email_service.clone(),
    };

    let subscriptions_state = SubscriptionsAppState {
        plan_service: plan_service.clone(),
        subscription_service: SubscriptionService::new(db.clone()),
    };

    let admin_state = AdminAppState {
        admin_service: AdminService::new(db.clone()),
        user_service: UserService::new(db.clone()),
        professional_service: ProfessionalService::new(db.clone()),
        plan_service: plan_service.clone(),
        email_service: email_service.clone(),
    };

    let trainer_state = TrainerAppState {
        trainer_service: TrainerService::new(db.clone()),
        training_plan_service: TrainingPlanService::new(db.clone()),
        assessment_service: AssessmentService::new(db.clone()),
        progress_service: ProgressService::new(db),
    };

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes(auth_state))
        .nest("/api/plans", plan_routes(plan_service))
        .nest(
            "/api/subscriptions",
            subscription_routes(subscriptions_state, auth_service.clone()),
        )
        .nest("/api/admin", admin_routes(admin_state, auth_service.clone()))
        .nest("/api/trainer", trainer_routes(trainer_state, auth_service))
        .nest("/api/support", support_routes(email_service))
        .nest_service(UPLOADS_ROUTE, ServeDir::new(&config.upload_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer())
                .layer(security_headers_layer()),
        )
}
