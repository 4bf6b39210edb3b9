use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};

use crate::auth::{client_only_middleware, jwt_auth_middleware, AuthService, UserSession};
use crate::error::ApiResult;
use crate::models::{SubscribeRequest, Subscription, SubscriptionDetails};
use crate::services::{PlanService, SubscriptionService};

#[derive(Clone)]
pub struct SubscriptionsAppState {
    pub plan_service: PlanService,
    pub subscription_service: SubscriptionService,
}

/// Subscription routes, clients only
pub fn subscription_routes(state: SubscriptionsAppState, auth_service: AuthService) -> Router {
    Router::new()
        .route("/", get(list_subscriptions).post(subscribe))
        .route("/cancel", post(cancel_subscription))
        .route_layer(middleware::from_fn(client_only_middleware))
        .route_layer(middleware::from_fn_with_state(
            auth_service,
            jwt_auth_middleware,
        ))
        .with_state(state)
}

#[tracing::instrument(skip(state, session), fields(client_id = %session.user_id))]
async fn subscribe(
    State(state): State<SubscriptionsAppState>,
    Extension(session): Extension<UserSession>,
    Json(request): Json<SubscribeRequest>,
) -> ApiResult<(StatusCode, Json<Subscription>)> {
    let plan = state.plan_service.get_active(request.plan_id).await?;
    let subscription = state
        .subscription_service
        .subscribe(session.user_id, &plan)
        .await?;

    Ok((StatusCode::CREATED, Json(subscription)))
}

async fn list_subscriptions(
    State(state): State<SubscriptionsAppState>,
    Extension(session): Extension<UserSession>,
) -> ApiResult<Json<Vec<SubscriptionDetails>>> {
    let subscriptions = state
        .subscription_service
        .list_for_client(session.user_id)
        .await?;
    Ok(Json(subscriptions))
}

#[tracing::instrument(skip(state, session), fields(client_id = %session.user_id))]
async fn cancel_subscription(
    State(state): State<SubscriptionsAppState>,
    Extension(session): Extension<UserSession>,
) -> ApiResult<Json<Subscription>> {
    let subscription = state
        .subscription_service
        .cancel_active(session.user_id)
        .await?;
    Ok(Json(subscription))
}
