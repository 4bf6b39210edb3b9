use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderName, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
};

use crate::auth::{extract_bearer_token, AuthError, AuthService, UserRole, UserSession};

/// JWT authentication middleware
pub async fn jwt_auth_middleware(
    State(auth_service): State<AuthService>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(AuthError::MissingAuthHeader)?;

    let token = extract_bearer_token(auth_header)?;
    let session = auth_service.validate_session(token).await?;

    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}

fn require_role(request: &Request, role: UserRole) -> Result<(), AuthError> {
    let session = extract_user_session(request)?;
    if session.role != role {
        tracing::warn!(
            user_id = %session.user_id,
            role = session.role.as_str(),
            required = role.as_str(),
            "role check failed"
        );
        return Err(AuthError::InsufficientPermissions);
    }
    Ok(())
}

/// Admin-only middleware
pub async fn admin_only_middleware(request: Request, next: Next) -> Result<Response, AuthError> {
    require_role(&request, UserRole::Admin)?;
    Ok(next.run(request).await)
}

/// Trainer area middleware
pub async fn professional_only_middleware(
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    require_role(&request, UserRole::Professional)?;
    Ok(next.run(request).await)
}

pub async fn client_only_middleware(request: Request, next: Next) -> Result<Response, AuthError> {
    require_role(&request, UserRole::Client)?;
    Ok(next.run(request).await)
}

/// Extract user session from request
pub fn extract_user_session(request: &Request) -> Result<&UserSession, AuthError> {
    request
        .extensions()
        .get::<UserSession>()
        .ok_or(AuthError::MissingAuthHeader)
}

pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}

pub fn security_headers_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        HeaderName::from_static("x-content-type-options"),
        HeaderValue::from_static("nosniff"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, middleware::from_fn, routing::get, Router};
    use tower::ServiceExt;
    use uuid::Uuid;

    fn handler() -> Router {
        Router::new().route("/", get(|| async { "ok" }))
    }

    fn request_as(role: Option<UserRole>) -> Request {
        let mut request = axum::http::Request::builder().uri("/").body(Body::empty()).unwrap();
        if let Some(role) = role {
            request.extensions_mut().insert(UserSession {
                user_id: Uuid::new_v4(),
                email: "ana@example.com".to_string(),
                role,
                jti: Uuid::new_v4().to_string(),
            });
        }
        request
    }

    async fn status(router: Router, role: Option<UserRole>) -> StatusCode {
        router.oneshot(request_as(role)).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_admin_only_rejects_other_roles() {
        let router = handler().route_layer(from_fn(admin_only_middleware));
        assert_eq!(status(router.clone(), Some(UserRole::Admin)).await, StatusCode::OK);
        assert_eq!(
            status(router.clone(), Some(UserRole::Professional)).await,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status(router, Some(UserRole::Client)).await,
            StatusCode::FORBIDDEN
        );
    }

    #[tokio::test]
    async fn test_professional_only_rejects_other_roles() {
        let router = handler().route_layer(from_fn(professional_only_middleware));
        assert_eq!(
            status(router.clone(), Some(UserRole::Professional)).await,
            StatusCode::OK
        );
        assert_eq!(
            status(router.clone(), Some(UserRole::Admin)).await,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status(router, Some(UserRole::Client)).await,
            StatusCode::FORBIDDEN
        );
    }

    #[tokio::test]
    async fn test_client_only_rejects_other_roles() {
        let router = handler().route_layer(from_fn(client_only_middleware));
        assert_eq!(status(router.clone(), Some(UserRole::Client)).await, StatusCode::OK);
        assert_eq!(
            status(router.clone(), Some(UserRole::Admin)).await,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status(router, Some(UserRole::Professional)).await,
            StatusCode::FORBIDDEN
        );
    }

    #[tokio::test]
    async fn test_guard_without_session_is_unauthorized() {
        let router = handler().route_layer(from_fn(admin_only_middleware));
        assert_eq!(status(router, None).await, StatusCode::UNAUTHORIZED);
    }
}
