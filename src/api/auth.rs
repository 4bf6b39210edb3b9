use axum::{
    extract::{multipart::Field, DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::auth::{
    jwt_auth_middleware, AuthError, AuthResponse, AuthService, ChangePasswordRequest,
    ForgotPasswordRequest, LoginRequest, MessageResponse, ProfessionalRegistrationResponse,
    RefreshTokenRequest, RegisterClientRequest, RegisterProfessionalRequest, TokenResponse,
    UserRole, UserSession,
};
use crate::error::{ApiError, ApiResult};
use crate::models::UserResponse;
use crate::services::{EmailService, ImageUpload, UploadError, UploadService};
use crate::validation::validate_form;

/// Multipart overhead allowed on top of the photo size limit, so an
/// oversized photo is reported as a field error instead of a 413.
const MULTIPART_SLACK_BYTES: usize = 1024 * 1024;

pub const RECOVERY_MESSAGE: &str =
    "If an account with that email exists, a temporary password has been sent.";

#[derive(Clone)]
pub struct AuthAppState {
    pub auth_service: AuthService,
    pub upload_service: UploadService,
    pub email_service: EmailService,
}

/// Authentication routes
pub fn auth_routes(state: AuthAppState) -> Router {
    let body_limit = state.upload_service.max_bytes() + MULTIPART_SLACK_BYTES;

    Router::new()
        .route("/register/client", post(register_client))
        .route(
            "/register/professional",
            post(register_professional).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/login/:role", post(login))
        .route("/refresh", post(refresh_token))
        .route("/forgot-password", post(forgot_password))
        .route(
            "/logout",
            post(logout).route_layer(middleware::from_fn_with_state(
                state.auth_service.clone(),
                jwt_auth_middleware,
            )),
        )
        .route(
            "/profile",
            get(get_profile).route_layer(middleware::from_fn_with_state(
                state.auth_service.clone(),
                jwt_auth_middleware,
            )),
        )
        .route(
            "/change-password",
            post(change_password).route_layer(middleware::from_fn_with_state(
                state.auth_service.clone(),
                jwt_auth_middleware,
            )),
        )
        .with_state(state)
}

#[tracing::instrument(skip(state, request))]
async fn register_client(
    State(state): State<AuthAppState>,
    Json(request): Json<RegisterClientRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AuthError> {
    let response = state.auth_service.register_client(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Multipart form: the text fields of `RegisterProfessionalRequest` plus a
/// `registry_photo` file.
#[tracing::instrument(skip(state, multipart))]
async fn register_professional(
    State(state): State<AuthAppState>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<ProfessionalRegistrationResponse>)> {
    let mut form = RegisterProfessionalRequest::default();
    let mut photo: Option<ImageUpload> = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or("").to_string();

        if name == "registry_photo" {
            photo = Some(read_upload(field).await?);
            continue;
        }

        let value = field.text().await.map_err(bad_multipart)?;
        match name.as_str() {
            "name" => form.name = value,
            "email" => form.email = value,
            "password" => form.password = value,
            "password_confirmation" => form.password_confirmation = value,
            "specialty" => form.specialty = value,
            "professional_registry" => form.professional_registry = Some(value),
            "tax_id" => form.tax_id = value,
            other => tracing::debug!(field = other, "ignoring unknown form field"),
        }
    }

    let mut fields = form.field_errors();
    if let Err(err) = state.upload_service.check(photo.as_ref()) {
        fields.extend(err.into_field_errors("registry_photo"));
    }
    if !fields.is_empty() {
        return Err(ApiError::Validation(fields));
    }

    let professional = form.into_new_professional()?;
    state
        .auth_service
        .ensure_email_available(&professional.email)
        .await?;

    let photo = photo.ok_or(UploadError::Missing)?;
    let photo_path = state.upload_service.save_registry_photo(&photo).await?;

    match state
        .auth_service
        .register_professional(professional, &photo_path)
        .await
    {
        Ok(response) => Ok((StatusCode::CREATED, Json(response))),
        Err(err) => {
            state.upload_service.remove(&photo_path).await;
            Err(err.into())
        }
    }
}

async fn read_upload(field: Field<'_>) -> ApiResult<ImageUpload> {
    let file_name = field.file_name().map(str::to_string);
    let content_type = field.content_type().map(str::to_string);
    let bytes = field.bytes().await.map_err(bad_multipart)?;

    Ok(ImageUpload {
        file_name,
        content_type,
        bytes,
    })
}

fn bad_multipart(err: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::BadRequest(err.body_text())
}

/// Login through the endpoint of one role
#[tracing::instrument(skip(state, request))]
async fn login(
    State(state): State<AuthAppState>,
    Path(role): Path<UserRole>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    let response = state.auth_service.login(role, request).await?;
    Ok(Json(response))
}

/// Refresh access token
#[tracing::instrument(skip(state, request))]
async fn refresh_token(
    State(state): State<AuthAppState>,
    Json(request): Json<RefreshTokenRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    let response = state.auth_service.refresh_token(request).await?;
    Ok(Json(response))
}

#[tracing::instrument(skip(state, bearer))]
async fn logout(
    State(state): State<AuthAppState>,
    TypedHeader(bearer): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<MessageResponse>, AuthError> {
    let response = state.auth_service.logout(bearer.token()).await?;
    Ok(Json(response))
}

/// The answer never reveals whether the email belongs to an account.
#[tracing::instrument(skip(state, request))]
async fn forgot_password(
    State(state): State<AuthAppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    validate_form(&request)?;

    if let Some(temporary) = state
        .auth_service
        .prepare_password_reset(&request.email)
        .await?
    {
        let delivered = state
            .email_service
            .send_temporary_password(&temporary.name, &temporary.email, &temporary.password)
            .await;

        match delivered {
            Ok(()) => state.auth_service.apply_temporary_password(&temporary).await?,
            Err(err) => {
                tracing::error!(error = %err, "temporary password not delivered, password left unchanged")
            }
        }
    }

    Ok(Json(MessageResponse::new(RECOVERY_MESSAGE)))
}

#[tracing::instrument(skip(state, session), fields(user_id = %session.user_id))]
async fn get_profile(
    State(state): State<AuthAppState>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<UserResponse>, AuthError> {
    let profile = state.auth_service.profile(session.user_id).await?;
    Ok(Json(profile))
}

#[tracing::instrument(skip(state, session, request), fields(user_id = %session.user_id))]
async fn change_password(
    State(state): State<AuthAppState>,
    Extension(session): Extension<UserSession>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AuthError> {
    let response = state
        .auth_service
        .change_password(session.user_id, request)
        .await?;
    Ok(Json(response))
}
