use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};

use crate::auth::MessageResponse;
use crate::error::ApiResult;
use crate::models::SupportRequest;
use crate::services::EmailService;
use crate::validation::{normalize_email, validate_form};

pub fn support_routes(email_service: EmailService) -> Router {
    Router::new()
        .route("/", post(contact_support))
        .with_state(email_service)
}

#[tracing::instrument(skip(email_service, request), fields(subject = %request.subject))]
async fn contact_support(
    State(email_service): State<EmailService>,
    Json(mut request): Json<SupportRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    validate_form(&request)?;
    request.email = normalize_email(&request.email);
    email_service.send_support_message(&request).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse::new(
            "Message sent! We will answer within 24 hours.",
        )),
    ))
}
