use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::password::{generate_temporary_password, hash_password, verify_password};
use crate::auth::{
    AuthError, AuthResponse, ChangePasswordRequest, JwtService, LoginRequest, MessageResponse,
    ProfessionalRegistrationResponse, RefreshTokenRequest, RegisterClientRequest,
    TemporaryPassword, TokenKind, TokenResponse, UserInfo, UserRole, UserSession,
};
use crate::models::{NewProfessional, ProfessionalStatus, User, UserResponse};
use crate::validation::{normalize_email, validate_form};

const USER_COLUMNS: &str = "id, name, email, password_hash, role, photo, created_at, updated_at";

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

#[derive(Debug, Clone)]
pub struct AuthService {
    jwt_service: JwtService,
    db: PgPool,
}

impl AuthService {
    pub fn new(db: PgPool, jwt_service: JwtService) -> Self {
        Self { jwt_service, db }
    }

    /// Reject an email already used by any account.
    pub async fn ensure_email_available(&self, email: &str) -> Result<(), AuthError> {
        if self.find_user_by_email(email).await?.is_some() {
            return Err(AuthError::email_taken());
        }
        Ok(())
    }

    #[tracing::instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register_client(
        &self,
        request: RegisterClientRequest,
    ) -> Result<AuthResponse, AuthError> {
        let request = request.normalized().map_err(AuthError::Validation)?;
        self.ensure_email_available(&request.email).await?;

        let password_hash = hash_password(&request.password)?;
        let mut tx = self.db.begin().await?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, name, email, password_hash, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&request.name)
        .bind(&request.email)
        .bind(&password_hash)
        .bind(UserRole::Client.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                AuthError::email_taken()
            } else {
                AuthError::Database(err)
            }
        })?;

        sqlx::query("INSERT INTO clients (user_id) VALUES ($1)")
            .bind(user.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(user_id = %user.id, "client registered");

        self.issue_tokens(user, None).await
    }

    /// Persist a professional awaiting approval. The registry photo is
    /// already stored at `registry_photo`.
    #[tracing::instrument(skip(self, professional, registry_photo), fields(email = %professional.email))]
    pub async fn register_professional(
        &self,
        professional: NewProfessional,
        registry_photo: &str,
    ) -> Result<ProfessionalRegistrationResponse, AuthError> {
        let password_hash = hash_password(&professional.password)?;
        let mut tx = self.db.begin().await?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, name, email, password_hash, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&professional.name)
        .bind(&professional.email)
        .bind(&password_hash)
        .bind(UserRole::Professional.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                AuthError::email_taken()
            } else {
                AuthError::Database(err)
            }
        })?;

        sqlx::query(
            "INSERT INTO professionals
                 (user_id, specialty, professional_registry, tax_id, registry_photo, status)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user.id)
        .bind(professional.specialty.label())
        .bind(&professional.professional_registry)
        .bind(&professional.tax_id)
        .bind(registry_photo)
        .bind(ProfessionalStatus::Pending.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!(user_id = %user.id, "professional registered, awaiting approval");

        Ok(ProfessionalRegistrationResponse {
            message: "Registration received. Your account is awaiting administrator approval."
                .to_string(),
            user: user_info(user, Some(ProfessionalStatus::Pending.as_str().to_string())),
        })
    }

    /// Login through the endpoint of `role`. Accounts of another role are
    /// treated exactly like a wrong password.
    #[tracing::instrument(skip(self, request), fields(role = role.as_str()))]
    pub async fn login(
        &self,
        role: UserRole,
        request: LoginRequest,
    ) -> Result<AuthResponse, AuthError> {
        validate_form(&request).map_err(AuthError::Validation)?;
        let email = normalize_email(&request.email);

        let user = self
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&request.password, &user.password_hash)? || user.role() != role {
            tracing::warn!("failed login attempt");
            return Err(AuthError::InvalidCredentials);
        }

        let professional_status = match role {
            UserRole::Professional => self.professional_status(user.id).await?,
            _ => None,
        };

        self.issue_tokens(user, professional_status).await
    }

    pub async fn refresh_token(
        &self,
        request: RefreshTokenRequest,
    ) -> Result<TokenResponse, AuthError> {
        let claims = self
            .jwt_service
            .validate_kind(&request.refresh_token, TokenKind::Refresh)?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;
        if !self
            .is_refresh_token_valid(user_id, &request.refresh_token)
            .await?
        {
            return Err(AuthError::InvalidToken);
        }

        let access_token = self
            .jwt_service
            .create_access_token(user_id, &claims.email, claims.role)?;

        Ok(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_service.access_token_expires_in_seconds(),
        })
    }

    /// Blacklist the access token and revoke every refresh token of its owner.
    pub async fn logout(&self, token: &str) -> Result<MessageResponse, AuthError> {
        let claims = self.jwt_service.validate_token(token)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

        self.blacklist_token(&claims.jti, claims.exp as i64).await?;
        self.revoke_user_refresh_tokens(user_id).await?;

        Ok(MessageResponse::new("Successfully logged out"))
    }

    pub async fn is_token_blacklisted(&self, jti: &str) -> Result<bool, AuthError> {
        let result =
            sqlx::query("SELECT 1 FROM token_blacklist WHERE jti = $1 AND expires_at > NOW()")
                .bind(jti)
                .fetch_optional(&self.db)
                .await?;

        Ok(result.is_some())
    }

    pub async fn validate_session(&self, token: &str) -> Result<UserSession, AuthError> {
        let session = self.jwt_service.extract_user_session(token)?;

        if self.is_token_blacklisted(&session.jti).await? {
            return Err(AuthError::InvalidToken);
        }

        Ok(session)
    }

    /// Draw a temporary password for the account behind `email`. Nothing is
    /// stored until `apply_temporary_password`, so a failed delivery leaves
    /// the old password working. Unknown emails yield `None`.
    pub async fn prepare_password_reset(
        &self,
        email: &str,
    ) -> Result<Option<TemporaryPassword>, AuthError> {
        let email = normalize_email(email);
        let Some(user) = self.find_user_by_email(&email).await? else {
            tracing::info!("password recovery requested for unknown email");
            return Ok(None);
        };

        Ok(Some(TemporaryPassword {
            user_id: user.id,
            name: user.name,
            email: user.email,
            password: generate_temporary_password(),
        }))
    }

    pub async fn apply_temporary_password(
        &self,
        temporary: &TemporaryPassword,
    ) -> Result<(), AuthError> {
        let password_hash = hash_password(&temporary.password)?;

        sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
            .bind(&password_hash)
            .bind(temporary.user_id)
            .execute(&self.db)
            .await?;
        self.revoke_user_refresh_tokens(temporary.user_id).await?;

        tracing::info!(user_id = %temporary.user_id, "temporary password issued");
        Ok(())
    }

    pub async fn change_password(
        &self,
        user_id: Uuid,
        request: ChangePasswordRequest,
    ) -> Result<MessageResponse, AuthError> {
        validate_form(&request).map_err(AuthError::Validation)?;

        let user = self.find_user_by_id(user_id).await?.ok_or(AuthError::UserNotFound)?;
        if !verify_password(&request.current_password, &user.password_hash)? {
            return Err(AuthError::field(
                "current_password",
                "Current password is incorrect.",
            ));
        }

        let password_hash = hash_password(&request.new_password)?;
        sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
            .bind(&password_hash)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        Ok(MessageResponse::new("Password changed successfully"))
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<UserResponse, AuthError> {
        let user = self.find_user_by_id(user_id).await?.ok_or(AuthError::UserNotFound)?;
        Ok(user.into())
    }

    // Private helper methods

    async fn issue_tokens(
        &self,
        user: User,
        professional_status: Option<String>,
    ) -> Result<AuthResponse, AuthError> {
        let (access_token, refresh_token) =
            self.jwt_service
                .create_token_pair(user.id, &user.email, user.role())?;

        self.store_refresh_token(user.id, &refresh_token).await?;

        Ok(AuthResponse {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_service.access_token_expires_in_seconds(),
            user: user_info(user, professional_status),
        })
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    async fn find_user_by_id(&self, user_id: Uuid) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    async fn professional_status(&self, user_id: Uuid) -> Result<Option<String>, AuthError> {
        let status: Option<String> =
            sqlx::query_scalar("SELECT status FROM professionals WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.db)
                .await?;

        Ok(status)
    }

    async fn store_refresh_token(&self, user_id: Uuid, refresh_token: &str) -> Result<(), AuthError> {
        let claims = self.jwt_service.validate_token(refresh_token)?;
        let expires_at = chrono::DateTime::from_timestamp(claims.exp as i64, 0)
            .ok_or(AuthError::InvalidToken)?;

        sqlx::query(
            "INSERT INTO refresh_tokens (id, user_id, token_hash, expires_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(format!("{:x}", md5::compute(refresh_token)))
        .bind(expires_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn is_refresh_token_valid(
        &self,
        user_id: Uuid,
        refresh_token: &str,
    ) -> Result<bool, AuthError> {
        let token_hash = format!("{:x}", md5::compute(refresh_token));

        let result = sqlx::query(
            "SELECT 1 FROM refresh_tokens
             WHERE user_id = $1 AND token_hash = $2 AND expires_at > NOW() AND NOT revoked",
        )
        .bind(user_id)
        .bind(token_hash)
        .fetch_optional(&self.db)
        .await?;

        Ok(result.is_some())
    }

    async fn revoke_user_refresh_tokens(&self, user_id: Uuid) -> Result<(), AuthError> {
        sqlx::query("UPDATE refresh_tokens SET revoked = true WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    async fn blacklist_token(&self, jti: &str, exp: i64) -> Result<(), AuthError> {
        let expires_at =
            chrono::DateTime::from_timestamp(exp, 0).ok_or(AuthError::InvalidToken)?;

        sqlx::query(
            "INSERT INTO token_blacklist (jti, expires_at) VALUES ($1, $2)
             ON CONFLICT (jti) DO NOTHING",
        )
        .bind(jti)
        .bind(expires_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }
}

fn user_info(user: User, professional_status: Option<String>) -> UserInfo {
    let role = user.role();
    UserInfo {
        id: user.id,
        name: user.name,
        email: user.email,
        role,
        professional_status,
        created_at: user.created_at,
    }
}
