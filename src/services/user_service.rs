use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::password::hash_password;
use crate::auth::{is_unique_violation, UserRole};
use crate::error::{ApiError, ApiResult};
use crate::models::{CreateUser, UpdateUser, User, UserListQuery, UserResponse};
use crate::validation::{normalize_email, validate_form};

const USER_COLUMNS: &str = "id, name, email, password_hash, role, photo, created_at, updated_at";

/// Account administration.
#[derive(Debug, Clone)]
pub struct UserService {
    db: PgPool,
}

impl UserService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    #[tracing::instrument(skip(self, user_data), fields(role = user_data.role.as_str()))]
    pub async fn create_user(&self, user_data: CreateUser) -> ApiResult<UserResponse> {
        validate_form(&user_data)?;
        let email = normalize_email(&user_data.email);
        if self.get_user_by_email(&email).await?.is_some() {
            return Err(email_taken());
        }

        let password_hash = hash_password(&user_data.password)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;

        let mut tx = self.db.begin().await?;
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, name, email, password_hash, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(user_data.name.trim())
        .bind(&email)
        .bind(&password_hash)
        .bind(user_data.role.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_unique_email)?;

        if user_data.role == UserRole::Client {
            sqlx::query("INSERT INTO clients (user_id) VALUES ($1)")
                .bind(user.id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        tracing::info!(user_id = %user.id, "user created");
        Ok(user.into())
    }

    pub async fn get_user_by_id(&self, user_id: Uuid) -> ApiResult<Option<UserResponse>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(user.map(UserResponse::from))
    }

    pub async fn get_user_by_email(&self, email: &str) -> ApiResult<Option<UserResponse>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(normalize_email(email))
        .fetch_optional(&self.db)
        .await?;

        Ok(user.map(UserResponse::from))
    }

    /// Update name, email and role. The password changes only when a
    /// non-blank one is supplied.
    #[tracing::instrument(skip(self, user_data))]
    pub async fn update_user(&self, user_id: Uuid, user_data: UpdateUser) -> ApiResult<UserResponse> {
        let mut fields = validate_form(&user_data).err().unwrap_or_default();
        let new_password = user_data
            .password
            .as_deref()
            .filter(|p| !p.trim().is_empty());
        if let Some(password) = new_password {
            let len = password.chars().count();
            if !(6..=50).contains(&len) {
                fields.insert(
                    "password".to_string(),
                    "Password must have between 6 and 50 characters.".to_string(),
                );
            }
        }
        if !fields.is_empty() {
            return Err(ApiError::Validation(fields));
        }

        let email = normalize_email(&user_data.email);
        let taken: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM users WHERE email = $1 AND id <> $2")
                .bind(&email)
                .bind(user_id)
                .fetch_optional(&self.db)
                .await?;
        if taken.is_some() {
            return Err(email_taken());
        }

        let password_hash = new_password
            .map(hash_password)
            .transpose()
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;

        let mut tx = self.db.begin().await?;
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET name = $2,
                 email = $3,
                 role = $4,
                 password_hash = COALESCE($5, password_hash),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(user_data.name.trim())
        .bind(&email)
        .bind(user_data.role.as_str())
        .bind(password_hash)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_unique_email)?
        .ok_or(ApiError::NotFound("User"))?;

        if user_data.role == UserRole::Client {
            sqlx::query("INSERT INTO clients (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
                .bind(user.id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        Ok(user.into())
    }

    /// Delete an account on behalf of `actor_id`, who may not delete themselves.
    #[tracing::instrument(skip(self))]
    pub async fn delete_user(&self, actor_id: Uuid, user_id: Uuid) -> ApiResult<()> {
        if actor_id == user_id {
            return Err(ApiError::Forbidden(
                "You cannot delete your own account".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("User"));
        }

        tracing::info!(user_id = %user_id, "user deleted");
        Ok(())
    }

    pub async fn list_users(&self, query: &UserListQuery) -> ApiResult<Vec<UserResponse>> {
        let limit = query.limit.unwrap_or(50).clamp(1, 200);
        let offset = query.offset.unwrap_or(0).max(0);

        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE ($1::TEXT IS NULL OR role = $1)
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(query.role.map(|r| r.as_str()))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;

        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn count_by_role(&self, role: Option<UserRole>) -> ApiResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE ($1::TEXT IS NULL OR role = $1)")
                .bind(role.map(|r| r.as_str()))
                .fetch_one(&self.db)
                .await?;

        Ok(count)
    }
}

fn email_taken() -> ApiError {
    ApiError::field("email", "This email is already registered.")
}

fn map_unique_email(err: sqlx::Error) -> ApiError {
    if is_unique_violation(&err) {
        email_taken()
    } else {
        ApiError::Database(err)
    }
}
