use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{subscription_end, Plan, Subscription, SubscriptionDetails, SubscriptionStatus};

const DETAILS_SELECT: &str = "
    SELECT s.id, s.client_id, s.plan_id, s.starts_at, s.ends_at, s.status,
           p.name AS plan_name, p.price AS plan_price
    FROM subscriptions s
    JOIN plans p ON p.id = s.plan_id";

/// Client plan subscriptions.
#[derive(Debug, Clone)]
pub struct SubscriptionService {
    db: PgPool,
}

impl SubscriptionService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Start `plan` for the client now, cancelling whatever was active before.
    #[tracing::instrument(skip(self, plan), fields(plan_id = %plan.id))]
    pub async fn subscribe(&self, client_id: Uuid, plan: &Plan) -> ApiResult<Subscription> {
        let starts_at = Utc::now();
        let ends_at = subscription_end(starts_at, plan.duration_days);

        let mut tx = self.db.begin().await?;

        // Row lock serializes concurrent subscribes for the same client.
        let is_client: Option<Uuid> =
            sqlx::query_scalar("SELECT user_id FROM clients WHERE user_id = $1 FOR UPDATE")
                .bind(client_id)
                .fetch_optional(&mut *tx)
                .await?;
        if is_client.is_none() {
            return Err(ApiError::NotFound("Client"));
        }

        expire_lapsed(&mut *tx, client_id).await?;

        sqlx::query("UPDATE subscriptions SET status = $2 WHERE client_id = $1 AND status = $3")
            .bind(client_id)
            .bind(SubscriptionStatus::Cancelled.as_str())
            .bind(SubscriptionStatus::Active.as_str())
            .execute(&mut *tx)
            .await?;

        let subscription = sqlx::query_as::<_, Subscription>(
            "INSERT INTO subscriptions (id, client_id, plan_id, starts_at, ends_at, status)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id, client_id, plan_id, starts_at, ends_at, status",
        )
        .bind(Uuid::new_v4())
        .bind(client_id)
        .bind(plan.id)
        .bind(starts_at)
        .bind(ends_at)
        .bind(SubscriptionStatus::Active.as_str())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE clients SET plan_id = $2 WHERE user_id = $1")
            .bind(client_id)
            .bind(plan.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(subscription_id = %subscription.id, "subscription started");
        Ok(subscription)
    }

    /// Newest first. Active subscriptions past their end are reported as expired.
    pub async fn list_for_client(&self, client_id: Uuid) -> ApiResult<Vec<SubscriptionDetails>> {
        let mut conn = self.db.acquire().await?;
        expire_lapsed(&mut *conn, client_id).await?;

        let subscriptions = sqlx::query_as::<_, SubscriptionDetails>(&format!(
            "{DETAILS_SELECT} WHERE s.client_id = $1 ORDER BY s.starts_at DESC"
        ))
        .bind(client_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(subscriptions)
    }

    /// Subscriptions already past their end cannot be cancelled; they are
    /// reported as expired on the next listing.
    pub async fn cancel_active(&self, client_id: Uuid) -> ApiResult<Subscription> {
        let mut tx = self.db.begin().await?;

        let subscription = sqlx::query_as::<_, Subscription>(
            "UPDATE subscriptions SET status = $2
             WHERE client_id = $1 AND status = $3 AND ends_at > NOW()
             RETURNING id, client_id, plan_id, starts_at, ends_at, status",
        )
        .bind(client_id)
        .bind(SubscriptionStatus::Cancelled.as_str())
        .bind(SubscriptionStatus::Active.as_str())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ApiError::NotFound("Active subscription"))?;

        sqlx::query("UPDATE clients SET plan_id = NULL WHERE user_id = $1")
            .bind(client_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(subscription_id = %subscription.id, "subscription cancelled");
        Ok(subscription)
    }
}

async fn expire_lapsed(conn: &mut PgConnection, client_id: Uuid) -> ApiResult<()> {
    sqlx::query(
        "UPDATE subscriptions SET status = $2
         WHERE client_id = $1 AND status = $3 AND ends_at <= NOW()",
    )
    .bind(client_id)
    .bind(SubscriptionStatus::Expired.as_str())
    .bind(SubscriptionStatus::Active.as_str())
    .execute(conn)
    .await?;
    Ok(())
}
