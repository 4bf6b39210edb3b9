use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Pending professional shown on the admin dashboard.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PendingProfessional {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub specialty: String,
    pub requested_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_clients: i64,
    pub total_professionals: i64,
    pub total_plans: i64,
    pub pending_professionals: i64,
    pub recent_pending: Vec<PendingProfessional>,
}
