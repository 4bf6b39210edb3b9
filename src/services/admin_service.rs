use sqlx::PgPool;

use crate::auth::UserRole;
use crate::error::ApiResult;
use crate::models::{DashboardStats, ProfessionalStatus};
use crate::services::{PlanService, ProfessionalService, UserService};

/// How many pending registrations the dashboard lists.
pub const RECENT_PENDING_LIMIT: i64 = 5;

#[derive(Debug, Clone)]
pub struct AdminService {
    users: UserService,
    professionals: ProfessionalService,
    plans: PlanService,
}

impl AdminService {
    pub fn new(db: PgPool) -> Self {
        Self {
            users: UserService::new(db.clone()),
            professionals: ProfessionalService::new(db.clone()),
            plans: PlanService::new(db),
        }
    }

    pub async fn dashboard(&self) -> ApiResult<DashboardStats> {
        let (total_users, total_clients, total_professionals, total_plans, pending, recent) = tokio::try_join!(
            self.users.count_by_role(None),
            self.users.count_by_role(Some(UserRole::Client)),
            self.professionals.count(None),
            self.plans.count(),
            self.professionals.count(Some(ProfessionalStatus::Pending)),
            self.professionals.recent_pending(RECENT_PENDING_LIMIT),
        )?;

        Ok(DashboardStats {
            total_users,
            total_clients,
            total_professionals,
            total_plans,
            pending_professionals: pending,
            recent_pending: recent,
        })
    }
}
