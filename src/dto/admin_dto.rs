use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::application::ApplicationDetail;
use crate::models::stats::{JobApplicationCount, LevelCount, MonthCount, StatusCount};
use crate::models::user::{UserDetail, UserOverview};

use super::Pagination;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateRolePayload {
    #[validate(length(min = 1))]
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UserListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub role: Option<String>,
    pub experience_level: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListResponse {
    pub users: Vec<UserOverview>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDetailResponse {
    pub user: UserDetail,
    pub applications: Vec<ApplicationDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleChangeResponse {
    pub user_id: Uuid,
    pub email: String,
    pub new_role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteUserResponse {
    pub deleted_user_id: Uuid,
    pub deleted_user_email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardTotals {
    pub total_applicants: i64,
    pub total_jobs: i64,
    pub total_applications: i64,
    pub active_jobs: i64,
    pub pending_applications: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStatsResponse {
    pub stats: DashboardTotals,
    pub application_status: Vec<StatusCount>,
    pub recent_applications: Vec<ApplicationDetail>,
    pub popular_jobs: Vec<JobApplicationCount>,
    pub monthly_trends: Vec<MonthCount>,
    pub level_distribution: Vec<LevelCount>,
}
