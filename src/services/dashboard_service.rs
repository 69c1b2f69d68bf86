use std::sync::Arc;

use chrono::{Months, Utc};

use crate::dto::admin_dto::{DashboardStatsResponse, DashboardTotals};
use crate::error::{Error, Result};
use crate::policy::{permits, Operation, Principal};
use crate::store::Store;

/// Read-only aggregation over the registry's data. The result is an
/// eventually-consistent snapshot; staleness equals the store's read
/// consistency and no locking is involved.
#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn Store>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn stats(&self, principal: &Principal) -> Result<DashboardStatsResponse> {
        if !permits(principal.role, Operation::ViewDashboard) {
            return Err(Error::Forbidden(
                "Access denied. Insufficient permissions.".into(),
            ));
        }

        let today = Utc::now().date_naive();
        let trend_start = today
            .checked_sub_months(Months::new(6))
            .unwrap_or(today);

        let total_applicants = self.store.count_applicants().await?;
        let total_jobs = self.store.count_jobs().await?;
        let total_applications = self.store.count_applications().await?;
        let active_jobs = self.store.count_open_jobs(today).await?;
        let pending_applications = self.store.count_pending_applications().await?;

        let application_status = self.store.status_breakdown().await?;
        let recent_applications = self.store.recent_applications(10).await?;
        let popular_jobs = self.store.top_jobs(5).await?;
        let monthly_trends = self.store.monthly_application_counts(trend_start).await?;
        let level_distribution = self.store.applicant_level_distribution().await?;

        Ok(DashboardStatsResponse {
            stats: DashboardTotals {
                total_applicants,
                total_jobs,
                total_applications,
                active_jobs,
                pending_applications,
            },
            application_status,
            recent_applications,
            popular_jobs,
            monthly_trends,
            level_distribution,
        })
    }
}
