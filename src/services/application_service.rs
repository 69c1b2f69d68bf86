use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::dto::application_dto::{
    AdminApplicationListQuery, ApplicationListQuery, SubmitApplicationPayload,
};
use crate::dto::Pagination;
use crate::error::{Error, Result};
use crate::models::application::ApplicationDetail;
use crate::policy::{permits, Operation, Principal};
use crate::store::{AdminApplicationFilter, ApplicationFilter, NewApplication, Page, Store, StoreError};

use super::notification_service::NotificationService;

/// Owns creation, uniqueness enforcement, and retrieval of applications.
#[derive(Clone)]
pub struct ApplicationService {
    store: Arc<dyn Store>,
    notifications: NotificationService,
}

fn page_window(page: Option<i64>, limit: Option<i64>) -> (i64, i64, Page) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(10).clamp(1, 100);
    (
        page,
        limit,
        Page {
            limit,
            offset: (page - 1) * limit,
        },
    )
}

impl ApplicationService {
    pub fn new(store: Arc<dyn Store>, notifications: NotificationService) -> Self {
        Self {
            store,
            notifications,
        }
    }

    /// Creates an application with status `Submitted` against an open
    /// posting. The (user, job) uniqueness check and the insert are one
    /// logical unit closed by the store constraint; the "received"
    /// notification goes out only after the insert committed.
    pub async fn submit(
        &self,
        principal: &Principal,
        payload: SubmitApplicationPayload,
    ) -> Result<ApplicationDetail> {
        if !permits(principal.role, Operation::SubmitApplication) {
            return Err(Error::Forbidden(
                "Access denied. Insufficient permissions.".into(),
            ));
        }

        let today = Utc::now().date_naive();
        let open = self
            .store
            .fetch_job(payload.job_post_id)
            .await?
            .map(|posting| posting.is_open(today))
            .unwrap_or(false);
        if !open {
            return Err(Error::NotFound(
                "Job not found, not active, or deadline has passed".into(),
            ));
        }

        let inserted = self
            .store
            .insert_application(NewApplication {
                user_id: principal.id,
                job_post_id: payload.job_post_id,
                cover_letter: payload.cover_letter,
            })
            .await
            .map_err(|err| match err {
                StoreError::Conflict => {
                    Error::Conflict("You have already applied for this job".into())
                }
                other => Error::from(other),
            })?;

        let detail = self
            .store
            .fetch_application_detail(inserted.id)
            .await?
            .ok_or_else(|| Error::Internal("Application record missing after insert".into()))?;

        self.notifications.application_received(&detail).await;

        Ok(detail)
    }

    /// The calling principal's own applications, newest first.
    pub async fn list_for_user(
        &self,
        principal: &Principal,
        query: ApplicationListQuery,
    ) -> Result<(Vec<ApplicationDetail>, Pagination)> {
        if !permits(principal.role, Operation::ListOwnApplications) {
            return Err(Error::Forbidden(
                "Access denied. Insufficient permissions.".into(),
            ));
        }

        let (page, limit, window) = page_window(query.page, query.limit);
        let (items, total) = self
            .store
            .list_user_applications(
                principal.id,
                ApplicationFilter {
                    status: query.status,
                    page: window,
                },
            )
            .await?;

        Ok((items, Pagination::new(page, limit, total)))
    }

    /// Full detail record; owners see their own, staff see any.
    pub async fn get(&self, principal: &Principal, id: Uuid) -> Result<ApplicationDetail> {
        let detail = self
            .store
            .fetch_application_detail(id)
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".into()))?;

        if detail.user_id != principal.id
            && !permits(principal.role, Operation::ViewAnyApplication)
        {
            // Ownership failures read the same as absence.
            return Err(Error::NotFound("Application not found".into()));
        }

        Ok(detail)
    }

    /// Removes the caller's application. Withdrawal is a removal, not a
    /// status transition, so no history entry is produced.
    pub async fn withdraw(&self, principal: &Principal, id: Uuid) -> Result<()> {
        if !permits(principal.role, Operation::WithdrawOwnApplication) {
            return Err(Error::Forbidden(
                "Access denied. Insufficient permissions.".into(),
            ));
        }

        let removed = self.store.delete_application_for_user(id, principal.id).await?;
        if !removed {
            return Err(Error::NotFound(
                "Application not found or you are not authorized to withdraw it".into(),
            ));
        }
        Ok(())
    }

    pub async fn list_for_job(
        &self,
        principal: &Principal,
        job_post_id: Uuid,
        query: ApplicationListQuery,
    ) -> Result<(Vec<ApplicationDetail>, Pagination)> {
        if !permits(principal.role, Operation::ListAllApplications) {
            return Err(Error::Forbidden(
                "Access denied. Insufficient permissions.".into(),
            ));
        }

        let (page, limit, window) = page_window(query.page, query.limit);
        let (items, total) = self
            .store
            .list_job_applications(
                job_post_id,
                ApplicationFilter {
                    status: query.status,
                    page: window,
                },
            )
            .await?;

        Ok((items, Pagination::new(page, limit, total)))
    }

    pub async fn list_all(
        &self,
        principal: &Principal,
        query: AdminApplicationListQuery,
    ) -> Result<(Vec<ApplicationDetail>, Pagination)> {
        if !permits(principal.role, Operation::ListAllApplications) {
            return Err(Error::Forbidden(
                "Access denied. Insufficient permissions.".into(),
            ));
        }

        let (page, limit, window) = page_window(query.page, query.limit);
        let (items, total) = self
            .store
            .list_applications(AdminApplicationFilter {
                status: query.status,
                job_post_id: query.job_id,
                experience_level: query.experience_level,
                submitted_from: query.start_date,
                submitted_to: query.end_date,
                page: window,
            })
            .await?;

        Ok((items, Pagination::new(page, limit, total)))
    }
}
