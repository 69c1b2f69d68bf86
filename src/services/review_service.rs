use std::sync::Arc;

use uuid::Uuid;

use crate::dto::application_dto::UpdateStatusPayload;
use crate::error::{Error, Result};
use crate::models::application::{ApplicationDetail, ApplicationStatus, OfferType};
use crate::models::history::ApplicationHistory;
use crate::models::job_post::ExperienceLevel;
use crate::policy::{permits, Operation, Principal};
use crate::store::{ReviewUpdate, Store};

use super::notification_service::NotificationService;

/// The review state machine: legal transitions, the audit ledger, and the
/// status-change notification.
#[derive(Clone)]
pub struct ReviewService {
    store: Arc<dyn Store>,
    notifications: NotificationService,
}

/// Whether a review may move an application from one status to another.
/// Any status is reachable from any other, `Accepted` and `Rejected`
/// included. A stricter policy replaces this one function; the audit path
/// does not change.
fn transition_allowed(_from: ApplicationStatus, _to: ApplicationStatus) -> bool {
    true
}

impl ReviewService {
    pub fn new(store: Arc<dyn Store>, notifications: NotificationService) -> Self {
        Self {
            store,
            notifications,
        }
    }

    /// Applies a status transition. The update and its single ledger entry
    /// commit together; the notification is dispatched afterwards from the
    /// committed record and never affects the result.
    pub async fn update_status(
        &self,
        principal: &Principal,
        id: Uuid,
        payload: UpdateStatusPayload,
    ) -> Result<ApplicationDetail> {
        if !permits(principal.role, Operation::ChangeApplicationStatus) {
            return Err(Error::Forbidden(
                "Access denied. Insufficient permissions.".into(),
            ));
        }

        let new_status = ApplicationStatus::parse(&payload.status).ok_or_else(|| {
            Error::BadRequest(format!("Unrecognized status value: {}", payload.status))
        })?;
        if let Some(level) = &payload.assigned_level {
            if ExperienceLevel::parse(level).is_none() {
                return Err(Error::BadRequest(format!(
                    "Unrecognized experience level: {level}"
                )));
            }
        }
        if let Some(offer) = &payload.offer_type {
            if OfferType::parse(offer).is_none() {
                return Err(Error::BadRequest(format!(
                    "Unrecognized offer type: {offer}"
                )));
            }
        }

        let current = self
            .store
            .fetch_application(id)
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".into()))?;

        if let Some(from) = ApplicationStatus::parse(&current.status) {
            if !transition_allowed(from, new_status) {
                return Err(Error::BadRequest(format!(
                    "Transition from {} to {} is not permitted",
                    from, new_status
                )));
            }
        }

        let history_note = format!(
            "Status changed to: {}. Notes: {}",
            new_status,
            payload.admin_notes.as_deref().unwrap_or("None")
        );

        let applied = self
            .store
            .apply_review(
                id,
                ReviewUpdate {
                    status: new_status.as_str().to_string(),
                    admin_notes: payload.admin_notes,
                    assigned_level: payload.assigned_level,
                    offer_type: payload.offer_type,
                    changed_by: principal.id,
                    history_note,
                },
            )
            .await?;
        if applied.is_none() {
            return Err(Error::NotFound("Application not found".into()));
        }

        let detail = self
            .store
            .fetch_application_detail(id)
            .await?
            .ok_or_else(|| Error::Internal("Application record missing after update".into()))?;

        self.notifications.status_updated(&detail).await;

        Ok(detail)
    }

    /// The append-only ledger for one application, oldest entry first.
    pub async fn history(
        &self,
        principal: &Principal,
        application_id: Uuid,
    ) -> Result<Vec<ApplicationHistory>> {
        if !permits(principal.role, Operation::ViewApplicationHistory) {
            return Err(Error::Forbidden(
                "Access denied. Insufficient permissions.".into(),
            ));
        }

        if self.store.fetch_application(application_id).await?.is_none() {
            return Err(Error::NotFound("Application not found".into()));
        }

        Ok(self.store.list_history(application_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_are_permissive_in_every_direction() {
        for from in ApplicationStatus::ALL {
            for to in ApplicationStatus::ALL {
                assert!(transition_allowed(from, to));
            }
        }
    }
}
