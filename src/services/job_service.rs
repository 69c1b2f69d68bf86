use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::dto::job_dto::{CreateJobPayload, JobListQuery, UpdateJobPayload};
use crate::dto::Pagination;
use crate::error::{Error, Result};
use crate::models::job_post::{ExperienceLevel, JobPosting, JobType};
use crate::policy::{permits, Operation, Principal};
use crate::store::{JobFilter, JobPostingChanges, NewJobPosting, Page, Store};

/// Job posting administration plus the public open-postings listing.
#[derive(Clone)]
pub struct JobService {
    store: Arc<dyn Store>,
}

impl JobService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        principal: &Principal,
        payload: CreateJobPayload,
    ) -> Result<JobPosting> {
        if !permits(principal.role, Operation::ManageJobPostings) {
            return Err(Error::Forbidden(
                "Access denied. Insufficient permissions.".into(),
            ));
        }
        if ExperienceLevel::parse(&payload.experience_level).is_none() {
            return Err(Error::BadRequest(format!(
                "Unrecognized experience level: {}",
                payload.experience_level
            )));
        }
        if JobType::parse(&payload.job_type).is_none() {
            return Err(Error::BadRequest(format!(
                "Unrecognized job type: {}",
                payload.job_type
            )));
        }

        let posting = self
            .store
            .insert_job(NewJobPosting {
                title: payload.title,
                description: payload.description,
                required_skills: payload.required_skills,
                qualifications: payload.qualifications,
                experience_level: payload.experience_level,
                job_type: payload.job_type,
                application_deadline: payload.application_deadline,
                is_active: payload.is_active,
                created_by: Some(principal.id),
            })
            .await?;
        Ok(posting)
    }

    pub async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        payload: UpdateJobPayload,
    ) -> Result<JobPosting> {
        if !permits(principal.role, Operation::ManageJobPostings) {
            return Err(Error::Forbidden(
                "Access denied. Insufficient permissions.".into(),
            ));
        }
        if let Some(level) = &payload.experience_level {
            if ExperienceLevel::parse(level).is_none() {
                return Err(Error::BadRequest(format!(
                    "Unrecognized experience level: {level}"
                )));
            }
        }
        if let Some(job_type) = &payload.job_type {
            if JobType::parse(job_type).is_none() {
                return Err(Error::BadRequest(format!(
                    "Unrecognized job type: {job_type}"
                )));
            }
        }

        let posting = self
            .store
            .update_job(
                id,
                JobPostingChanges {
                    title: payload.title,
                    description: payload.description,
                    required_skills: payload.required_skills,
                    qualifications: payload.qualifications,
                    experience_level: payload.experience_level,
                    job_type: payload.job_type,
                    application_deadline: payload.application_deadline,
                    is_active: payload.is_active,
                },
            )
            .await?
            .ok_or_else(|| Error::NotFound("Job posting not found".into()))?;
        Ok(posting)
    }

    pub async fn delete(&self, principal: &Principal, id: Uuid) -> Result<()> {
        if !permits(principal.role, Operation::ManageJobPostings) {
            return Err(Error::Forbidden(
                "Access denied. Insufficient permissions.".into(),
            ));
        }
        let removed = self.store.delete_job(id).await?;
        if !removed {
            return Err(Error::NotFound("Job posting not found".into()));
        }
        Ok(())
    }

    /// Single posting. Closed postings stay visible to staff only.
    pub async fn get(&self, id: Uuid, principal: Option<&Principal>) -> Result<JobPosting> {
        let posting = self
            .store
            .fetch_job(id)
            .await?
            .ok_or_else(|| Error::NotFound("Job posting not found".into()))?;

        let staff = principal.map(|p| p.role.is_staff()).unwrap_or(false);
        if !staff && !posting.is_open(Utc::now().date_naive()) {
            return Err(Error::NotFound("Job posting not found".into()));
        }
        Ok(posting)
    }

    /// Listing; `include_closed` is honored for staff callers only.
    pub async fn list(
        &self,
        query: JobListQuery,
        principal: Option<&Principal>,
    ) -> Result<(Vec<JobPosting>, Pagination)> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(10).clamp(1, 100);

        let staff = principal.map(|p| p.role.is_staff()).unwrap_or(false);
        let include_closed = staff && query.include_closed.unwrap_or(false);

        let (items, total) = self
            .store
            .list_jobs(JobFilter {
                job_type: query.job_type,
                experience_level: query.experience_level,
                search: query.search,
                open_on: if include_closed {
                    None
                } else {
                    Some(Utc::now().date_naive())
                },
                page: Page {
                    limit,
                    offset: (page - 1) * limit,
                },
            })
            .await?;

        Ok((items, Pagination::new(page, limit, total)))
    }
}
