use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::job_post::JobPosting;

use super::Pagination;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateJobPayload {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub required_skills: Option<String>,
    pub qualifications: Option<String>,
    pub experience_level: String,
    pub job_type: String,
    pub application_deadline: Option<NaiveDate>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateJobPayload {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub required_skills: Option<String>,
    pub qualifications: Option<String>,
    pub experience_level: Option<String>,
    pub job_type: Option<String>,
    pub application_deadline: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub job_type: Option<String>,
    pub experience_level: Option<String>,
    pub search: Option<String>,
    /// Staff may pass `include_closed=true` to see inactive and expired
    /// postings; the public listing only ever sees open ones.
    pub include_closed: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobListResponse {
    pub jobs: Vec<JobPosting>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResponse {
    pub job: JobPosting,
}
