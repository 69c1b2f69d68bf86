//! Persistence port for the lifecycle core.
//!
//! The store is the only mutable shared state in the system; every mutation
//! flows through this trait. `PgStore` is the production implementation,
//! `MemoryStore` backs the tests and enforces the same invariants (the
//! (user, job) uniqueness constraint and all-or-nothing cascade deletes).

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::application::{Application, ApplicationDetail};
use crate::models::history::ApplicationHistory;
use crate::models::job_post::JobPosting;
use crate::models::stats::{JobApplicationCount, LevelCount, MonthCount, StatusCount};
use crate::models::user::{User, UserDetail, UserOverview};

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,

    #[error("record not found")]
    NotFound,

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Offset/limit window for list operations.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: 10,
            offset: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApplicationFilter {
    pub status: Option<String>,
    pub page: Page,
}

#[derive(Debug, Clone, Default)]
pub struct AdminApplicationFilter {
    pub status: Option<String>,
    pub job_post_id: Option<Uuid>,
    pub experience_level: Option<String>,
    pub submitted_from: Option<NaiveDate>,
    pub submitted_to: Option<NaiveDate>,
    pub page: Page,
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub role: Option<String>,
    pub experience_level: Option<String>,
    pub search: Option<String>,
    pub page: Page,
}

#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub job_type: Option<String>,
    pub experience_level: Option<String>,
    pub search: Option<String>,
    /// When set, restricts to postings open for applications on that date.
    pub open_on: Option<NaiveDate>,
    pub page: Page,
}

#[derive(Debug, Clone)]
pub struct NewApplication {
    pub user_id: Uuid,
    pub job_post_id: Uuid,
    pub cover_letter: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewJobPosting {
    pub title: String,
    pub description: String,
    pub required_skills: Option<String>,
    pub qualifications: Option<String>,
    pub experience_level: String,
    pub job_type: String,
    pub application_deadline: Option<NaiveDate>,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct JobPostingChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub required_skills: Option<String>,
    pub qualifications: Option<String>,
    pub experience_level: Option<String>,
    pub job_type: Option<String>,
    pub application_deadline: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

/// Review mutation applied together with its ledger entry in one
/// transaction, so a successful call implies exactly one new history row.
#[derive(Debug, Clone)]
pub struct ReviewUpdate {
    pub status: String,
    pub admin_notes: Option<String>,
    pub assigned_level: Option<String>,
    pub offer_type: Option<String>,
    pub changed_by: Uuid,
    pub history_note: String,
}

#[async_trait]
pub trait Store: Send + Sync {
    // Users
    async fn fetch_user(&self, id: Uuid) -> StoreResult<Option<User>>;
    async fn fetch_user_detail(&self, id: Uuid) -> StoreResult<Option<UserDetail>>;
    async fn list_users(&self, filter: UserFilter) -> StoreResult<(Vec<UserOverview>, i64)>;
    async fn update_user_role(&self, id: Uuid, role: &str) -> StoreResult<bool>;
    /// Removes the user's applications, profile, and user row atomically.
    async fn delete_user_cascade(&self, id: Uuid) -> StoreResult<()>;

    // Job postings
    async fn insert_job(&self, job: NewJobPosting) -> StoreResult<JobPosting>;
    async fn update_job(
        &self,
        id: Uuid,
        changes: JobPostingChanges,
    ) -> StoreResult<Option<JobPosting>>;
    async fn delete_job(&self, id: Uuid) -> StoreResult<bool>;
    async fn fetch_job(&self, id: Uuid) -> StoreResult<Option<JobPosting>>;
    async fn list_jobs(&self, filter: JobFilter) -> StoreResult<(Vec<JobPosting>, i64)>;

    // Applications
    /// Inserts with status `Submitted`; the (user_id, job_post_id)
    /// uniqueness constraint turns a duplicate into `Conflict`, including
    /// under concurrent submission.
    async fn insert_application(&self, new: NewApplication) -> StoreResult<Application>;
    async fn fetch_application(&self, id: Uuid) -> StoreResult<Option<Application>>;
    async fn fetch_application_detail(&self, id: Uuid)
        -> StoreResult<Option<ApplicationDetail>>;
    async fn list_user_applications(
        &self,
        user_id: Uuid,
        filter: ApplicationFilter,
    ) -> StoreResult<(Vec<ApplicationDetail>, i64)>;
    async fn list_job_applications(
        &self,
        job_post_id: Uuid,
        filter: ApplicationFilter,
    ) -> StoreResult<(Vec<ApplicationDetail>, i64)>;
    async fn list_applications(
        &self,
        filter: AdminApplicationFilter,
    ) -> StoreResult<(Vec<ApplicationDetail>, i64)>;
    async fn delete_application_for_user(&self, id: Uuid, user_id: Uuid) -> StoreResult<bool>;
    /// Applies the status/notes/level/offer update and appends the ledger
    /// entry in one transaction. Returns `None` when the application does
    /// not exist.
    async fn apply_review(
        &self,
        id: Uuid,
        update: ReviewUpdate,
    ) -> StoreResult<Option<ApplicationHistory>>;
    async fn list_history(&self, application_id: Uuid)
        -> StoreResult<Vec<ApplicationHistory>>;

    // Aggregates (read-only snapshot queries)
    async fn count_applicants(&self) -> StoreResult<i64>;
    async fn count_jobs(&self) -> StoreResult<i64>;
    async fn count_applications(&self) -> StoreResult<i64>;
    async fn count_open_jobs(&self, today: NaiveDate) -> StoreResult<i64>;
    async fn count_pending_applications(&self) -> StoreResult<i64>;
    async fn status_breakdown(&self) -> StoreResult<Vec<StatusCount>>;
    async fn recent_applications(&self, limit: i64) -> StoreResult<Vec<ApplicationDetail>>;
    async fn top_jobs(&self, limit: i64) -> StoreResult<Vec<JobApplicationCount>>;
    async fn monthly_application_counts(&self, since: NaiveDate)
        -> StoreResult<Vec<MonthCount>>;
    async fn applicant_level_distribution(&self) -> StoreResult<Vec<LevelCount>>;
}
