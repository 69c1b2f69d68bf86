use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::models::application::{Application, ApplicationDetail, ApplicationStatus};
use crate::models::history::ApplicationHistory;
use crate::models::job_post::JobPosting;
use crate::models::stats::{JobApplicationCount, LevelCount, MonthCount, StatusCount};
use crate::models::user::{User, UserDetail, UserOverview};

use super::{
    AdminApplicationFilter, ApplicationFilter, JobFilter, JobPostingChanges, NewApplication,
    NewJobPosting, ReviewUpdate, Store, StoreError, StoreResult, UserFilter,
};

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    profiles: HashMap<Uuid, crate::models::profile::Profile>,
    jobs: HashMap<Uuid, JobPosting>,
    applications: Vec<Application>,
    history: Vec<ApplicationHistory>,
}

/// In-memory store with the same observable invariants as `PgStore`:
/// check-and-insert for (user, job) uniqueness happens under one lock, and
/// the cascade delete either applies completely or not at all. Backs the
/// integration tests and the local demo mode.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    fail_next_write: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next mutating operation fail with `Unavailable` before it
    /// touches any state. Lets tests observe all-or-nothing behavior.
    pub fn fail_next_write(&self) {
        self.fail_next_write.store(true, Ordering::SeqCst);
    }

    fn take_injected_failure(&self) -> StoreResult<()> {
        if self.fail_next_write.swap(false, Ordering::SeqCst) {
            Err(StoreError::Unavailable("injected write failure".into()))
        } else {
            Ok(())
        }
    }

    pub fn seed_user(&self, email: &str, role: &str) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            role: role.to_string(),
            is_verified: true,
            created_at: now,
            updated_at: now,
        };
        self.inner
            .lock()
            .expect("memory store mutex poisoned")
            .users
            .insert(user.id, user.clone());
        user
    }

    pub fn seed_profile(
        &self,
        user_id: Uuid,
        first_name: &str,
        last_name: &str,
        experience_level: Option<&str>,
    ) -> crate::models::profile::Profile {
        let now = Utc::now();
        let profile = crate::models::profile::Profile {
            user_id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            phone_number: None,
            education: None,
            skills: None,
            years_of_experience: None,
            experience_level: experience_level.map(str::to_string),
            created_at: now,
            updated_at: now,
        };
        self.inner
            .lock()
            .expect("memory store mutex poisoned")
            .profiles
            .insert(user_id, profile.clone());
        profile
    }

    pub fn seed_job(
        &self,
        title: &str,
        is_active: bool,
        application_deadline: Option<NaiveDate>,
    ) -> JobPosting {
        let now = Utc::now();
        let posting = JobPosting {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: format!("{title} role"),
            required_skills: None,
            qualifications: None,
            experience_level: "Mid-Level".to_string(),
            job_type: "Full-time".to_string(),
            application_deadline,
            is_active,
            created_by: None,
            created_at: now,
            updated_at: now,
        };
        self.inner
            .lock()
            .expect("memory store mutex poisoned")
            .jobs
            .insert(posting.id, posting.clone());
        posting
    }

    /// Seeds an application row directly, bypassing the uniqueness check,
    /// with an explicit creation time so ordering tests are deterministic.
    pub fn seed_application_at(
        &self,
        user_id: Uuid,
        job_post_id: Uuid,
        status: &str,
        created_at: DateTime<Utc>,
    ) -> Application {
        let application = Application {
            id: Uuid::new_v4(),
            user_id,
            job_post_id,
            cover_letter: None,
            status: status.to_string(),
            admin_notes: None,
            assigned_level: None,
            offer_type: None,
            created_at,
            updated_at: created_at,
        };
        self.inner
            .lock()
            .expect("memory store mutex poisoned")
            .applications
            .push(application.clone());
        application
    }

    pub fn user_count(&self) -> usize {
        self.inner.lock().expect("memory store mutex poisoned").users.len()
    }

    pub fn profile_count(&self) -> usize {
        self.inner
            .lock()
            .expect("memory store mutex poisoned")
            .profiles
            .len()
    }

    pub fn application_count_for(&self, user_id: Uuid) -> usize {
        self.inner
            .lock()
            .expect("memory store mutex poisoned")
            .applications
            .iter()
            .filter(|application| application.user_id == user_id)
            .count()
    }
}

fn detail_of(inner: &Inner, application: &Application) -> Option<ApplicationDetail> {
    let job = inner.jobs.get(&application.job_post_id)?;
    let user = inner.users.get(&application.user_id)?;
    let profile = inner.profiles.get(&application.user_id)?;
    Some(ApplicationDetail {
        id: application.id,
        user_id: application.user_id,
        job_post_id: application.job_post_id,
        cover_letter: application.cover_letter.clone(),
        status: application.status.clone(),
        admin_notes: application.admin_notes.clone(),
        assigned_level: application.assigned_level.clone(),
        offer_type: application.offer_type.clone(),
        created_at: application.created_at,
        updated_at: application.updated_at,
        job_title: job.title.clone(),
        job_level: job.experience_level.clone(),
        job_type: job.job_type.clone(),
        email: user.email.clone(),
        first_name: profile.first_name.clone(),
        last_name: profile.last_name.clone(),
        applicant_level: profile.experience_level.clone(),
    })
}

fn paginate<T: Clone>(rows: &[T], limit: i64, offset: i64) -> Vec<T> {
    rows.iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .cloned()
        .collect()
}

fn details_sorted_desc(inner: &Inner, mut rows: Vec<Application>) -> Vec<ApplicationDetail> {
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    rows.iter()
        .filter_map(|application| detail_of(inner, application))
        .collect()
}

#[async_trait]
impl Store for MemoryStore {
    async fn fetch_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let inner = self.inner.lock().expect("memory store mutex poisoned");
        Ok(inner.users.get(&id).cloned())
    }

    async fn fetch_user_detail(&self, id: Uuid) -> StoreResult<Option<UserDetail>> {
        let inner = self.inner.lock().expect("memory store mutex poisoned");
        let Some(user) = inner.users.get(&id) else {
            return Ok(None);
        };
        let profile = inner.profiles.get(&id);
        let count_status = |status: &str| {
            inner
                .applications
                .iter()
                .filter(|a| a.user_id == id && a.status == status)
                .count() as i64
        };
        Ok(Some(UserDetail {
            id: user.id,
            email: user.email.clone(),
            role: user.role.clone(),
            is_verified: user.is_verified,
            created_at: user.created_at,
            first_name: profile.map(|p| p.first_name.clone()),
            last_name: profile.map(|p| p.last_name.clone()),
            phone_number: profile.and_then(|p| p.phone_number.clone()),
            education: profile.and_then(|p| p.education.clone()),
            skills: profile.and_then(|p| p.skills.clone()),
            years_of_experience: profile.and_then(|p| p.years_of_experience),
            experience_level: profile.and_then(|p| p.experience_level.clone()),
            total_applications: inner
                .applications
                .iter()
                .filter(|a| a.user_id == id)
                .count() as i64,
            accepted_applications: count_status("Accepted"),
            rejected_applications: count_status("Rejected"),
        }))
    }

    async fn list_users(&self, filter: UserFilter) -> StoreResult<(Vec<UserOverview>, i64)> {
        let inner = self.inner.lock().expect("memory store mutex poisoned");
        let matches = |user: &User| {
            let profile = inner.profiles.get(&user.id);
            if let Some(role) = &filter.role {
                if &user.role != role {
                    return false;
                }
            }
            if let Some(level) = &filter.experience_level {
                if profile.and_then(|p| p.experience_level.as_deref()) != Some(level.as_str()) {
                    return false;
                }
            }
            if let Some(search) = &filter.search {
                let needle = search.to_lowercase();
                let haystacks = [
                    Some(user.email.to_lowercase()),
                    profile.map(|p| p.first_name.to_lowercase()),
                    profile.map(|p| p.last_name.to_lowercase()),
                    profile.and_then(|p| p.skills.as_ref().map(|s| s.to_lowercase())),
                ];
                if !haystacks
                    .iter()
                    .flatten()
                    .any(|value| value.contains(&needle))
                {
                    return false;
                }
            }
            true
        };

        let mut rows: Vec<&User> = inner.users.values().filter(|u| matches(u)).collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = rows.len() as i64;

        let overviews: Vec<UserOverview> = rows
            .into_iter()
            .map(|user| {
                let profile = inner.profiles.get(&user.id);
                UserOverview {
                    id: user.id,
                    email: user.email.clone(),
                    role: user.role.clone(),
                    is_verified: user.is_verified,
                    created_at: user.created_at,
                    first_name: profile.map(|p| p.first_name.clone()),
                    last_name: profile.map(|p| p.last_name.clone()),
                    phone_number: profile.and_then(|p| p.phone_number.clone()),
                    experience_level: profile.and_then(|p| p.experience_level.clone()),
                    skills: profile.and_then(|p| p.skills.clone()),
                    application_count: inner
                        .applications
                        .iter()
                        .filter(|a| a.user_id == user.id)
                        .count() as i64,
                }
            })
            .collect();

        Ok((
            paginate(&overviews, filter.page.limit, filter.page.offset),
            total,
        ))
    }

    async fn update_user_role(&self, id: Uuid, role: &str) -> StoreResult<bool> {
        self.take_injected_failure()?;
        let mut inner = self.inner.lock().expect("memory store mutex poisoned");
        match inner.users.get_mut(&id) {
            Some(user) => {
                user.role = role.to_string();
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_user_cascade(&self, id: Uuid) -> StoreResult<()> {
        self.take_injected_failure()?;
        let mut inner = self.inner.lock().expect("memory store mutex poisoned");
        if !inner.users.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        let removed: Vec<Uuid> = inner
            .applications
            .iter()
            .filter(|a| a.user_id == id)
            .map(|a| a.id)
            .collect();
        inner.applications.retain(|a| a.user_id != id);
        inner
            .history
            .retain(|entry| !removed.contains(&entry.application_id));
        inner.profiles.remove(&id);
        inner.users.remove(&id);
        Ok(())
    }

    async fn insert_job(&self, job: NewJobPosting) -> StoreResult<JobPosting> {
        self.take_injected_failure()?;
        let now = Utc::now();
        let posting = JobPosting {
            id: Uuid::new_v4(),
            title: job.title,
            description: job.description,
            required_skills: job.required_skills,
            qualifications: job.qualifications,
            experience_level: job.experience_level,
            job_type: job.job_type,
            application_deadline: job.application_deadline,
            is_active: job.is_active,
            created_by: job.created_by,
            created_at: now,
            updated_at: now,
        };
        self.inner
            .lock()
            .expect("memory store mutex poisoned")
            .jobs
            .insert(posting.id, posting.clone());
        Ok(posting)
    }

    async fn update_job(
        &self,
        id: Uuid,
        changes: JobPostingChanges,
    ) -> StoreResult<Option<JobPosting>> {
        self.take_injected_failure()?;
        let mut inner = self.inner.lock().expect("memory store mutex poisoned");
        let Some(posting) = inner.jobs.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            posting.title = title;
        }
        if let Some(description) = changes.description {
            posting.description = description;
        }
        if let Some(required_skills) = changes.required_skills {
            posting.required_skills = Some(required_skills);
        }
        if let Some(qualifications) = changes.qualifications {
            posting.qualifications = Some(qualifications);
        }
        if let Some(experience_level) = changes.experience_level {
            posting.experience_level = experience_level;
        }
        if let Some(job_type) = changes.job_type {
            posting.job_type = job_type;
        }
        if let Some(application_deadline) = changes.application_deadline {
            posting.application_deadline = Some(application_deadline);
        }
        if let Some(is_active) = changes.is_active {
            posting.is_active = is_active;
        }
        posting.updated_at = Utc::now();
        Ok(Some(posting.clone()))
    }

    async fn delete_job(&self, id: Uuid) -> StoreResult<bool> {
        self.take_injected_failure()?;
        let mut inner = self.inner.lock().expect("memory store mutex poisoned");
        let removed = inner.jobs.remove(&id).is_some();
        if removed {
            let orphaned: Vec<Uuid> = inner
                .applications
                .iter()
                .filter(|a| a.job_post_id == id)
                .map(|a| a.id)
                .collect();
            inner.applications.retain(|a| a.job_post_id != id);
            inner
                .history
                .retain(|entry| !orphaned.contains(&entry.application_id));
        }
        Ok(removed)
    }

    async fn fetch_job(&self, id: Uuid) -> StoreResult<Option<JobPosting>> {
        let inner = self.inner.lock().expect("memory store mutex poisoned");
        Ok(inner.jobs.get(&id).cloned())
    }

    async fn list_jobs(&self, filter: JobFilter) -> StoreResult<(Vec<JobPosting>, i64)> {
        let inner = self.inner.lock().expect("memory store mutex poisoned");
        let mut rows: Vec<JobPosting> = inner
            .jobs
            .values()
            .filter(|posting| {
                if let Some(job_type) = &filter.job_type {
                    if &posting.job_type != job_type {
                        return false;
                    }
                }
                if let Some(level) = &filter.experience_level {
                    if &posting.experience_level != level {
                        return false;
                    }
                }
                if let Some(search) = &filter.search {
                    let needle = search.to_lowercase();
                    if !posting.title.to_lowercase().contains(&needle)
                        && !posting.description.to_lowercase().contains(&needle)
                    {
                        return false;
                    }
                }
                if let Some(open_on) = filter.open_on {
                    if !posting.is_open(open_on) {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = rows.len() as i64;
        Ok((paginate(&rows, filter.page.limit, filter.page.offset), total))
    }

    async fn insert_application(&self, new: NewApplication) -> StoreResult<Application> {
        self.take_injected_failure()?;
        let mut inner = self.inner.lock().expect("memory store mutex poisoned");
        let duplicate = inner
            .applications
            .iter()
            .any(|a| a.user_id == new.user_id && a.job_post_id == new.job_post_id);
        if duplicate {
            return Err(StoreError::Conflict);
        }
        let now = Utc::now();
        let application = Application {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            job_post_id: new.job_post_id,
            cover_letter: new.cover_letter,
            status: ApplicationStatus::Submitted.as_str().to_string(),
            admin_notes: None,
            assigned_level: None,
            offer_type: None,
            created_at: now,
            updated_at: now,
        };
        inner.applications.push(application.clone());
        Ok(application)
    }

    async fn fetch_application(&self, id: Uuid) -> StoreResult<Option<Application>> {
        let inner = self.inner.lock().expect("memory store mutex poisoned");
        Ok(inner.applications.iter().find(|a| a.id == id).cloned())
    }

    async fn fetch_application_detail(
        &self,
        id: Uuid,
    ) -> StoreResult<Option<ApplicationDetail>> {
        let inner = self.inner.lock().expect("memory store mutex poisoned");
        let application = inner.applications.iter().find(|a| a.id == id);
        Ok(application.and_then(|a| detail_of(&inner, a)))
    }

    async fn list_user_applications(
        &self,
        user_id: Uuid,
        filter: ApplicationFilter,
    ) -> StoreResult<(Vec<ApplicationDetail>, i64)> {
        let inner = self.inner.lock().expect("memory store mutex poisoned");
        let rows: Vec<Application> = inner
            .applications
            .iter()
            .filter(|a| a.user_id == user_id)
            .filter(|a| filter.status.as_deref().map_or(true, |s| a.status == s))
            .cloned()
            .collect();
        let total = rows.len() as i64;
        let details = details_sorted_desc(&inner, rows);
        Ok((
            paginate(&details, filter.page.limit, filter.page.offset),
            total,
        ))
    }

    async fn list_job_applications(
        &self,
        job_post_id: Uuid,
        filter: ApplicationFilter,
    ) -> StoreResult<(Vec<ApplicationDetail>, i64)> {
        let inner = self.inner.lock().expect("memory store mutex poisoned");
        let rows: Vec<Application> = inner
            .applications
            .iter()
            .filter(|a| a.job_post_id == job_post_id)
            .filter(|a| filter.status.as_deref().map_or(true, |s| a.status == s))
            .cloned()
            .collect();
        let total = rows.len() as i64;
        let details = details_sorted_desc(&inner, rows);
        Ok((
            paginate(&details, filter.page.limit, filter.page.offset),
            total,
        ))
    }

    async fn list_applications(
        &self,
        filter: AdminApplicationFilter,
    ) -> StoreResult<(Vec<ApplicationDetail>, i64)> {
        let inner = self.inner.lock().expect("memory store mutex poisoned");
        let rows: Vec<Application> = inner
            .applications
            .iter()
            .filter(|a| filter.status.as_deref().map_or(true, |s| a.status == s))
            .filter(|a| filter.job_post_id.map_or(true, |id| a.job_post_id == id))
            .filter(|a| {
                filter.experience_level.as_deref().map_or(true, |level| {
                    inner
                        .profiles
                        .get(&a.user_id)
                        .and_then(|p| p.experience_level.as_deref())
                        == Some(level)
                })
            })
            .filter(|a| {
                filter
                    .submitted_from
                    .map_or(true, |from| a.created_at.date_naive() >= from)
            })
            .filter(|a| {
                filter
                    .submitted_to
                    .map_or(true, |to| a.created_at.date_naive() <= to)
            })
            .cloned()
            .collect();
        let total = rows.len() as i64;
        let details = details_sorted_desc(&inner, rows);
        Ok((
            paginate(&details, filter.page.limit, filter.page.offset),
            total,
        ))
    }

    async fn delete_application_for_user(&self, id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        self.take_injected_failure()?;
        let mut inner = self.inner.lock().expect("memory store mutex poisoned");
        let before = inner.applications.len();
        inner
            .applications
            .retain(|a| !(a.id == id && a.user_id == user_id));
        let removed = inner.applications.len() < before;
        if removed {
            inner.history.retain(|entry| entry.application_id != id);
        }
        Ok(removed)
    }

    async fn apply_review(
        &self,
        id: Uuid,
        update: ReviewUpdate,
    ) -> StoreResult<Option<ApplicationHistory>> {
        self.take_injected_failure()?;
        let mut inner = self.inner.lock().expect("memory store mutex poisoned");
        let Some(application) = inner.applications.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        application.status = update.status.clone();
        application.admin_notes = update.admin_notes.clone();
        application.assigned_level = update.assigned_level.clone();
        application.offer_type = update.offer_type.clone();
        application.updated_at = Utc::now();

        let entry = ApplicationHistory {
            id: Uuid::new_v4(),
            application_id: id,
            new_status: update.status,
            changed_by: update.changed_by,
            notes: update.history_note,
            created_at: Utc::now(),
        };
        inner.history.push(entry.clone());
        Ok(Some(entry))
    }

    async fn list_history(
        &self,
        application_id: Uuid,
    ) -> StoreResult<Vec<ApplicationHistory>> {
        let inner = self.inner.lock().expect("memory store mutex poisoned");
        Ok(inner
            .history
            .iter()
            .filter(|entry| entry.application_id == application_id)
            .cloned()
            .collect())
    }

    async fn count_applicants(&self) -> StoreResult<i64> {
        let inner = self.inner.lock().expect("memory store mutex poisoned");
        Ok(inner.users.values().filter(|u| u.role == "applicant").count() as i64)
    }

    async fn count_jobs(&self) -> StoreResult<i64> {
        let inner = self.inner.lock().expect("memory store mutex poisoned");
        Ok(inner.jobs.len() as i64)
    }

    async fn count_applications(&self) -> StoreResult<i64> {
        let inner = self.inner.lock().expect("memory store mutex poisoned");
        Ok(inner.applications.len() as i64)
    }

    async fn count_open_jobs(&self, today: NaiveDate) -> StoreResult<i64> {
        let inner = self.inner.lock().expect("memory store mutex poisoned");
        Ok(inner.jobs.values().filter(|j| j.is_open(today)).count() as i64)
    }

    async fn count_pending_applications(&self) -> StoreResult<i64> {
        let inner = self.inner.lock().expect("memory store mutex poisoned");
        Ok(inner
            .applications
            .iter()
            .filter(|a| {
                ApplicationStatus::parse(&a.status)
                    .map(|status| status.is_pending())
                    .unwrap_or(false)
            })
            .count() as i64)
    }

    async fn status_breakdown(&self) -> StoreResult<Vec<StatusCount>> {
        let inner = self.inner.lock().expect("memory store mutex poisoned");
        let mut counts: BTreeMap<String, i64> = BTreeMap::new();
        for application in &inner.applications {
            *counts.entry(application.status.clone()).or_insert(0) += 1;
        }
        let mut rows: Vec<StatusCount> = counts
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(rows)
    }

    async fn recent_applications(&self, limit: i64) -> StoreResult<Vec<ApplicationDetail>> {
        let inner = self.inner.lock().expect("memory store mutex poisoned");
        let details = details_sorted_desc(&inner, inner.applications.clone());
        Ok(details.into_iter().take(limit.max(0) as usize).collect())
    }

    async fn top_jobs(&self, limit: i64) -> StoreResult<Vec<JobApplicationCount>> {
        let inner = self.inner.lock().expect("memory store mutex poisoned");
        let mut rows: Vec<JobApplicationCount> = inner
            .jobs
            .values()
            .filter(|posting| posting.is_active)
            .map(|posting| JobApplicationCount {
                id: posting.id,
                title: posting.title.clone(),
                application_count: inner
                    .applications
                    .iter()
                    .filter(|a| a.job_post_id == posting.id)
                    .count() as i64,
            })
            .collect();
        rows.sort_by(|a, b| b.application_count.cmp(&a.application_count));
        Ok(rows.into_iter().take(limit.max(0) as usize).collect())
    }

    async fn monthly_application_counts(
        &self,
        since: NaiveDate,
    ) -> StoreResult<Vec<MonthCount>> {
        let inner = self.inner.lock().expect("memory store mutex poisoned");
        let mut counts: BTreeMap<String, i64> = BTreeMap::new();
        for application in &inner.applications {
            if application.created_at.date_naive() >= since {
                let month = application.created_at.format("%Y-%m").to_string();
                *counts.entry(month).or_insert(0) += 1;
            }
        }
        Ok(counts
            .into_iter()
            .map(|(month, count)| MonthCount { month, count })
            .collect())
    }

    async fn applicant_level_distribution(&self) -> StoreResult<Vec<LevelCount>> {
        let inner = self.inner.lock().expect("memory store mutex poisoned");
        let mut counts: BTreeMap<String, i64> = BTreeMap::new();
        for profile in inner.profiles.values() {
            let is_applicant = inner
                .users
                .get(&profile.user_id)
                .map(|user| user.role == "applicant")
                .unwrap_or(false);
            if !is_applicant {
                continue;
            }
            let level = profile
                .experience_level
                .clone()
                .unwrap_or_else(|| "Not Specified".to_string());
            *counts.entry(level).or_insert(0) += 1;
        }
        let mut rows: Vec<LevelCount> = counts
            .into_iter()
            .map(|(level, count)| LevelCount { level, count })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_insert_is_a_conflict() {
        let store = MemoryStore::new();
        let user = store.seed_user("dup@example.com", "applicant");
        let job = store.seed_job("Backend Engineer", true, None);

        tokio_test::block_on(async {
            let first = store
                .insert_application(NewApplication {
                    user_id: user.id,
                    job_post_id: job.id,
                    cover_letter: None,
                })
                .await;
            assert!(first.is_ok());

            let second = store
                .insert_application(NewApplication {
                    user_id: user.id,
                    job_post_id: job.id,
                    cover_letter: None,
                })
                .await;
            assert!(matches!(second, Err(StoreError::Conflict)));
        });
    }

    #[test]
    fn injected_failure_leaves_state_untouched() {
        let store = MemoryStore::new();
        let user = store.seed_user("victim@example.com", "applicant");
        store.seed_profile(user.id, "Vic", "Tim", None);

        store.fail_next_write();
        tokio_test::block_on(async {
            let result = store.delete_user_cascade(user.id).await;
            assert!(matches!(result, Err(StoreError::Unavailable(_))));
        });
        assert_eq!(store.user_count(), 1);
        assert_eq!(store.profile_count(), 1);
    }
}
