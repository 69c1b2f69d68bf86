use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::application::{Application, ApplicationDetail};
use crate::models::history::ApplicationHistory;
use crate::models::job_post::JobPosting;
use crate::models::stats::{JobApplicationCount, LevelCount, MonthCount, StatusCount};
use crate::models::user::{User, UserDetail, UserOverview};

use super::{
    AdminApplicationFilter, ApplicationFilter, JobFilter, JobPostingChanges, NewApplication,
    NewJobPosting, ReviewUpdate, Store, StoreError, StoreResult, UserFilter,
};

const APPLICATION_COLUMNS: &str = "id, user_id, job_post_id, cover_letter, status, admin_notes, \
     assigned_level, offer_type, created_at, updated_at";

const JOB_COLUMNS: &str = "id, title, description, required_skills, qualifications, \
     experience_level, job_type, application_deadline, is_active, created_by, created_at, \
     updated_at";

const DETAIL_SELECT: &str = "SELECT a.id, a.user_id, a.job_post_id, a.cover_letter, a.status, \
     a.admin_notes, a.assigned_level, a.offer_type, a.created_at, a.updated_at, \
     jp.title AS job_title, jp.experience_level AS job_level, jp.job_type AS job_type, \
     u.email, p.first_name, p.last_name, p.experience_level AS applicant_level \
     FROM applications a \
     JOIN job_posts jp ON a.job_post_id = jp.id \
     JOIN users u ON a.user_id = u.id \
     JOIN profiles p ON a.user_id = p.user_id";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505")
    )
}

#[async_trait]
impl Store for PgStore {
    async fn fetch_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, role, is_verified, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn fetch_user_detail(&self, id: Uuid) -> StoreResult<Option<UserDetail>> {
        let detail = sqlx::query_as::<_, UserDetail>(
            r#"
            SELECT u.id, u.email, u.role, u.is_verified, u.created_at,
                   p.first_name, p.last_name, p.phone_number, p.education, p.skills,
                   p.years_of_experience, p.experience_level,
                   (SELECT COUNT(*) FROM applications a WHERE a.user_id = u.id) AS total_applications,
                   (SELECT COUNT(*) FROM applications a WHERE a.user_id = u.id AND a.status = 'Accepted') AS accepted_applications,
                   (SELECT COUNT(*) FROM applications a WHERE a.user_id = u.id AND a.status = 'Rejected') AS rejected_applications
            FROM users u
            LEFT JOIN profiles p ON u.id = p.user_id
            WHERE u.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(detail)
    }

    async fn list_users(&self, filter: UserFilter) -> StoreResult<(Vec<UserOverview>, i64)> {
        let mut filters = Vec::new();
        let mut args: Vec<String> = Vec::new();

        if let Some(role) = filter.role {
            filters.push(format!("u.role = ${}", args.len() + 1));
            args.push(role);
        }
        if let Some(level) = filter.experience_level {
            filters.push(format!("p.experience_level = ${}", args.len() + 1));
            args.push(level);
        }
        if let Some(search) = filter.search {
            let first = args.len() + 1;
            filters.push(format!(
                "(u.email ILIKE ${first} OR p.first_name ILIKE ${first} OR p.last_name ILIKE ${first} OR p.skills ILIKE ${first})"
            ));
            args.push(format!("%{}%", search));
        }

        let where_clause = if filters.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", filters.join(" AND "))
        };

        let items_query = format!(
            "SELECT u.id, u.email, u.role, u.is_verified, u.created_at,
                    p.first_name, p.last_name, p.phone_number, p.experience_level, p.skills,
                    (SELECT COUNT(*) FROM applications a WHERE a.user_id = u.id) AS application_count
             FROM users u
             LEFT JOIN profiles p ON u.id = p.user_id
             {}
             ORDER BY u.created_at DESC
             LIMIT ${} OFFSET ${}",
            where_clause,
            args.len() + 1,
            args.len() + 2
        );
        let total_query = format!(
            "SELECT COUNT(*) FROM users u LEFT JOIN profiles p ON u.id = p.user_id {}",
            where_clause
        );

        let mut items_statement = sqlx::query_as::<_, UserOverview>(&items_query);
        for value in &args {
            items_statement = items_statement.bind(value);
        }
        items_statement = items_statement.bind(filter.page.limit).bind(filter.page.offset);
        let items = items_statement.fetch_all(&self.pool).await?;

        let mut total_statement = sqlx::query_scalar::<_, i64>(&total_query);
        for value in &args {
            total_statement = total_statement.bind(value);
        }
        let total = total_statement.fetch_one(&self.pool).await?;

        Ok((items, total))
    }

    async fn update_user_role(&self, id: Uuid, role: &str) -> StoreResult<bool> {
        let result =
            sqlx::query("UPDATE users SET role = $1, updated_at = NOW() WHERE id = $2")
                .bind(role)
                .bind(id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_user_cascade(&self, id: Uuid) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM applications WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM profiles WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StoreError::NotFound);
        }

        tx.commit().await?;
        Ok(())
    }

    async fn insert_job(&self, job: NewJobPosting) -> StoreResult<JobPosting> {
        let query = format!(
            "INSERT INTO job_posts (title, description, required_skills, qualifications, \
             experience_level, job_type, application_deadline, is_active, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {JOB_COLUMNS}"
        );
        let posting = sqlx::query_as::<_, JobPosting>(&query)
            .bind(job.title)
            .bind(job.description)
            .bind(job.required_skills)
            .bind(job.qualifications)
            .bind(job.experience_level)
            .bind(job.job_type)
            .bind(job.application_deadline)
            .bind(job.is_active)
            .bind(job.created_by)
            .fetch_one(&self.pool)
            .await?;
        Ok(posting)
    }

    async fn update_job(
        &self,
        id: Uuid,
        changes: JobPostingChanges,
    ) -> StoreResult<Option<JobPosting>> {
        let query = format!(
            "UPDATE job_posts SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                required_skills = COALESCE($4, required_skills),
                qualifications = COALESCE($5, qualifications),
                experience_level = COALESCE($6, experience_level),
                job_type = COALESCE($7, job_type),
                application_deadline = COALESCE($8, application_deadline),
                is_active = COALESCE($9, is_active),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {JOB_COLUMNS}"
        );
        let posting = sqlx::query_as::<_, JobPosting>(&query)
            .bind(id)
            .bind(changes.title)
            .bind(changes.description)
            .bind(changes.required_skills)
            .bind(changes.qualifications)
            .bind(changes.experience_level)
            .bind(changes.job_type)
            .bind(changes.application_deadline)
            .bind(changes.is_active)
            .fetch_optional(&self.pool)
            .await?;
        Ok(posting)
    }

    async fn delete_job(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM job_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn fetch_job(&self, id: Uuid) -> StoreResult<Option<JobPosting>> {
        let query = format!("SELECT {JOB_COLUMNS} FROM job_posts WHERE id = $1");
        let posting = sqlx::query_as::<_, JobPosting>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(posting)
    }

    async fn list_jobs(&self, filter: JobFilter) -> StoreResult<(Vec<JobPosting>, i64)> {
        let mut filters = Vec::new();
        let mut args: Vec<String> = Vec::new();

        if let Some(job_type) = filter.job_type {
            filters.push(format!("job_type = ${}", args.len() + 1));
            args.push(job_type);
        }
        if let Some(level) = filter.experience_level {
            filters.push(format!("experience_level = ${}", args.len() + 1));
            args.push(level);
        }
        if let Some(search) = filter.search {
            let first = args.len() + 1;
            filters.push(format!(
                "(title ILIKE ${first} OR description ILIKE ${first})"
            ));
            args.push(format!("%{}%", search));
        }
        if let Some(open_on) = filter.open_on {
            filters.push(format!(
                "is_active = TRUE AND (application_deadline IS NULL OR application_deadline >= ${}::date)",
                args.len() + 1
            ));
            args.push(open_on.to_string());
        }

        let where_clause = if filters.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", filters.join(" AND "))
        };

        let items_query = format!(
            "SELECT {JOB_COLUMNS} FROM job_posts {} ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            where_clause,
            args.len() + 1,
            args.len() + 2
        );
        let total_query = format!("SELECT COUNT(*) FROM job_posts {}", where_clause);

        let mut items_statement = sqlx::query_as::<_, JobPosting>(&items_query);
        for value in &args {
            items_statement = items_statement.bind(value);
        }
        items_statement = items_statement.bind(filter.page.limit).bind(filter.page.offset);
        let items = items_statement.fetch_all(&self.pool).await?;

        let mut total_statement = sqlx::query_scalar::<_, i64>(&total_query);
        for value in &args {
            total_statement = total_statement.bind(value);
        }
        let total = total_statement.fetch_one(&self.pool).await?;

        Ok((items, total))
    }

    async fn insert_application(&self, new: NewApplication) -> StoreResult<Application> {
        let query = format!(
            "INSERT INTO applications (user_id, job_post_id, cover_letter) \
             VALUES ($1, $2, $3) RETURNING {APPLICATION_COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Application>(&query)
            .bind(new.user_id)
            .bind(new.job_post_id)
            .bind(new.cover_letter)
            .fetch_one(&self.pool)
            .await;

        match inserted {
            Ok(application) => Ok(application),
            Err(err) if is_unique_violation(&err) => Err(StoreError::Conflict),
            Err(err) => Err(err.into()),
        }
    }

    async fn fetch_application(&self, id: Uuid) -> StoreResult<Option<Application>> {
        let query = format!("SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = $1");
        let application = sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(application)
    }

    async fn fetch_application_detail(
        &self,
        id: Uuid,
    ) -> StoreResult<Option<ApplicationDetail>> {
        let query = format!("{DETAIL_SELECT} WHERE a.id = $1");
        let detail = sqlx::query_as::<_, ApplicationDetail>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(detail)
    }

    async fn list_user_applications(
        &self,
        user_id: Uuid,
        filter: ApplicationFilter,
    ) -> StoreResult<(Vec<ApplicationDetail>, i64)> {
        let mut items_query = format!("{DETAIL_SELECT} WHERE a.user_id = $1");
        let mut total_query =
            "SELECT COUNT(*) FROM applications a WHERE a.user_id = $1".to_string();
        let mut next = 2;

        if filter.status.is_some() {
            items_query.push_str(&format!(" AND a.status = ${next}"));
            total_query.push_str(&format!(" AND a.status = ${next}"));
            next += 1;
        }
        items_query.push_str(&format!(
            " ORDER BY a.created_at DESC LIMIT ${} OFFSET ${}",
            next,
            next + 1
        ));

        let mut items_statement =
            sqlx::query_as::<_, ApplicationDetail>(&items_query).bind(user_id);
        let mut total_statement = sqlx::query_scalar::<_, i64>(&total_query).bind(user_id);
        if let Some(status) = &filter.status {
            items_statement = items_statement.bind(status);
            total_statement = total_statement.bind(status);
        }
        items_statement = items_statement.bind(filter.page.limit).bind(filter.page.offset);

        let items = items_statement.fetch_all(&self.pool).await?;
        let total = total_statement.fetch_one(&self.pool).await?;
        Ok((items, total))
    }

    async fn list_job_applications(
        &self,
        job_post_id: Uuid,
        filter: ApplicationFilter,
    ) -> StoreResult<(Vec<ApplicationDetail>, i64)> {
        let mut items_query = format!("{DETAIL_SELECT} WHERE a.job_post_id = $1");
        let mut total_query =
            "SELECT COUNT(*) FROM applications a WHERE a.job_post_id = $1".to_string();
        let mut next = 2;

        if filter.status.is_some() {
            items_query.push_str(&format!(" AND a.status = ${next}"));
            total_query.push_str(&format!(" AND a.status = ${next}"));
            next += 1;
        }
        items_query.push_str(&format!(
            " ORDER BY a.created_at DESC LIMIT ${} OFFSET ${}",
            next,
            next + 1
        ));

        let mut items_statement =
            sqlx::query_as::<_, ApplicationDetail>(&items_query).bind(job_post_id);
        let mut total_statement = sqlx::query_scalar::<_, i64>(&total_query).bind(job_post_id);
        if let Some(status) = &filter.status {
            items_statement = items_statement.bind(status);
            total_statement = total_statement.bind(status);
        }
        items_statement = items_statement.bind(filter.page.limit).bind(filter.page.offset);

        let items = items_statement.fetch_all(&self.pool).await?;
        let total = total_statement.fetch_one(&self.pool).await?;
        Ok((items, total))
    }

    async fn list_applications(
        &self,
        filter: AdminApplicationFilter,
    ) -> StoreResult<(Vec<ApplicationDetail>, i64)> {
        let mut filters = Vec::new();
        let mut args: Vec<String> = Vec::new();

        if let Some(status) = filter.status {
            filters.push(format!("a.status = ${}", args.len() + 1));
            args.push(status);
        }
        if let Some(job_post_id) = filter.job_post_id {
            filters.push(format!("a.job_post_id = ${}::uuid", args.len() + 1));
            args.push(job_post_id.to_string());
        }
        if let Some(level) = filter.experience_level {
            filters.push(format!("p.experience_level = ${}", args.len() + 1));
            args.push(level);
        }
        if let Some(from) = filter.submitted_from {
            filters.push(format!("a.created_at::date >= ${}::date", args.len() + 1));
            args.push(from.to_string());
        }
        if let Some(to) = filter.submitted_to {
            filters.push(format!("a.created_at::date <= ${}::date", args.len() + 1));
            args.push(to.to_string());
        }

        let where_clause = if filters.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", filters.join(" AND "))
        };

        let items_query = format!(
            "{DETAIL_SELECT} {} ORDER BY a.created_at DESC LIMIT ${} OFFSET ${}",
            where_clause,
            args.len() + 1,
            args.len() + 2
        );
        let total_query = format!(
            "SELECT COUNT(*) FROM applications a \
             JOIN users u ON a.user_id = u.id \
             JOIN profiles p ON a.user_id = p.user_id {}",
            where_clause
        );

        let mut items_statement = sqlx::query_as::<_, ApplicationDetail>(&items_query);
        for value in &args {
            items_statement = items_statement.bind(value);
        }
        items_statement = items_statement.bind(filter.page.limit).bind(filter.page.offset);
        let items = items_statement.fetch_all(&self.pool).await?;

        let mut total_statement = sqlx::query_scalar::<_, i64>(&total_query);
        for value in &args {
            total_statement = total_statement.bind(value);
        }
        let total = total_statement.fetch_one(&self.pool).await?;

        Ok((items, total))
    }

    async fn delete_application_for_user(&self, id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM applications WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn apply_review(
        &self,
        id: Uuid,
        update: ReviewUpdate,
    ) -> StoreResult<Option<ApplicationHistory>> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE applications SET status = $1, admin_notes = $2, assigned_level = $3, \
             offer_type = $4, updated_at = NOW() WHERE id = $5",
        )
        .bind(&update.status)
        .bind(&update.admin_notes)
        .bind(&update.assigned_level)
        .bind(&update.offer_type)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let entry = sqlx::query_as::<_, ApplicationHistory>(
            "INSERT INTO application_history (application_id, new_status, changed_by, notes) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, application_id, new_status, changed_by, notes, created_at",
        )
        .bind(id)
        .bind(&update.status)
        .bind(update.changed_by)
        .bind(&update.history_note)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(entry))
    }

    async fn list_history(
        &self,
        application_id: Uuid,
    ) -> StoreResult<Vec<ApplicationHistory>> {
        let entries = sqlx::query_as::<_, ApplicationHistory>(
            "SELECT id, application_id, new_status, changed_by, notes, created_at \
             FROM application_history WHERE application_id = $1 ORDER BY created_at ASC",
        )
        .bind(application_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    async fn count_applicants(&self) -> StoreResult<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = 'applicant'")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    async fn count_jobs(&self) -> StoreResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM job_posts")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn count_applications(&self) -> StoreResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM applications")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn count_open_jobs(&self, today: NaiveDate) -> StoreResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM job_posts WHERE is_active = TRUE \
             AND (application_deadline IS NULL OR application_deadline >= $1)",
        )
        .bind(today)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn count_pending_applications(&self) -> StoreResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM applications WHERE status IN ('Submitted', 'Under Review')",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn status_breakdown(&self) -> StoreResult<Vec<StatusCount>> {
        let rows = sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM applications \
             GROUP BY status ORDER BY count DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn recent_applications(&self, limit: i64) -> StoreResult<Vec<ApplicationDetail>> {
        let query = format!("{DETAIL_SELECT} ORDER BY a.created_at DESC LIMIT $1");
        let rows = sqlx::query_as::<_, ApplicationDetail>(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn top_jobs(&self, limit: i64) -> StoreResult<Vec<JobApplicationCount>> {
        let rows = sqlx::query_as::<_, JobApplicationCount>(
            "SELECT jp.id, jp.title, COUNT(a.id) AS application_count \
             FROM job_posts jp \
             LEFT JOIN applications a ON jp.id = a.job_post_id \
             WHERE jp.is_active = TRUE \
             GROUP BY jp.id, jp.title \
             ORDER BY application_count DESC \
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn monthly_application_counts(
        &self,
        since: NaiveDate,
    ) -> StoreResult<Vec<MonthCount>> {
        let rows = sqlx::query_as::<_, MonthCount>(
            "SELECT TO_CHAR(created_at, 'YYYY-MM') AS month, COUNT(*) AS count \
             FROM applications WHERE created_at >= $1 \
             GROUP BY TO_CHAR(created_at, 'YYYY-MM') \
             ORDER BY month ASC",
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn applicant_level_distribution(&self) -> StoreResult<Vec<LevelCount>> {
        let rows = sqlx::query_as::<_, LevelCount>(
            "SELECT COALESCE(p.experience_level, 'Not Specified') AS level, COUNT(*) AS count \
             FROM profiles p \
             JOIN users u ON p.user_id = u.id \
             WHERE u.role = 'applicant' \
             GROUP BY p.experience_level \
             ORDER BY count DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
