use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobApplicationCount {
    pub id: Uuid,
    pub title: String,
    pub application_count: i64,
}

/// Applications bucketed by `YYYY-MM` month of creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MonthCount {
    pub month: String,
    pub count: i64,
}

/// Applicant experience-tier histogram row; profiles without a tier land in
/// the "Not Specified" bucket.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LevelCount {
    pub level: String,
    pub count: i64,
}
