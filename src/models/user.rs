use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Admin listing row: user joined with profile highlights and the number of
/// applications the user has on file.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserOverview {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub experience_level: Option<String>,
    pub skills: Option<String>,
    pub application_count: i64,
}

/// Single-user admin view with per-outcome application counts.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserDetail {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub education: Option<String>,
    pub skills: Option<String>,
    pub years_of_experience: Option<i32>,
    pub experience_level: Option<String>,
    pub total_applications: i64,
    pub accepted_applications: i64,
    pub rejected_applications: i64,
}
