use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Append-only ledger entry; one row per successful status transition.
/// Rows are never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationHistory {
    pub id: Uuid,
    pub application_id: Uuid,
    pub new_status: String,
    pub changed_by: Uuid,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}
