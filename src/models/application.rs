use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Application {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_post_id: Uuid,
    pub cover_letter: Option<String>,
    pub status: String,
    pub admin_notes: Option<String>,
    pub assigned_level: Option<String>,
    pub offer_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Application joined with posting and applicant identity; the record shape
/// returned by submit, get, the admin listings, and the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationDetail {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_post_id: Uuid,
    pub cover_letter: Option<String>,
    pub status: String,
    pub admin_notes: Option<String>,
    pub assigned_level: Option<String>,
    pub offer_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub job_title: String,
    pub job_level: String,
    pub job_type: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub applicant_level: Option<String>,
}

impl ApplicationDetail {
    /// Human-facing reference id carried in the "received" notification.
    pub fn reference_id(&self) -> String {
        format!("APP-{}", self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Submitted,
    UnderReview,
    Shortlisted,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 5] = [
        ApplicationStatus::Submitted,
        ApplicationStatus::UnderReview,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "Submitted",
            ApplicationStatus::UnderReview => "Under Review",
            ApplicationStatus::Shortlisted => "Shortlisted",
            ApplicationStatus::Accepted => "Accepted",
            ApplicationStatus::Rejected => "Rejected",
        }
    }

    pub fn parse(raw: &str) -> Option<ApplicationStatus> {
        Self::ALL.iter().copied().find(|status| status.as_str() == raw)
    }

    /// Statuses counted as "pending" on the dashboard.
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Submitted | ApplicationStatus::UnderReview
        )
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfferType {
    UnpaidInternship,
    PaidInternship,
    FullTimeEmployment,
}

impl OfferType {
    pub const ALL: [OfferType; 3] = [
        OfferType::UnpaidInternship,
        OfferType::PaidInternship,
        OfferType::FullTimeEmployment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OfferType::UnpaidInternship => "Unpaid Internship",
            OfferType::PaidInternship => "Paid Internship",
            OfferType::FullTimeEmployment => "Full-time Employment",
        }
    }

    pub fn parse(raw: &str) -> Option<OfferType> {
        Self::ALL.iter().copied().find(|kind| kind.as_str() == raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings_round_trip() {
        for status in ApplicationStatus::ALL {
            assert_eq!(ApplicationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ApplicationStatus::parse("Hired"), None);
        assert_eq!(ApplicationStatus::parse("under review"), None);
    }

    #[test]
    fn pending_covers_submitted_and_under_review() {
        assert!(ApplicationStatus::Submitted.is_pending());
        assert!(ApplicationStatus::UnderReview.is_pending());
        assert!(!ApplicationStatus::Shortlisted.is_pending());
        assert!(!ApplicationStatus::Accepted.is_pending());
        assert!(!ApplicationStatus::Rejected.is_pending());
    }
}
