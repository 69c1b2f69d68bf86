use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobPosting {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub required_skills: Option<String>,
    pub qualifications: Option<String>,
    pub experience_level: String,
    pub job_type: String,
    pub application_deadline: Option<NaiveDate>,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobPosting {
    /// A posting accepts applications while it is active and its deadline,
    /// if any, has not elapsed. The deadline date itself is still open.
    pub fn is_open(&self, today: NaiveDate) -> bool {
        self.is_active
            && self
                .application_deadline
                .map(|deadline| deadline >= today)
                .unwrap_or(true)
    }
}

/// Seniority tiers applied to both postings and applicant profiles.
/// Declaration order is the domain order, so `Ord` compares tiers directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Beginner,
    EarlyBeginner,
    Junior,
    MidLevel,
    Senior,
    TechLead,
    Expert,
    Master,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 8] = [
        ExperienceLevel::Beginner,
        ExperienceLevel::EarlyBeginner,
        ExperienceLevel::Junior,
        ExperienceLevel::MidLevel,
        ExperienceLevel::Senior,
        ExperienceLevel::TechLead,
        ExperienceLevel::Expert,
        ExperienceLevel::Master,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "Beginner",
            ExperienceLevel::EarlyBeginner => "Early Beginner",
            ExperienceLevel::Junior => "Junior",
            ExperienceLevel::MidLevel => "Mid-Level",
            ExperienceLevel::Senior => "Senior",
            ExperienceLevel::TechLead => "Tech Lead",
            ExperienceLevel::Expert => "Expert",
            ExperienceLevel::Master => "Master",
        }
    }

    pub fn parse(raw: &str) -> Option<ExperienceLevel> {
        Self::ALL.iter().copied().find(|level| level.as_str() == raw)
    }
}

impl std::fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobType {
    Internship,
    FullTime,
    PartTime,
}

impl JobType {
    pub const ALL: [JobType; 3] = [JobType::Internship, JobType::FullTime, JobType::PartTime];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::Internship => "Internship",
            JobType::FullTime => "Full-time",
            JobType::PartTime => "Part-time",
        }
    }

    pub fn parse(raw: &str) -> Option<JobType> {
        Self::ALL.iter().copied().find(|kind| kind.as_str() == raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(active: bool, deadline: Option<NaiveDate>) -> JobPosting {
        JobPosting {
            id: Uuid::new_v4(),
            title: "Backend Engineer".into(),
            description: "Build services".into(),
            required_skills: None,
            qualifications: None,
            experience_level: ExperienceLevel::MidLevel.as_str().into(),
            job_type: JobType::FullTime.as_str().into(),
            application_deadline: deadline,
            is_active: active,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn deadline_date_itself_is_still_open() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        assert!(posting(true, Some(today)).is_open(today));
        assert!(!posting(true, Some(today.pred_opt().unwrap())).is_open(today));
        assert!(posting(true, None).is_open(today));
        assert!(!posting(false, None).is_open(today));
    }

    #[test]
    fn tiers_are_totally_ordered() {
        assert!(ExperienceLevel::Beginner < ExperienceLevel::EarlyBeginner);
        assert!(ExperienceLevel::Junior < ExperienceLevel::MidLevel);
        assert!(ExperienceLevel::TechLead < ExperienceLevel::Expert);
        assert!(ExperienceLevel::Expert < ExperienceLevel::Master);
    }

    #[test]
    fn tier_strings_round_trip() {
        for level in ExperienceLevel::ALL {
            assert_eq!(ExperienceLevel::parse(level.as_str()), Some(level));
        }
        assert_eq!(ExperienceLevel::parse("Principal"), None);
    }
}
