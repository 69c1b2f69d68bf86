pub mod admin_service;
pub mod application_service;
pub mod dashboard_service;
pub mod job_service;
pub mod notification_service;
pub mod review_service;
