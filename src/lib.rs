pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod policy;
pub mod routes;
pub mod services;
pub mod store;

use std::sync::Arc;

use axum::{
    middleware::from_fn,
    routing::{get, patch, put},
    Router,
};

use crate::services::{
    admin_service::AdminService,
    application_service::ApplicationService,
    dashboard_service::DashboardService,
    job_service::JobService,
    notification_service::{NotificationService, NotificationSink},
    review_service::ReviewService,
};
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub applications: ApplicationService,
    pub reviews: ReviewService,
    pub jobs: JobService,
    pub admin: AdminService,
    pub dashboard: DashboardService,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, sink: Arc<dyn NotificationSink>) -> Self {
        let notifications = NotificationService::new(sink);

        let applications = ApplicationService::new(store.clone(), notifications.clone());
        let reviews = ReviewService::new(store.clone(), notifications.clone());
        let jobs = JobService::new(store.clone());
        let admin = AdminService::new(store.clone());
        let dashboard = DashboardService::new(store.clone());

        Self {
            store,
            applications,
            reviews,
            jobs,
            admin,
            dashboard,
        }
    }
}

/// The full HTTP surface. Tests build the same router over the in-memory
/// store; `main` adds the CORS and trace layers on top.
pub fn api_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(routes::health::health))
        .route("/api/jobs", get(routes::job_routes::list_jobs))
        .route("/api/jobs/:id", get(routes::job_routes::get_job));

    let applicant_api = Router::new()
        .route(
            "/api/applications",
            get(routes::application_routes::list_my_applications)
                .post(routes::application_routes::submit_application),
        )
        .route(
            "/api/applications/:id",
            get(routes::application_routes::get_application)
                .delete(routes::application_routes::withdraw_application),
        )
        .layer(from_fn(middleware::auth::authenticate));

    let admin_api = Router::new()
        .route(
            "/api/admin/jobs",
            get(routes::job_routes::list_jobs).post(routes::job_routes::create_job),
        )
        .route(
            "/api/admin/jobs/:id",
            get(routes::job_routes::get_job)
                .patch(routes::job_routes::update_job)
                .delete(routes::job_routes::delete_job),
        )
        .route(
            "/api/admin/jobs/:id/applications",
            get(routes::job_routes::list_job_applications),
        )
        .route(
            "/api/admin/applications",
            get(routes::admin_routes::list_all_applications),
        )
        .route(
            "/api/admin/applications/:id/status",
            patch(routes::admin_routes::update_application_status),
        )
        .route(
            "/api/admin/applications/:id/history",
            get(routes::admin_routes::get_application_history),
        )
        .route("/api/admin/users", get(routes::admin_routes::list_users))
        .route(
            "/api/admin/users/:id",
            get(routes::admin_routes::get_user).delete(routes::admin_routes::delete_user),
        )
        .route(
            "/api/admin/users/:id/role",
            put(routes::admin_routes::update_user_role),
        )
        .route(
            "/api/admin/dashboard/stats",
            get(routes::admin_routes::dashboard_stats),
        )
        .layer(from_fn(middleware::auth::authenticate));

    public
        .merge(applicant_api)
        .merge(admin_api)
        .with_state(state)
}
